pub trait ResourceID {
    fn resource_id() -> &'static str;
}

macro_rules! resource_id {
    ($type:ty, $resource_name:literal) => {
        impl crate::base::ResourceID for $type {
            fn resource_id() -> &'static str {
                $resource_name
            }
        }
    };
}

pub(crate) use resource_id;

resource_id!(u32, "base::u32");
resource_id!(String, "base::string");
resource_id!(bool, "base::bool");
resource_id!((), "base::unit");
