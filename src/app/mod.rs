pub mod resource;
pub mod use_case;

pub mod transform {
    pub mod product {
        use chrono::SecondsFormat;

        use crate::{
            app::resource::product::{ProductKeyParams, ProductResponse},
            domain::entity::product::{Product, ProductKey},
        };

        impl From<&Product> for ProductResponse {
            fn from(product: &Product) -> Self {
                Self {
                    produce_date: product.produce_date(),
                    manufacture_email: product.manufacture_email().clone(),
                    name: product.name().clone(),
                    manufacture_phone: product.manufacture_phone().clone(),
                    is_available: product.is_available(),
                }
            }
        }

        impl From<Product> for ProductResponse {
            fn from(product: Product) -> Self {
                Self::from(&product)
            }
        }

        impl From<&ProductResponse> for ProductKey {
            fn from(response: &ProductResponse) -> Self {
                Self::new(response.produce_date, response.manufacture_email.clone())
            }
        }

        impl From<&ProductKey> for ProductKeyParams {
            fn from(key: &ProductKey) -> Self {
                Self {
                    produce_date: Some(
                        key.produce_date
                            .to_rfc3339_opts(SecondsFormat::AutoSi, true),
                    ),
                    manufacture_email: Some(key.manufacture_email.clone()),
                }
            }
        }
    }
}
