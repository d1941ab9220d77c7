pub mod product {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    use crate::base::resource_id;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateProduct {
        #[serde(default, alias = "Name")]
        pub name: String,
        #[serde(default, alias = "IsAvailable")]
        pub is_available: Option<bool>,
    }

    resource_id!(CreateProduct, "product::CreateProduct");

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UpdateProduct {
        #[serde(default, alias = "Name")]
        pub name: String,
        #[serde(default, alias = "IsAvailable")]
        pub is_available: Option<bool>,
    }

    resource_id!(UpdateProduct, "product::UpdateProduct");

    /// Raw key parameters as received in a query string.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductKeyParams {
        pub produce_date: Option<String>,
        pub manufacture_email: Option<String>,
    }

    resource_id!(ProductKeyParams, "product::ProductKey");

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductResponse {
        pub produce_date: DateTime<Utc>,
        pub manufacture_email: String,
        pub name: String,
        pub manufacture_phone: Option<String>,
        pub is_available: bool,
    }

    resource_id!(ProductResponse, "product::Product");
}

pub mod iam {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    use crate::base::resource_id;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RegisterUser {
        #[serde(default, alias = "Email")]
        pub email: String,
        #[serde(default, alias = "Phone")]
        pub phone: Option<String>,
        #[serde(default, alias = "PersonName")]
        pub person_name: Option<String>,
        #[serde(default, alias = "Password", skip_serializing)]
        pub password: String,
        #[serde(default, alias = "ConfirmPassword", skip_serializing)]
        pub confirm_password: String,
    }

    resource_id!(RegisterUser, "iam::RegisterUser");

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserCredential {
        #[serde(default, alias = "Email")]
        pub email: String,
        #[serde(default, alias = "Password", skip_serializing)]
        pub password: String,
    }

    resource_id!(UserCredential, "iam::UserCredential");

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AuthenticationResponse {
        pub token: String,
        pub email: String,
        pub expiration: DateTime<Utc>,
    }

    resource_id!(AuthenticationResponse, "iam::AuthenticationResponse");
}
