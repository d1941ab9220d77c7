use crate::domain::datatype::security::PasswordHash;

use super::{impl_entity, state_ref, EntityData};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserState {
    pub(in crate::domain) email: String,
    pub(in crate::domain) phone_number: Option<String>,
    pub(in crate::domain) person_name: Option<String>,
    pub(in crate::domain) password_hash: PasswordHash,
}

impl UserState {
    pub fn new(
        email: String,
        phone_number: Option<String>,
        person_name: Option<String>,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            email,
            phone_number,
            person_name,
            password_hash,
        }
    }
}

/// Registered account, the owner of the products it manufactures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub(in crate::domain) data: EntityData,
    pub(in crate::domain) state: UserState,
}

impl_entity!(User);

impl User {
    state_ref!(email, String);
    state_ref!(phone_number, Option<String>);
    state_ref!(person_name, Option<String>);
    state_ref!(password_hash, PasswordHash);

    pub fn new(
        email: String,
        phone_number: Option<String>,
        person_name: Option<String>,
        password_hash: PasswordHash,
    ) -> Self {
        Self::restore(
            EntityData::new(),
            UserState::new(email, phone_number, person_name, password_hash),
        )
    }

    pub fn restore(data: EntityData, state: UserState) -> Self {
        Self { data, state }
    }
}
