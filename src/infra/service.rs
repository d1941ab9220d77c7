use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
use jsonwebtoken::{errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use password_hash::SaltString;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::env_var::JwtSettings,
    domain::{
        datatype::security::{
            PasswordHash, PasswordHashError, TokenEncryptionError, TokenPayload, TokenScope,
        },
        service::{PasswordHashService, TokenEncryptionService},
    },
};

pub struct Argon2HashService(Argon2<'static>);

impl Argon2HashService {
    pub fn new() -> Self {
        Self(Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        ))
    }
}

impl Default for Argon2HashService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHashService for Argon2HashService {
    fn hash_password(&self, pwd: &str) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self.0.hash_password(pwd.as_bytes(), &salt)?;

        PasswordHash::try_from(hash).map_err(|_| PasswordHashError::InvalidPasswordHash)
    }

    fn verify_password(&self, pwd: &str, hash: &PasswordHash) -> Result<(), PasswordHashError> {
        let parsed = password_hash::PasswordHash::new(hash.as_str())?;
        self.0.verify_password(pwd.as_bytes(), &parsed)?;
        Ok(())
    }
}

/// HS256 token issuer and verifier bound to one issuer/audience pair.
pub struct JWTEncryptionService {
    scope: TokenScope,
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JWTEncryptionService {
    pub fn new(settings: &JwtSettings) -> Self {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.leeway = 60;
        validation.validate_exp = true;
        validation.validate_nbf = false;

        Self {
            scope: TokenScope {
                issuer: settings.issuer.clone(),
                audience: settings.audience.clone(),
                lifetime: settings.expiration,
            },
            encoding_key: EncodingKey::from_secret(settings.key.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.key.as_bytes()),
            header: Header::new(jsonwebtoken::Algorithm::HS256),
            validation,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenEncryptionError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::InvalidSignature,
            ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_) => Self::InvalidClaims,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::Malformed,
            _ => Self::Encoding,
        }
    }
}

impl TokenEncryptionService for JWTEncryptionService {
    fn scope(&self) -> &TokenScope {
        &self.scope
    }

    fn issue_token<T>(&self, payload: &TokenPayload<T>) -> Result<String, TokenEncryptionError>
    where
        T: Serialize,
    {
        let token = jsonwebtoken::encode(&self.header, payload, &self.encoding_key)?;
        Ok(token)
    }

    fn verify_token<T>(&self, token: &str) -> Result<TokenPayload<T>, TokenEncryptionError>
    where
        T: DeserializeOwned,
    {
        let token_data = jsonwebtoken::decode::<TokenPayload<T>>(
            token,
            &self.decoding_key,
            &self.validation,
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;
    use crate::domain::datatype::security::IdentityClaims;

    #[test]
    fn argon2_hash_verifies_only_the_original_password() {
        let service = Argon2HashService::new();
        let hash = service.hash_password("secure:12345678").unwrap();

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert_eq!(service.verify_password("secure:12345678", &hash), Ok(()));
        assert_eq!(
            service.verify_password("secure:87654321", &hash),
            Err(PasswordHashError::InvalidPassword)
        );
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let service = JWTEncryptionService::new(&JwtSettings {
            key: "secret-key".into(),
            issuer: "catalog".into(),
            audience: "catalog-api".into(),
            expiration: Duration::from_secs(60),
        });

        let mut payload = TokenPayload::new(
            service.scope(),
            Uuid::new_v4(),
            IdentityClaims {
                name: "user@example.com".into(),
                email: "user@example.com".into(),
            },
        );
        payload.exp -= 60 * 60;
        let token = service.issue_token(&payload).unwrap();

        assert_eq!(
            service.verify_token::<IdentityClaims>(&token),
            Err(TokenEncryptionError::Expired)
        );
    }
}
