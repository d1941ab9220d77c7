use std::{str::FromStr, time::Duration};

use chrono::{DateTime, TimeZone, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    base::ResourceID,
    error::resource::{ValidationErrorKind, ValidationFieldError},
};

/// Password hash stored as a [PHC string][1].
///
/// ```text
/// $<id>[$v=<version>][$<param>=<value>(,<param>=<value>)*][$<salt>[$<hash>]]
/// ```
///
/// [1]: https://github.com/P-H-C/phc-string-format/blob/master/phc-sf-spec.md#specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ResourceID for PasswordHash {
    fn resource_id() -> &'static str {
        "base::password_hash"
    }
}

impl FromStr for PasswordHash {
    type Err = ValidationFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        password_hash::PasswordHash::new(s).map_err(|_| {
            ValidationFieldError::new(
                Self::resource_id(),
                s.into(),
                String::new(),
                vec![ValidationErrorKind::Invalid],
            )
        })?;

        Ok(Self(s.into()))
    }
}

impl<'a> TryFrom<password_hash::PasswordHash<'a>> for PasswordHash {
    type Error = ValidationFieldError;

    fn try_from(hash: password_hash::PasswordHash<'a>) -> Result<Self, Self::Error> {
        hash.to_string().parse()
    }
}

impl std::fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum PasswordHashError {
    /// Unsupported Algorithm.
    #[display(fmt = "unsupported_algorithm")]
    UnsupportedAlgorithm,

    /// Invalid password.
    #[display(fmt = "invalid_password")]
    InvalidPassword,

    /// Invalid password hash.
    #[display(fmt = "invalid_password_hash")]
    InvalidPasswordHash,

    /// Cryptographic error.
    #[display(fmt = "cryptographic")]
    Cryptographic,

    /// Error in the hasher configuration.
    #[display(fmt = "config")]
    Config,
}

impl std::error::Error for PasswordHashError {}

impl From<password_hash::Error> for PasswordHashError {
    fn from(err: password_hash::Error) -> Self {
        match err {
            password_hash::Error::Algorithm | password_hash::Error::Version => {
                Self::UnsupportedAlgorithm
            }
            password_hash::Error::Password => Self::InvalidPassword,
            password_hash::Error::B64Encoding(_)
            | password_hash::Error::PhcStringInvalid
            | password_hash::Error::PhcStringTooShort
            | password_hash::Error::PhcStringTooLong => Self::InvalidPasswordHash,
            password_hash::Error::Crypto
            | password_hash::Error::OutputTooShort
            | password_hash::Error::OutputTooLong => Self::Cryptographic,
            _ => Self::Config,
        }
    }
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum TokenEncryptionError {
    #[display(fmt = "token_expired")]
    Expired,
    #[display(fmt = "invalid_signature")]
    InvalidSignature,
    #[display(fmt = "invalid_claims")]
    InvalidClaims,
    #[display(fmt = "malformed_token")]
    Malformed,
    #[display(fmt = "encoding")]
    Encoding,
}

impl std::error::Error for TokenEncryptionError {}

/// Issuer, audience and lifetime every issued token is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenScope {
    pub issuer: String,
    pub audience: String,
    pub lifetime: Duration,
}

/// Registered JWT claims plus an application payload flattened beside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload<T> {
    pub sub: Uuid,
    pub jti: Uuid,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub data: T,
}

impl<T> TokenPayload<T> {
    pub fn new(scope: &TokenScope, subject: Uuid, data: T) -> Self {
        let now = Utc::now();
        let lifetime = chrono::Duration::seconds(scope.lifetime.as_secs() as i64);

        Self {
            sub: subject,
            jti: Uuid::new_v4(),
            iss: scope.issuer.clone(),
            aud: scope.audience.clone(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            data,
        }
    }

    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Identity claims carried by an authentication token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct Token<T> {
    pub(in crate::domain) token: String,
    pub(in crate::domain) payload: TokenPayload<T>,
}

impl<T> Token<T> {
    pub fn payload(&self) -> &TokenPayload<T> {
        &self.payload
    }
}

impl<T> From<Token<T>> for String {
    fn from(token: Token<T>) -> Self {
        token.token
    }
}

/// Authenticated identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<TokenPayload<IdentityClaims>> for Principal {
    fn from(payload: TokenPayload<IdentityClaims>) -> Self {
        Self {
            id: payload.sub,
            name: payload.data.name,
            email: payload.data.email,
        }
    }
}
