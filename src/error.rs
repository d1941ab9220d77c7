use derive_more::Display;
use serde::Serialize;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Display)]
pub struct UnknownError(BoxedError);

impl std::error::Error for UnknownError {}

impl UnknownError {
    pub fn new(err: BoxedError) -> Self {
        Self(err)
    }
}

#[derive(Debug, Display)]
struct StrError(pub Box<str>);

impl std::error::Error for StrError {}

impl<'a> From<&'a str> for UnknownError {
    fn from(err: &'a str) -> Self {
        UnknownError(Box::new(StrError(Box::from(err))))
    }
}

impl From<sqlx::error::Error> for UnknownError {
    fn from(err: sqlx::error::Error) -> Self {
        Self::new(err.into())
    }
}

impl Serialize for UnknownError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_none()
    }
}

pub mod app {
    use derive_more::Display;
    use salvo::{prelude::StatusError, writer::Json, Piece};
    use serde::Serialize;

    use super::{
        http::ErrorResponse,
        persistence::PersistenceError,
        resource::{NullArgumentError, ValidationError},
        security::{AuthenticationError, PermissionError, UnauthorizedError},
        UnknownError,
    };

    #[derive(Debug, Display, Serialize)]
    pub enum ApplicationError<R> {
        NullArgument(NullArgumentError),
        Authentication(AuthenticationError),
        Unauthorized(UnauthorizedError),
        Permission(PermissionError),
        Validation(ValidationError<R>),
        Persistence(PersistenceError),
        Unknown(UnknownError),
    }

    impl<R: std::fmt::Debug> std::error::Error for ApplicationError<R> {}

    impl<R> From<NullArgumentError> for ApplicationError<R> {
        fn from(err: NullArgumentError) -> Self {
            Self::NullArgument(err)
        }
    }

    impl<R> From<AuthenticationError> for ApplicationError<R> {
        fn from(err: AuthenticationError) -> Self {
            Self::Authentication(err)
        }
    }

    impl<R> From<UnauthorizedError> for ApplicationError<R> {
        fn from(err: UnauthorizedError) -> Self {
            Self::Unauthorized(err)
        }
    }

    impl<R> From<PermissionError> for ApplicationError<R> {
        fn from(err: PermissionError) -> Self {
            Self::Permission(err)
        }
    }

    impl<R> From<ValidationError<R>> for ApplicationError<R> {
        fn from(err: ValidationError<R>) -> Self {
            Self::Validation(err)
        }
    }

    impl<R> From<PersistenceError> for ApplicationError<R> {
        fn from(err: PersistenceError) -> Self {
            Self::Persistence(err)
        }
    }

    impl<R> From<UnknownError> for ApplicationError<R> {
        fn from(err: UnknownError) -> Self {
            Self::Unknown(err)
        }
    }

    impl<R: Serialize + Send> Piece for ApplicationError<R> {
        fn render(self, res: &mut salvo::Response) {
            let status = match &self {
                ApplicationError::Persistence(_) => StatusError::service_unavailable(),
                ApplicationError::NullArgument(_)
                | ApplicationError::Validation(_)
                | ApplicationError::Permission(_) => StatusError::bad_request(),
                ApplicationError::Authentication(_) | ApplicationError::Unauthorized(_) => {
                    StatusError::unauthorized()
                }
                ApplicationError::Unknown(_) => StatusError::internal_server_error(),
            };
            let message = self.to_string();
            res.render(Json(ErrorResponse::new(&status, message, self)));
            res.set_status_error(status);
        }
    }
}

pub mod service {
    use derive_more::Display;

    use crate::error::UnknownError;

    #[derive(Debug, Display)]
    pub enum DispatchError {
        #[display(fmt = "Dispatched operation timed out in {_0:?}")]
        Timeout(Option<std::time::Duration>),
        #[display(fmt = "IO error dispatching {_0}")]
        IO(std::io::Error),
        #[display(fmt = "Unknown dispatch error {_0}")]
        Unknown(UnknownError),
    }

    impl std::error::Error for DispatchError {}
}

pub mod persistence {
    use std::io;

    use derive_more::Display;
    use serde::Serialize;

    use super::{service::DispatchError, UnknownError};

    pub type SqlState = String;

    #[derive(Debug, Display)]
    pub enum PersistenceError {
        #[display(fmt = "database persistence error: SQLSTATE {_0:?}")]
        Database(Option<SqlState>),
        #[display(fmt = "persistence layer connection error: {_0}")]
        Connection(DispatchError),
        #[display(fmt = "PersistenceError data not found")]
        NotFound,
        #[display(fmt = "PersistenceError decoding data")]
        DecodeData,
        #[display(fmt = "PersistenceError data migration")]
        DataMigration,
        #[display(fmt = "unknown persistence error: {_0}")]
        Unknown(UnknownError),
    }

    impl std::error::Error for PersistenceError {}

    impl Serialize for PersistenceError {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_none()
        }
    }

    type SqlxError = sqlx::error::Error;

    impl From<SqlxError> for PersistenceError {
        fn from(err: SqlxError) -> Self {
            tracing::error!("persistence failure: {err}");
            match err {
                SqlxError::Configuration(_) => {
                    Self::Connection(DispatchError::IO(io::ErrorKind::InvalidInput.into()))
                }
                SqlxError::Database(db) => Self::Database(db.code().map(|code| code.into())),
                SqlxError::Io(io) => Self::Connection(DispatchError::IO(io)),
                SqlxError::Tls(_) => {
                    Self::Connection(DispatchError::IO(io::ErrorKind::ConnectionRefused.into()))
                }
                SqlxError::Protocol(msg) => Self::Connection(DispatchError::IO(io::Error::new(
                    io::ErrorKind::InvalidData,
                    msg,
                ))),
                SqlxError::RowNotFound => Self::NotFound,
                SqlxError::TypeNotFound { .. } => Self::DecodeData,
                SqlxError::ColumnIndexOutOfBounds { .. } => Self::DecodeData,
                SqlxError::ColumnNotFound(_) => Self::NotFound,
                SqlxError::ColumnDecode { .. } => Self::DecodeData,
                SqlxError::Decode(_) => Self::DecodeData,
                SqlxError::PoolTimedOut => Self::Connection(DispatchError::Timeout(None)),
                SqlxError::PoolClosed => {
                    Self::Connection(DispatchError::IO(io::ErrorKind::NotConnected.into()))
                }
                SqlxError::Migrate(_) => Self::DataMigration,
                _ => PersistenceError::Unknown(err.into()),
            }
        }
    }
}

pub mod resource {
    use derive_more::Display;
    use serde::{Deserialize, Serialize};

    use crate::base::ResourceID;

    #[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum ValidationErrorKind {
        /// When a required property is missing or blank.
        Required,

        /// Maximum inclusive string length.
        MaxLength(u64),
        /// Minimum inclusive string length.
        MinLength(u64),
        /// When the input doesn't match to a pattern.
        Pattern(String),

        /// The input value doesn't match the required type.
        InvalidType,
        /// Input value already exists.
        AlreadyExists,
        /// Input value was not found.
        NotFound,
        /// Generic kind.
        Invalid,
    }

    impl std::error::Error for ValidationErrorKind {}

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ValidationError<R> {
        /// Resource value
        pub resource: R,
        /// Name of the resource
        pub resource_type: &'static str,
        /// Invalid resource fields
        pub fields: Vec<ValidationFieldError>,
    }

    impl<R> ValidationError<R> {
        pub fn from_resource(resource: R, fields: Vec<ValidationFieldError>) -> Self
        where
            R: ResourceID,
        {
            Self {
                resource,
                resource_type: R::resource_id(),
                fields,
            }
        }

        /// Checks whether some field at `path` failed with `kind`.
        pub fn has_kind(&self, path: &str, kind: &ValidationErrorKind) -> bool {
            self.fields
                .iter()
                .any(|field| field.path == path && field.kinds.contains(kind))
        }
    }

    impl<R> std::fmt::Display for ValidationError<R> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!(
                "Invalid resource {}, fields {:?}",
                self.resource_type, self.fields
            ))
        }
    }

    impl<R: std::fmt::Debug> std::error::Error for ValidationError<R> {}

    #[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[display(fmt = "{path}: {value:?}, {kinds:?}")]
    pub struct ValidationFieldError {
        /// Resource field path with invalid value
        pub path: String,
        /// Displayed invalid value
        pub value: String,
        /// Value type id
        pub type_id: &'static str,
        /// Kinds of validation errors
        pub kinds: Vec<ValidationErrorKind>,
    }

    impl std::error::Error for ValidationFieldError {}

    impl ValidationFieldError {
        pub fn new(
            type_id: &'static str,
            value: String,
            path: String,
            kinds: Vec<ValidationErrorKind>,
        ) -> Self {
            Self {
                path,
                type_id,
                value,
                kinds,
            }
        }
    }

    /// A required object was not supplied at all.
    #[derive(Debug, Display, Clone, PartialEq, Eq, Serialize)]
    #[display(fmt = "The '{argument}' parameter is null")]
    pub struct NullArgumentError {
        pub argument: &'static str,
    }

    impl std::error::Error for NullArgumentError {}

    impl NullArgumentError {
        pub fn new(argument: &'static str) -> Self {
            Self { argument }
        }
    }
}

pub mod security {
    use derive_more::Display;
    use serde::Serialize;

    use crate::domain::datatype::security::{PasswordHashError, TokenEncryptionError};

    /// Unauthorized access to a resource.
    ///
    /// The user is unauthorized to access the resource.
    #[derive(Debug, Display, Clone, PartialEq, Eq, Serialize)]
    pub enum UnauthorizedError {
        /// Authentication token is not present.
        #[display(fmt = "token_not_present")]
        TokenNotPresent,

        /// Authentication token is malformatted.
        ///
        /// The token is no formated as the required authentication scheme
        #[display(fmt = "malformatted_token")]
        MalformattedToken,

        /// Authentication token is invalid.
        #[display(fmt = "invalid_token")]
        InvalidToken,
    }

    #[derive(Debug, Display, Clone, PartialEq, Eq, Serialize)]
    pub enum AuthenticationError {
        /// Attempt to authenticate with invalid credentials.
        #[display(fmt = "invalid_credential")]
        InvalidCredential,

        /// The token is valid but its subject no longer exists.
        #[display(fmt = "unknown_principal")]
        UnknownPrincipal,
    }

    /// The authenticated user is not allowed to change the resource.
    #[derive(Debug, Display, Clone, PartialEq, Eq, Serialize)]
    pub enum PermissionError {
        #[display(fmt = "You do not have permission to modify the product of {_0}")]
        NotOwner(String),
    }

    impl std::error::Error for UnauthorizedError {}
    impl std::error::Error for AuthenticationError {}
    impl std::error::Error for PermissionError {}

    impl From<PasswordHashError> for AuthenticationError {
        fn from(_: PasswordHashError) -> Self {
            Self::InvalidCredential
        }
    }

    impl From<TokenEncryptionError> for UnauthorizedError {
        fn from(_: TokenEncryptionError) -> Self {
            Self::InvalidToken
        }
    }
}

pub mod http {
    use derive_more::{Display, Error};
    use salvo::{http::ParseError, prelude::StatusError, writer::Json, Piece, Response};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Display, Clone, Error, Serialize, Deserialize)]
    pub enum BadRequest {
        InvalidContent,
    }

    /// A lookup by key matched nothing.
    #[derive(Debug, Display, Clone, Error, Serialize, Deserialize)]
    #[display(fmt = "notfound: {resource_type}")]
    pub struct NotFound {
        pub resource_type: String,
    }

    impl NotFound {
        pub fn new(resource_type: &str) -> Self {
            Self {
                resource_type: resource_type.into(),
            }
        }
    }

    #[derive(Debug, Display, Clone, Error, Serialize, Deserialize)]
    #[display(fmt = "Response error: {title}, {message}")]
    pub struct ErrorResponse<T> {
        pub title: String,
        pub message: String,
        pub error: T,
    }

    impl<T> ErrorResponse<T> {
        pub fn from_status_error(status: &StatusError, err: T) -> Self {
            Self {
                title: status.name.clone(),
                message: status
                    .summary
                    .clone()
                    .unwrap_or_else(|| status.name.clone()),
                error: err,
            }
        }

        pub fn new(status: &StatusError, message: String, err: T) -> Self {
            Self {
                title: status.name.clone(),
                message,
                error: err,
            }
        }
    }

    impl From<ParseError> for BadRequest {
        fn from(_: ParseError) -> Self {
            BadRequest::InvalidContent
        }
    }

    impl Piece for BadRequest {
        fn render(self, res: &mut Response) {
            let status = StatusError::bad_request();
            res.render(Json(ErrorResponse::from_status_error(&status, self)));
            res.set_status_error(status);
        }
    }

    impl Piece for NotFound {
        fn render(self, res: &mut Response) {
            let status = StatusError::not_found();
            let message = self.to_string();
            res.render(Json(ErrorResponse::new(&status, message, self)));
            res.set_status_error(status);
        }
    }
}
