use crate::{
    app::resource::iam::{AuthenticationResponse, RegisterUser, UserCredential},
    domain::{
        datatype::security::{
            IdentityClaims, Principal, Token, TokenEncryptionError, TokenPayload,
        },
        entity::{iam::User, Entity},
        repository::UserRepository,
        service::{PasswordHashService, TokenEncryptionService},
    },
    error::{
        app::ApplicationError,
        resource::{ValidationError, ValidationErrorKind, ValidationFieldError},
        security::{AuthenticationError, UnauthorizedError},
        UnknownError,
    },
};

mod validation {
    use super::*;
    use crate::domain::validation;

    pub async fn register_user<UR>(
        users: &UR,
        dto: &RegisterUser,
    ) -> Result<(), ApplicationError<RegisterUser>>
    where
        UR: UserRepository + ?Sized,
    {
        let mut errors = Vec::new();

        validation::collect(
            &mut errors,
            "base::email",
            "/email",
            dto.email.clone(),
            validation::email(&dto.email),
        );
        if let Some(phone) = &dto.phone {
            validation::collect(
                &mut errors,
                "base::phone",
                "/phone",
                phone.clone(),
                validation::phone(phone),
            );
        }
        if dto.password.is_empty() {
            errors.push(ValidationFieldError::new(
                "base::password",
                String::new(),
                "/password".into(),
                vec![ValidationErrorKind::Required],
            ));
        } else if dto.password != dto.confirm_password {
            errors.push(ValidationFieldError::new(
                "base::password",
                String::new(),
                "/confirmPassword".into(),
                vec![ValidationErrorKind::Invalid],
            ));
        }

        if errors.is_empty() && users.email_exists(&dto.email).await? {
            errors.push(ValidationFieldError::new(
                "base::email",
                dto.email.clone(),
                "/email".into(),
                vec![ValidationErrorKind::AlreadyExists],
            ));
        }

        if !errors.is_empty() {
            return Err(ValidationError::from_resource(dto.clone(), errors).into());
        }

        Ok(())
    }
}

/// Issues a signed token naming `user` as subject and identity.
pub fn create_jwt_token<TS>(
    token_service: &TS,
    user: &User,
) -> Result<AuthenticationResponse, TokenEncryptionError>
where
    TS: TokenEncryptionService,
{
    let claims = IdentityClaims {
        name: user.email().clone(),
        email: user.email().clone(),
    };
    let payload = TokenPayload::new(token_service.scope(), user.ident(), claims);
    let token = Token::new(payload, token_service)?;

    let expiration = token
        .payload()
        .expiration()
        .ok_or(TokenEncryptionError::InvalidClaims)?;

    Ok(AuthenticationResponse {
        email: user.email().clone(),
        expiration,
        token: token.into(),
    })
}

/// Verifies a bearer token and recovers the identity it carries.
pub fn authenticate_token<TS>(token_service: &TS, token: &str) -> Result<Principal, UnauthorizedError>
where
    TS: TokenEncryptionService,
{
    let token = Token::<IdentityClaims>::verify(token.into(), token_service).map_err(|err| {
        tracing::debug!("rejected bearer token: {err}");
        UnauthorizedError::from(err)
    })?;
    Ok(token.payload().clone().into())
}

fn issue<TS, R>(token_service: &TS, user: &User) -> Result<AuthenticationResponse, ApplicationError<R>>
where
    TS: TokenEncryptionService,
{
    create_jwt_token(token_service, user).map_err(|err| {
        tracing::error!("could not sign a token for {}: {err}", user.email());
        UnknownError::from("token signing failure").into()
    })
}

pub async fn register_user<UR, HS, TS>(
    users: &UR,
    hash_service: &HS,
    token_service: &TS,
    dto: RegisterUser,
) -> Result<AuthenticationResponse, ApplicationError<RegisterUser>>
where
    UR: UserRepository + ?Sized,
    HS: PasswordHashService,
    TS: TokenEncryptionService,
{
    let dto = RegisterUser {
        email: crate::domain::validation::normalize_email(&dto.email),
        ..dto
    };
    validation::register_user(users, &dto).await?;

    let password_hash = hash_service.hash_password(&dto.password).map_err(|_| {
        ValidationError::from_resource(
            dto.clone(),
            vec![ValidationFieldError::new(
                "base::password",
                String::new(),
                "/password".into(),
                vec![ValidationErrorKind::Invalid],
            )],
        )
    })?;

    let user = User::new(
        dto.email.clone(),
        dto.phone.clone(),
        dto.person_name.clone(),
        password_hash,
    );
    users.insert_user(&user).await?;
    tracing::info!(user = %user.ident(), email = %user.email(), "user registered");

    issue(token_service, &user)
}

pub async fn authenticate_user<UR, HS, TS>(
    users: &UR,
    hash_service: &HS,
    token_service: &TS,
    credential: UserCredential,
) -> Result<AuthenticationResponse, ApplicationError<UserCredential>>
where
    UR: UserRepository + ?Sized,
    HS: PasswordHashService,
    TS: TokenEncryptionService,
{
    let credential = UserCredential {
        email: crate::domain::validation::normalize_email(&credential.email),
        ..credential
    };
    let user = users
        .find_user_by_email(&credential.email)
        .await?
        .ok_or_else(|| {
            ValidationError::from_resource(
                credential.clone(),
                vec![ValidationFieldError::new(
                    "base::email",
                    credential.email.clone(),
                    "/email".into(),
                    vec![ValidationErrorKind::NotFound],
                )],
            )
        })?;

    hash_service
        .verify_password(&credential.password, user.password_hash())
        .map_err(AuthenticationError::from)?;

    issue(token_service, &user)
}
