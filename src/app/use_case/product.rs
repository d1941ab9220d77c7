use chrono::{DateTime, Utc};

use crate::{
    app::resource::product::{CreateProduct, ProductKeyParams, ProductResponse, UpdateProduct},
    domain::{
        datatype::{security::Principal, timestamp_now},
        entity::product::{Product, ProductFilter, ProductKey, ProductUpdate},
        repository::{ProductRepository, UserRepository},
    },
    error::{
        app::ApplicationError,
        persistence::PersistenceError,
        resource::{NullArgumentError, ValidationError, ValidationErrorKind, ValidationFieldError},
        security::{AuthenticationError, PermissionError},
    },
};

mod validation {
    use super::*;
    use crate::domain::validation;

    /// Field rules shared by the create and update requests.
    pub fn product_fields(name: &str, is_available: &Option<bool>) -> Vec<ValidationFieldError> {
        let mut errors = Vec::new();
        validation::collect(
            &mut errors,
            "base::string",
            "/name",
            name.into(),
            validation::product_name(name),
        );
        validation::collect(
            &mut errors,
            "base::bool",
            "/isAvailable",
            String::new(),
            validation::present(is_available),
        );
        errors
    }

    pub async fn create_product<PR>(
        products: &PR,
        dto: &CreateProduct,
    ) -> Result<(), ApplicationError<CreateProduct>>
    where
        PR: ProductRepository + ?Sized,
    {
        let errors = product_fields(&dto.name, &dto.is_available);
        if !errors.is_empty() {
            return Err(ValidationError::from_resource(dto.clone(), errors).into());
        }

        let existing = products
            .get_filtered_products(&ProductFilter::by_name(dto.name.as_str()))
            .await?;
        if !existing.is_empty() {
            return Err(ValidationError::from_resource(
                dto.clone(),
                vec![ValidationFieldError::new(
                    "base::string",
                    dto.name.clone(),
                    "/name".into(),
                    vec![ValidationErrorKind::AlreadyExists],
                )],
            )
            .into());
        }

        Ok(())
    }

    pub fn update_product(dto: &UpdateProduct) -> Result<(), ApplicationError<UpdateProduct>> {
        let errors = product_fields(&dto.name, &dto.is_available);
        if !errors.is_empty() {
            return Err(ValidationError::from_resource(dto.clone(), errors).into());
        }
        Ok(())
    }

    pub fn produce_date(raw: &str) -> Option<DateTime<Utc>> {
        let parse = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|date| date.with_timezone(&Utc))
        };
        // a raw '+' in a query string decodes as a space
        parse(raw).or_else(|| parse(&raw.replace(' ', "+")))
    }

    pub fn product_key(
        params: &ProductKeyParams,
    ) -> Result<ProductKey, ApplicationError<ProductKeyParams>> {
        let mut errors = Vec::new();

        let date = match &params.produce_date {
            Some(raw) => {
                let date = produce_date(raw);
                if date.is_none() {
                    errors.push(ValidationFieldError::new(
                        "base::timestamp",
                        raw.clone(),
                        "/produceDate".into(),
                        vec![ValidationErrorKind::InvalidType],
                    ));
                }
                date
            }
            None => {
                errors.push(ValidationFieldError::new(
                    "base::timestamp",
                    String::new(),
                    "/produceDate".into(),
                    vec![ValidationErrorKind::Required],
                ));
                None
            }
        };

        let email = params.manufacture_email.clone().unwrap_or_default();
        validation::collect(
            &mut errors,
            "base::email",
            "/manufactureEmail",
            email.clone(),
            validation::email(&email),
        );

        match date {
            Some(date) if errors.is_empty() => Ok(ProductKey::new(date, email)),
            _ => Err(ValidationError::from_resource(params.clone(), errors).into()),
        }
    }
}

/// Builds a key out of query parameters.
///
/// A request without any key parameter is a null argument, a partial or
/// malformed one is a validation failure.
pub fn parse_product_key(
    params: &ProductKeyParams,
) -> Result<ProductKey, ApplicationError<ProductKeyParams>> {
    if params.produce_date.is_none() && params.manufacture_email.is_none() {
        return Err(NullArgumentError::new("ProductKey").into());
    }
    validation::product_key(params)
}

/// Only the user whose email is the key's manufacture email may change the product.
pub fn ensure_owner(principal: &Principal, key: &ProductKey) -> Result<(), PermissionError> {
    if key.manufacture_email != principal.name {
        tracing::info!(
            principal = %principal.name,
            product = %key,
            "rejected change of a product owned by someone else"
        );
        return Err(PermissionError::NotOwner(key.manufacture_email.clone()));
    }
    Ok(())
}

pub async fn add_product<PR, UR>(
    products: &PR,
    users: &UR,
    principal: &Principal,
    dto: CreateProduct,
) -> Result<ProductResponse, ApplicationError<CreateProduct>>
where
    PR: ProductRepository + ?Sized,
    UR: UserRepository + ?Sized,
{
    validation::create_product(products, &dto).await?;

    let user = users
        .find_user_by_id(principal.id)
        .await?
        .ok_or(AuthenticationError::UnknownPrincipal)?;

    let key = ProductKey::new(timestamp_now(), principal.name.clone());
    let product = Product::new(
        key,
        dto.name,
        user.phone_number().clone(),
        dto.is_available.unwrap_or_default(),
    );

    products.add_product(&product).await?;
    let stored = products
        .get_product_by_key(product.key())
        .await?
        .ok_or(PersistenceError::NotFound)?;
    tracing::info!(product = %stored.key(), name = %stored.name(), "product created");

    Ok(stored.into())
}

pub async fn get_all_products<PR>(
    products: &PR,
    filter_email: Option<&str>,
) -> Result<Vec<ProductResponse>, ApplicationError<()>>
where
    PR: ProductRepository + ?Sized,
{
    let found = match filter_email.map(str::trim).filter(|email| !email.is_empty()) {
        Some(email) => {
            products
                .get_filtered_products(&ProductFilter::by_manufacture_email(email))
                .await?
        }
        None => products.get_all_products().await?,
    };

    Ok(found.iter().map(ProductResponse::from).collect())
}

pub async fn get_product_by_key<PR>(
    products: &PR,
    key: &ProductKey,
) -> Result<Option<ProductResponse>, ApplicationError<()>>
where
    PR: ProductRepository + ?Sized,
{
    let product = products.get_product_by_key(key).await?;
    Ok(product.map(ProductResponse::from))
}

pub async fn update_product<PR>(
    products: &PR,
    key: &ProductKey,
    dto: UpdateProduct,
) -> Result<Option<ProductResponse>, ApplicationError<UpdateProduct>>
where
    PR: ProductRepository + ?Sized,
{
    validation::update_product(&dto)?;

    let existing = match products.get_product_by_key(key).await? {
        Some(product) => product,
        None => return Ok(None),
    };

    let update = ProductUpdate {
        name: dto.name,
        is_available: dto.is_available.unwrap_or_default(),
    };
    let updated = match products.update_product(existing, &update).await? {
        Some(product) => product,
        None => return Ok(None),
    };
    tracing::info!(product = %key, name = %updated.name(), "product updated");

    Ok(Some(updated.into()))
}

pub async fn delete_product<PR>(
    products: &PR,
    key: &ProductKey,
) -> Result<Option<bool>, ApplicationError<()>>
where
    PR: ProductRepository + ?Sized,
{
    let existing = match products.get_product_by_key(key).await? {
        Some(product) => product,
        None => return Ok(None),
    };

    let deleted = products.delete_product(&existing).await?;
    tracing::info!(product = %key, deleted, "product deleted");

    Ok(Some(deleted))
}
