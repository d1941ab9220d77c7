use async_trait::async_trait;
use salvo::{
    handler,
    http::{
        header::{HeaderValue, LOCATION},
        StatusCode,
    },
    writer::Json,
    Depot, FlowCtrl, Handler, Request, Response,
};

use super::Dependencies;
use crate::{
    app::{
        resource::{
            iam::{RegisterUser, UserCredential},
            product::{CreateProduct, ProductKeyParams, UpdateProduct},
        },
        use_case,
    },
    domain::{datatype::security::Principal, entity::product::ProductKey},
    error::{
        app::ApplicationError,
        http::{BadRequest, NotFound},
        security::UnauthorizedError,
    },
};

macro_rules! map_res_err {
    ($result:ident, $response:ident) => {
        match $result {
            Err(err) => {
                $response.render(err);
                return;
            }
            Ok(ok) => ok,
        }
    };
}

const PRODUCT_RESOURCE: &str = "product::Product";

/// Extract a authorization token from a request.
///
/// Token must be formated in the Bearer authentication scheme
/// described in [RFC 6750](https://datatracker.ietf.org/doc/html/rfc6750)
fn extract_token<'req>(req: &'req Request) -> Result<&'req str, UnauthorizedError> {
    let scheme: Option<&str> = req.header("authorization");
    scheme
        .ok_or(UnauthorizedError::TokenNotPresent)?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(UnauthorizedError::MalformattedToken)
}

fn authenticate(req: &Request, deps: &Dependencies) -> Result<Principal, ApplicationError<()>> {
    let token = extract_token(req)?;
    Ok(use_case::iam::authenticate_token(
        deps.token_service.as_ref(),
        token,
    )?)
}

/// First query value present under any of `names`.
fn query_param(req: &Request, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| req.queries().get(*name).cloned())
}

fn extract_key_params(req: &Request) -> ProductKeyParams {
    ProductKeyParams {
        produce_date: query_param(req, &["ProduceDate", "produceDate"]),
        manufacture_email: query_param(req, &["ManufactureEmail", "manufactureEmail"]),
    }
}

fn extract_key(req: &Request) -> Result<ProductKey, ApplicationError<ProductKeyParams>> {
    use_case::product::parse_product_key(&extract_key_params(req))
}

fn product_location(key: &ProductKey) -> String {
    let params = ProductKeyParams::from(key);
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(date) = &params.produce_date {
        query.append_pair("ProduceDate", date);
    }
    if let Some(email) = &params.manufacture_email {
        query.append_pair("ManufactureEmail", email);
    }
    format!("/api/Product?{}", query.finish())
}

#[handler]
pub async fn home(res: &mut Response) {
    res.render("Product catalog API. See /api/Products");
}

pub struct ListProductsController {
    deps: Dependencies,
}

impl ListProductsController {
    pub fn new(deps: Dependencies) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl Handler for ListProductsController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let filter_email = query_param(req, &["filterEmail", "FilterEmail"]);

        let result =
            use_case::product::get_all_products(self.deps.products.as_ref(), filter_email.as_deref())
                .await;
        let products = map_res_err!(result, res);

        res.render(Json(products));
        res.set_status_code(StatusCode::OK);
    }
}

pub struct CreateProductController {
    deps: Dependencies,
}

impl CreateProductController {
    pub fn new(deps: Dependencies) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl Handler for CreateProductController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, &self.deps);
        let principal = map_res_err!(result, res);

        let result: Result<CreateProduct, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::product::add_product(
            self.deps.products.as_ref(),
            self.deps.users.as_ref(),
            &principal,
            dto,
        )
        .await;
        let product = map_res_err!(result, res);

        let location = product_location(&ProductKey::from(&product));
        match HeaderValue::from_str(&location) {
            Ok(value) => {
                res.headers_mut().insert(LOCATION, value);
            }
            Err(err) => tracing::warn!("invalid location header {location}: {err}"),
        }

        res.render(Json(product));
        res.set_status_code(StatusCode::CREATED);
    }
}

pub struct GetProductController {
    deps: Dependencies,
}

impl GetProductController {
    pub fn new(deps: Dependencies) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl Handler for GetProductController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = extract_key(req);
        let key = map_res_err!(result, res);

        let result = use_case::product::get_product_by_key(self.deps.products.as_ref(), &key).await;
        let found = map_res_err!(result, res);

        match found {
            Some(product) => {
                res.render(Json(product));
                res.set_status_code(StatusCode::OK);
            }
            None => res.render(NotFound::new(PRODUCT_RESOURCE)),
        }
    }
}

pub struct UpdateProductController {
    deps: Dependencies,
}

impl UpdateProductController {
    pub fn new(deps: Dependencies) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl Handler for UpdateProductController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, &self.deps);
        let principal = map_res_err!(result, res);

        let result = extract_key(req);
        let key = map_res_err!(result, res);

        let result =
            use_case::product::ensure_owner(&principal, &key).map_err(ApplicationError::<()>::from);
        map_res_err!(result, res);

        let result: Result<UpdateProduct, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result =
            use_case::product::update_product(self.deps.products.as_ref(), &key, dto).await;
        let updated = map_res_err!(result, res);

        match updated {
            Some(_) => {
                res.set_status_code(StatusCode::NO_CONTENT);
            }
            None => res.render(NotFound::new(PRODUCT_RESOURCE)),
        }
    }
}

pub struct DeleteProductController {
    deps: Dependencies,
}

impl DeleteProductController {
    pub fn new(deps: Dependencies) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl Handler for DeleteProductController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, &self.deps);
        let principal = map_res_err!(result, res);

        let result = extract_key(req);
        let key = map_res_err!(result, res);

        let result =
            use_case::product::ensure_owner(&principal, &key).map_err(ApplicationError::<()>::from);
        map_res_err!(result, res);

        let result = use_case::product::delete_product(self.deps.products.as_ref(), &key).await;
        let deleted = map_res_err!(result, res);

        match deleted {
            Some(_) => {
                res.set_status_code(StatusCode::NO_CONTENT);
            }
            None => res.render(NotFound::new(PRODUCT_RESOURCE)),
        }
    }
}

pub struct RegisterUserController {
    deps: Dependencies,
}

impl RegisterUserController {
    pub fn new(deps: Dependencies) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl Handler for RegisterUserController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result: Result<RegisterUser, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::iam::register_user(
            self.deps.users.as_ref(),
            self.deps.hash_service.as_ref(),
            self.deps.token_service.as_ref(),
            dto,
        )
        .await;
        let auth_response = map_res_err!(result, res);

        res.render(Json(auth_response));
        res.set_status_code(StatusCode::CREATED);
    }
}

pub struct AuthenticateUserController {
    deps: Dependencies,
}

impl AuthenticateUserController {
    pub fn new(deps: Dependencies) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl Handler for AuthenticateUserController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result: Result<UserCredential, _> = req.parse_body().await.map_err(BadRequest::from);
        let credential = map_res_err!(result, res);

        let result = use_case::iam::authenticate_user(
            self.deps.users.as_ref(),
            self.deps.hash_service.as_ref(),
            self.deps.token_service.as_ref(),
            credential,
        )
        .await;
        let auth_response = map_res_err!(result, res);

        res.render(Json(auth_response));
        res.set_status_code(StatusCode::OK);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn location_points_at_the_product_query() {
        let key = ProductKey::new(
            DateTime::parse_from_rfc3339("2022-10-03T12:30:00.000250Z")
                .unwrap()
                .with_timezone(&Utc),
            "maker+one@example.com".into(),
        );

        assert_eq!(
            product_location(&key),
            "/api/Product?ProduceDate=2022-10-03T12%3A30%3A00.000250Z&ManufactureEmail=maker%2Bone%40example.com"
        );
    }
}
