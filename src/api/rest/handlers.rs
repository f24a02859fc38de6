use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::http::header::{ETAG, IF_MATCH, LOCATION};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::domain::{EntityTag, EntityTagParseError, ProductId};
use crate::handler::{ProductHandler, ProductRepresentation};

use super::dto::{ProductDto, ProductRequest};
use super::error::ApiError;

pub type ApiResult<T> = Result<T, ApiError>;

pub async fn get_product(
    Extension(svc): Extension<Arc<ProductHandler>>,
    Path(id): Path<ProductId>,
) -> ApiResult<Response> {
    let rep = svc.fetch(id).await?;
    represent(StatusCode::OK, rep)
}

pub async fn list_products(
    Extension(svc): Extension<Arc<ProductHandler>>,
) -> ApiResult<Json<Vec<ProductDto>>> {
    let products = svc.fetch_all().await?;
    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

/// `If-Match` is not consulted on create.
pub async fn create_product(
    Extension(svc): Extension<Arc<ProductHandler>>,
    Json(req): Json<ProductRequest>,
) -> ApiResult<Response> {
    tracing::info!(product_name = %req.name, "Creating new product");
    let rep = svc.create(req.into()).await?;
    represent(StatusCode::CREATED, rep)
}

pub async fn update_product(
    Extension(svc): Extension<Arc<ProductHandler>>,
    Path(id): Path<ProductId>,
    headers: HeaderMap,
    Json(req): Json<ProductRequest>,
) -> ApiResult<Response> {
    let claimed = if_match(&headers)?;
    tracing::info!(product_id = id, if_match = %claimed, "Updating product");
    let rep = svc.update(id, req.into(), claimed).await?;
    represent(StatusCode::OK, rep)
}

pub async fn delete_product(
    Extension(svc): Extension<Arc<ProductHandler>>,
    Path(id): Path<ProductId>,
) -> ApiResult<StatusCode> {
    tracing::info!(product_id = id, "Deleting product");
    svc.delete(id).await?;
    Ok(StatusCode::OK)
}

fn if_match(headers: &HeaderMap) -> ApiResult<EntityTag> {
    let raw = headers.get(IF_MATCH).ok_or(ApiError::MissingIfMatch)?;
    let text = raw
        .to_str()
        .map_err(|_| EntityTagParseError(String::from_utf8_lossy(raw.as_bytes()).into_owned()))?;
    Ok(text.parse::<EntityTag>()?)
}

/// Body plus the `ETag` and `Location` headers shared by get, create and update.
fn represent(status: StatusCode, rep: ProductRepresentation) -> ApiResult<Response> {
    let etag = HeaderValue::from_str(&rep.etag.to_string())?;
    let location = HeaderValue::from_str(&rep.location)?;
    Ok((
        status,
        [(ETAG, etag), (LOCATION, location)],
        Json(ProductDto::from(rep.product)),
    )
        .into_response())
}
