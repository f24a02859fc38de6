use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::handler::ProductHandler;

use super::handlers;

pub fn router(handler: Arc<ProductHandler>) -> Router {
    Router::new()
        .route("/products", get(handlers::list_products))
        .route("/product", post(handlers::create_product))
        .route(
            "/product/{id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .layer(Extension(handler))
}
