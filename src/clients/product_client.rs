use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::Product;
use crate::product_actor::ProductError;

/// Client for interacting with the Product actor.
///
/// This is the product store as the rest of the service sees it: plain CRUD,
/// no version checks.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    /// Stores `product` under a fresh id and returns the stored copy.
    #[instrument(skip(self, product), fields(product_name = %product.name))]
    pub async fn create_product(&self, product: Product) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner
            .create(product)
            .await
            .map_err(|e| ProductError::Internal(e.to_string()))
    }

    /// Overwrites the full record at `product.id`, version included.
    #[instrument(skip(self, product), fields(product_id = %product.id, version = product.version))]
    pub async fn update_product(&self, product: Product) -> Result<Product, ProductError> {
        debug!("Sending request");
        let id = product.id;
        self.inner
            .update(product)
            .await
            .map_err(|e| ProductError::from_store(id, e))
    }
}
