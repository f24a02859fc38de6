//! Optimistic concurrency for products.
//!
//! Every mutation that targets an existing product must name the version it
//! was based on. The handler compares that claim against the stored version
//! and only writes when they agree, bumping the version by one. There are no
//! locks: the store serializes single operations, nothing more.

use tracing::{debug, error, info, instrument, warn};

use crate::clients::ProductClient;
use crate::domain::{EntityTag, Product, ProductCreate, ProductId, ProductUpdate};
use crate::product_actor::ProductError;

/// A stored product together with its concurrency token and locator.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRepresentation {
    pub product: Product,
    pub etag: EntityTag,
    pub location: String,
}

impl From<Product> for ProductRepresentation {
    fn from(product: Product) -> Self {
        Self {
            etag: EntityTag::new(product.version),
            location: product.location(),
            product,
        }
    }
}

#[derive(Clone)]
pub struct ProductHandler {
    store: ProductClient,
}

impl ProductHandler {
    pub fn new(store: ProductClient) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, id: ProductId) -> Result<ProductRepresentation, ProductError> {
        match self.store.get_product(id).await? {
            Some(product) => Ok(product.into()),
            None => {
                debug!("Product not found");
                Err(ProductError::NotFound(id))
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Product>, ProductError> {
        let products = self.store.list_products().await?;
        debug!(product_count = products.len(), "Listed products");
        Ok(products)
    }

    /// Creation carries no precondition and never conflicts.
    #[instrument(skip(self, params), fields(product_name = %params.name))]
    pub async fn create(
        &self,
        params: ProductCreate,
    ) -> Result<ProductRepresentation, ProductError> {
        let stored = self.store.create_product(params.into()).await?;
        info!(product_id = stored.id, version = stored.version, "Product created");
        Ok(stored.into())
    }

    /// Applies `update` only if `claimed` names the currently stored version.
    ///
    /// Existence is checked before the version. The write itself can still
    /// report `NotFound` if the product was deleted after the check.
    #[instrument(skip(self, update, claimed), fields(claimed_version = claimed.version()))]
    pub async fn update(
        &self,
        id: ProductId,
        update: ProductUpdate,
        claimed: EntityTag,
    ) -> Result<ProductRepresentation, ProductError> {
        let existing = self
            .store
            .get_product(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        info!(stored = existing.version, "Checking If-Match against stored version");
        if !claimed.matches(existing.version) {
            warn!(stored = existing.version, "Rejecting stale update");
            return Err(ProductError::VersionConflict {
                current: existing.version,
                claimed: claimed.version(),
            });
        }

        let next = existing.next_revision(update).ok_or_else(|| {
            error!(stored = existing.version, "Version cannot be incremented");
            ProductError::Internal(format!("version of product {id} is exhausted"))
        })?;

        let stored = self.store.update_product(next).await?;
        info!(version = stored.version, "Product updated");
        Ok(stored.into())
    }

    /// Deletes regardless of version. A store failure after the existence
    /// check is reported as `Internal`, whatever its cause.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<(), ProductError> {
        if self.store.get_product(id).await?.is_none() {
            debug!("Product not found");
            return Err(ProductError::NotFound(id));
        }

        self.store.delete_product(id).await.map_err(|e| {
            error!(error = %e, "Deleting product failed");
            ProductError::Internal(e.to_string())
        })?;
        info!("Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::{FrameworkError, ResourceActor};
    use crate::mock_framework::{create_mock_client, expect_delete, expect_get, expect_update};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn start_handler() -> ProductHandler {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || counter.fetch_add(1, Ordering::SeqCst);
        let (actor, client) = ResourceActor::<Product>::new(10, next_id);
        tokio::spawn(actor.run());
        ProductHandler::new(ProductClient::new(client))
    }

    fn widget() -> ProductCreate {
        ProductCreate { name: "Widget".into(), quantity: 10, version: None }
    }

    fn renamed(name: &str, quantity: i64) -> ProductUpdate {
        ProductUpdate { name: name.into(), quantity }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_initial_version() {
        let handler = start_handler();

        let created = handler.create(widget()).await.unwrap();

        assert_eq!(created.product.id, 1);
        assert_eq!(created.product.version, 1);
        assert_eq!(created.etag.to_string(), "\"1\"");
        assert_eq!(created.location, "/product/1");
    }

    #[tokio::test]
    async fn test_create_keeps_supplied_version() {
        let handler = start_handler();

        let created = handler
            .create(ProductCreate { version: Some(5), ..widget() })
            .await
            .unwrap();

        assert_eq!(created.product.version, 5);
        assert_eq!(created.etag, EntityTag::new(5));
    }

    #[tokio::test]
    async fn test_fetch_returns_token_and_locator() {
        let handler = start_handler();
        handler.create(widget()).await.unwrap();

        let fetched = handler.fetch(1).await.unwrap();

        assert_eq!(fetched.product.name, "Widget");
        assert_eq!(fetched.etag.to_string(), "\"1\"");
        assert_eq!(fetched.location, "/product/1");
    }

    #[tokio::test]
    async fn test_fetch_missing_is_not_found() {
        let handler = start_handler();
        assert_eq!(handler.fetch(1).await, Err(ProductError::NotFound(1)));
    }

    #[tokio::test]
    async fn test_update_with_current_token_bumps_version_once() {
        let handler = start_handler();
        handler.create(widget()).await.unwrap();

        let updated = handler.update(1, renamed("Gadget", 3), EntityTag::new(1)).await.unwrap();

        assert_eq!(updated.product.version, 2);
        assert_eq!(updated.product.name, "Gadget");
        assert_eq!(updated.product.quantity, 3);
        assert_eq!(updated.etag.to_string(), "\"2\"");
        assert_eq!(handler.fetch(1).await.unwrap().product.version, 2);
    }

    #[tokio::test]
    async fn test_update_with_stale_token_conflicts_and_leaves_store_alone() {
        let handler = start_handler();
        handler.create(widget()).await.unwrap();
        handler.update(1, renamed("Gadget", 3), EntityTag::new(1)).await.unwrap();

        let err = handler.update(1, renamed("Gizmo", 0), EntityTag::new(1)).await.unwrap_err();

        assert_eq!(err, ProductError::VersionConflict { current: 2, claimed: 1 });
        let stored = handler.fetch(1).await.unwrap().product;
        assert_eq!(stored.name, "Gadget");
        assert_eq!(stored.version, 2);
    }

    #[tokio::test]
    async fn test_replayed_token_never_succeeds_twice() {
        let handler = start_handler();
        handler.create(widget()).await.unwrap();

        let first = handler.update(1, renamed("A", 1), EntityTag::new(1)).await;
        let second = handler.update(1, renamed("A", 1), EntityTag::new(1)).await;
        let third = handler.update(1, renamed("A", 1), EntityTag::new(1)).await;

        assert!(first.is_ok());
        assert!(matches!(second, Err(ProductError::VersionConflict { .. })));
        assert!(matches!(third, Err(ProductError::VersionConflict { .. })));
        assert_eq!(handler.fetch(1).await.unwrap().product.version, 2);
    }

    #[tokio::test]
    async fn test_token_ahead_of_store_conflicts() {
        let handler = start_handler();
        handler.create(widget()).await.unwrap();

        let err = handler.update(1, renamed("A", 1), EntityTag::new(2)).await.unwrap_err();
        assert_eq!(err, ProductError::VersionConflict { current: 1, claimed: 2 });
    }

    #[tokio::test]
    async fn test_update_at_max_version_is_internal_and_keeps_record() {
        let handler = start_handler();
        handler
            .create(ProductCreate { version: Some(u64::MAX), ..widget() })
            .await
            .unwrap();

        let err = handler
            .update(1, renamed("Gadget", 3), EntityTag::new(u64::MAX))
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::Internal(_)));
        let stored = handler.fetch(1).await.unwrap().product;
        assert_eq!(stored.name, "Widget");
        assert_eq!(stored.version, u64::MAX);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let handler = start_handler();

        let err = handler.update(99, renamed("A", 1), EntityTag::new(1)).await.unwrap_err();
        assert_eq!(err, ProductError::NotFound(99));
    }

    #[tokio::test]
    async fn test_delete_then_fetch_is_not_found() {
        let handler = start_handler();
        handler.create(widget()).await.unwrap();

        handler.delete(1).await.unwrap();

        assert_eq!(handler.fetch(1).await, Err(ProductError::NotFound(1)));
        assert_eq!(handler.delete(1).await, Err(ProductError::NotFound(1)));
    }

    #[tokio::test]
    async fn test_fetch_all_lists_every_product() {
        let handler = start_handler();
        handler.create(widget()).await.unwrap();
        handler
            .create(ProductCreate { name: "Gadget".into(), quantity: 5, version: None })
            .await
            .unwrap();

        let names: Vec<String> = handler
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, vec!["Widget", "Gadget"]);
    }

    fn stored(version: u64) -> Product {
        Product { id: 1, name: "Widget".into(), quantity: 10, version }
    }

    #[tokio::test]
    async fn test_update_lost_to_concurrent_delete_is_not_found() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let handler = ProductHandler::new(ProductClient::new(client));

        let task = tokio::spawn(async move {
            handler.update(1, renamed("Gadget", 3), EntityTag::new(1)).await
        });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get");
        assert_eq!(id, 1);
        responder.send(Ok(Some(stored(1)))).unwrap();

        let (written, responder) = expect_update(&mut receiver).await.expect("Expected Update");
        assert_eq!(written.version, 2);
        assert_eq!(written.name, "Gadget");
        responder.send(Err(FrameworkError::NotFound("1".into()))).unwrap();

        assert_eq!(task.await.unwrap(), Err(ProductError::NotFound(1)));
    }

    #[tokio::test]
    async fn test_conflict_sends_no_write() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let handler = ProductHandler::new(ProductClient::new(client));

        let task = tokio::spawn(async move {
            handler.update(1, renamed("Gadget", 3), EntityTag::new(1)).await
        });

        let (_, responder) = expect_get(&mut receiver).await.expect("Expected Get");
        responder.send(Ok(Some(stored(2)))).unwrap();

        assert_eq!(
            task.await.unwrap(),
            Err(ProductError::VersionConflict { current: 2, claimed: 1 })
        );
        // The handler (and its client) is gone; nothing else was queued.
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_delete_is_internal() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let handler = ProductHandler::new(ProductClient::new(client));

        let task = tokio::spawn(async move { handler.delete(1).await });

        let (_, responder) = expect_get(&mut receiver).await.expect("Expected Get");
        responder.send(Ok(Some(stored(1)))).unwrap();

        let (id, responder) = expect_delete(&mut receiver).await.expect("Expected Delete");
        assert_eq!(id, 1);
        responder.send(Err(FrameworkError::NotFound("1".into()))).unwrap();

        assert!(matches!(task.await.unwrap(), Err(ProductError::Internal(_))));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_internal() {
        let (client, receiver) = create_mock_client::<Product>(10);
        drop(receiver);
        let handler = ProductHandler::new(ProductClient::new(client));

        assert!(matches!(handler.fetch(1).await, Err(ProductError::Internal(_))));
        assert!(matches!(handler.fetch_all().await, Err(ProductError::Internal(_))));
        assert!(matches!(handler.create(widget()).await, Err(ProductError::Internal(_))));
        assert!(matches!(
            handler.update(1, renamed("A", 1), EntityTag::new(1)).await,
            Err(ProductError::Internal(_))
        ));
    }
}
