use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::Router;
use tracing::{error, info, instrument};

use crate::actor_framework::ResourceActor;
use crate::api::rest;
use crate::clients::ProductClient;
use crate::domain::Product;
use crate::handler::ProductHandler;

use super::StoreConfig;

/// Starts the product store actor and wires the handler on top of it.
pub struct ProductSystem {
    pub product_client: ProductClient,
    pub handler: Arc<ProductHandler>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl ProductSystem {
    #[instrument(name = "product_system", skip(config))]
    pub fn new(config: &StoreConfig) -> Self {
        info!(
            buffer_size = config.buffer_size,
            first_id = config.first_id,
            "Starting product system"
        );

        let id_counter = Arc::new(AtomicU64::new(config.first_id));
        let next_product_id = move || id_counter.fetch_add(1, Ordering::SeqCst);

        let (product_actor, product_resource_client) =
            ResourceActor::<Product>::new(config.buffer_size, next_product_id);
        let product_client = ProductClient::new(product_resource_client);
        let product_handle = tokio::spawn(product_actor.run());

        let handler = Arc::new(ProductHandler::new(product_client.clone()));

        Self {
            product_client,
            handler,
            handles: vec![product_handle],
        }
    }

    pub fn router(&self) -> Router {
        rest::router(self.handler.clone())
    }

    /// Drops this system's clients and waits for the actor to drain.
    ///
    /// The actor only stops once every clone of its client is gone, so any
    /// router built from [`Self::router`] must have been dropped first.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> anyhow::Result<()> {
        info!("Shutting down product system");

        drop(self.handler);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(anyhow::anyhow!("actor task failed: {e}"));
            }
        }

        info!("Product system shutdown complete");
        Ok(())
    }
}
