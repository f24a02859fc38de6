use crate::actor_framework::Entity;
use crate::domain::{Product, ProductId, INITIAL_VERSION};

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &ProductId {
        &self.id
    }

    fn assign_id(&mut self, id: ProductId) {
        self.id = id;
    }

    /// Keeps the `version >= 1` invariant for products created with an explicit zero.
    fn on_create(&mut self) {
        if self.version == 0 {
            self.version = INITIAL_VERSION;
        }
    }
}
