/// Store-assigned product identifier.
pub type ProductId = u64;

/// Version given to a product created without one.
pub const INITIAL_VERSION: u64 = 1;

/// Represents a product in the inventory.
///
/// `version` starts at whatever the creator supplied (or [`INITIAL_VERSION`])
/// and grows by exactly one per accepted update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub quantity: i64,
    pub version: u64,
}

/// Payload for creating a new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCreate {
    pub name: String,
    pub quantity: i64,
    pub version: Option<u64>,
}

/// Full replacement of the mutable fields of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: String,
    pub quantity: i64,
}

impl Product {
    /// Creates a Product that has not been stored yet.
    ///
    /// # Notes
    /// The `id` is left at zero; the store assigns the real one.
    #[cfg(test)]
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            quantity,
            version: INITIAL_VERSION,
        }
    }

    /// The canonical locator of this product, e.g. `/product/7`.
    pub fn location(&self) -> String {
        format!("/product/{}", self.id)
    }

    /// The record that replaces `self` once an update has passed its version check.
    ///
    /// Returns `None` when the version is already `u64::MAX` and cannot grow.
    pub fn next_revision(&self, update: ProductUpdate) -> Option<Self> {
        Some(Self {
            id: self.id,
            name: update.name,
            quantity: update.quantity,
            version: self.version.checked_add(1)?,
        })
    }
}

impl From<ProductCreate> for Product {
    fn from(params: ProductCreate) -> Self {
        Self {
            id: 0,
            name: params.name,
            quantity: params.quantity,
            version: params.version.unwrap_or(INITIAL_VERSION),
        }
    }
}
