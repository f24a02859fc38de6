use serde::{Deserialize, Serialize};

use crate::domain::{Product, ProductCreate, ProductUpdate};

/// A product as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: u64,
    pub name: String,
    pub quantity: i64,
    pub version: u64,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            quantity: p.quantity,
            version: p.version,
        }
    }
}

/// Request body for create and update.
///
/// Any `id` in the body is ignored (unknown fields are dropped). `version` is
/// only honoured on create; updates take their version from `If-Match`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub quantity: i64,
    #[serde(default)]
    pub version: Option<u64>,
}

impl From<ProductRequest> for ProductCreate {
    fn from(req: ProductRequest) -> Self {
        Self {
            name: req.name,
            quantity: req.quantity,
            version: req.version,
        }
    }
}

impl From<ProductRequest> for ProductUpdate {
    fn from(req: ProductRequest) -> Self {
        Self {
            name: req.name,
            quantity: req.quantity,
        }
    }
}
