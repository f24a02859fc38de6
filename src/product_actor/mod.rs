//! Product-specific store behaviour and the error type shared by the product layers.

pub mod entity;
pub mod error;

pub use error::*;
