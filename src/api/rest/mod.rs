//! HTTP transport for the product handler.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

pub use routes::router;
