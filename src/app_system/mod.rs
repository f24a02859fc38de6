//! System orchestration, configuration, startup, and shutdown logic.

pub mod config;
pub mod logging;
pub mod product_system;

pub use config::*;
pub use logging::*;
pub use product_system::*;
