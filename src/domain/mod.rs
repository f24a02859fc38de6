pub mod etag;
pub mod product;

pub use etag::*;
pub use product::*;
