pub mod backend;
pub mod dialect;
pub mod filter;
pub mod renderer;

pub use backend::{RenderedFilter, SqlBackend};
pub use dialect::Dialect;
