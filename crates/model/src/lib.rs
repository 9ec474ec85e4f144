pub mod core;
pub mod error;
pub mod filter;
pub mod query;

pub use error::{FilterError, FilterResult};
