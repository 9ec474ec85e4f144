pub mod backend;
pub mod compiler;
pub mod error;
pub mod functions;
pub mod merge;
pub mod query;
pub mod settings;

pub use compiler::{Compiler, compile};
pub use error::{PlanError, PlanResult};
pub use settings::FilterSettings;
