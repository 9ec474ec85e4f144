pub mod plan;
pub mod range;

pub use plan::QueryPlan;
pub use range::RowRange;
