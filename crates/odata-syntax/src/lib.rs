pub mod ast;
pub mod builder;
pub mod error;
pub mod parser;
pub mod tree;

pub use builder::parse;
