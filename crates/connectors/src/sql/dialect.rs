//! Defines the `Dialect` trait for database-specific SQL syntax.

use crate::error::SqlError;
use model::filter::Lookup;

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect.
    ///
    /// - PostgreSQL uses double quotes: `"my_column"`
    /// - MySQL uses backticks: `` `my_column` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for a parameterized query.
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    /// - MySQL uses `?`
    fn get_placeholder(&self, index: usize) -> String;

    /// Returns the name of the dialect (e.g., "PostgreSQL", "MySQL").
    fn name(&self) -> String;

    /// Extracts a date part such as `YEAR` from an already rendered `expr`.
    fn date_part(&self, part: &str, expr: &str) -> String;
}

/// Resolves a dialect by its command-line name.
pub fn from_name(name: &str) -> Result<Box<dyn Dialect>, SqlError> {
    match name.to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" | "pg" => Ok(Box::new(Postgres)),
        "mysql" => Ok(Box::new(MySql)),
        other => Err(SqlError::UnknownDialect(other.to_string())),
    }
}

/// SQL keyword for a date-part lookup.
pub fn date_part_name(lookup: Lookup) -> Option<&'static str> {
    match lookup {
        Lookup::Year => Some("YEAR"),
        Lookup::Month => Some("MONTH"),
        Lookup::Day => Some("DAY"),
        Lookup::Hour => Some("HOUR"),
        Lookup::Minute => Some("MINUTE"),
        Lookup::Second => Some("SECOND"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }

    fn get_placeholder(&self, index: usize) -> String {
        // PostgreSQL uses $1, $2, etc.
        format!("${}", index + 1)
    }

    fn name(&self) -> String {
        "PostgreSQL".into()
    }

    fn date_part(&self, part: &str, expr: &str) -> String {
        format!("EXTRACT({part} FROM {expr})")
    }
}

#[derive(Debug, Clone)]
pub struct MySql;

impl Dialect for MySql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn get_placeholder(&self, _index: usize) -> String {
        // MySQL uses ?
        "?".into()
    }

    fn name(&self) -> String {
        "MySQL".into()
    }

    fn date_part(&self, part: &str, expr: &str) -> String {
        format!("{part}({expr})")
    }
}
