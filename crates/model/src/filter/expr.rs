use crate::core::literal::Literal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used when a field path is flattened into a single token.
pub const DEFAULT_SEPARATOR: &str = "__";

/// Value-producing node of a compiled filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Literal(Literal),
    FieldPath(FieldPath),
    /// Composite call such as `concat`. Arguments keep their source order and
    /// nested calls stay nested.
    FunctionCall {
        name: String,
        args: Vec<Expression>,
    },
    Arithmetic {
        op: ArithOp,
        left: FieldPath,
        right: Literal,
    },
}

impl Expression {
    pub fn field(segments: &[&str]) -> Self {
        Expression::FieldPath(FieldPath::new(
            segments.iter().map(|s| s.to_string()).collect(),
        ))
    }

    pub fn literal(value: impl Into<Literal>) -> Self {
        Expression::Literal(value.into())
    }

    pub fn as_field(&self) -> Option<&FieldPath> {
        match self {
            Expression::FieldPath(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Expression::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

impl From<Literal> for Expression {
    fn from(value: Literal) -> Self {
        Expression::Literal(value)
    }
}

impl From<FieldPath> for Expression {
    fn from(value: FieldPath) -> Self {
        Expression::FieldPath(value)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(lit) => write!(f, "{lit}"),
            Expression::FieldPath(path) => write!(f, "{path}"),
            Expression::FunctionCall { name, args } => {
                let args = args.iter().map(|a| a.to_string()).collect::<Vec<_>>();
                write!(f, "{}({})", name, args.join(", "))
            }
            Expression::Arithmetic { op, left, right } => write!(f, "{left} {op} {right}"),
        }
    }
}

/// Navigation path to a (possibly related) field, plus the qualifier chain
/// applied to it by lookup-transform functions. The chain is ordered
/// innermost-first: `trim(toupper(Name))` yields `[Upper, Trim]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath {
    pub segments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lookups: Vec<Lookup>,
}

impl FieldPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self {
            segments,
            lookups: Vec::new(),
        }
    }

    /// Splits an OData navigation path (`Address/City`) into segments.
    pub fn from_navigation(path: &str) -> Self {
        Self::new(path.split('/').map(|s| s.to_string()).collect())
    }

    /// Returns a copy of this path with `lookup` applied last.
    pub fn with_lookup(mut self, lookup: Lookup) -> Self {
        self.lookups.push(lookup);
        self
    }

    pub fn is_plain(&self) -> bool {
        self.lookups.is_empty()
    }

    /// Flattens segments and lookups into a single qualifier token, e.g.
    /// `CompanyName__upper__trim`.
    pub fn token(&self, separator: &str) -> String {
        self.segments
            .iter()
            .map(String::as_str)
            .chain(self.lookups.iter().map(|l| l.as_str()))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token(DEFAULT_SEPARATOR))
    }
}

/// Field qualifiers a backend can push down as part of a field lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lookup {
    Contains,
    StartsWith,
    EndsWith,
    Length,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Lower,
    Upper,
    Trim,
    Ceil,
    Floor,
    Round,
    IsNull,
}

impl Lookup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lookup::Contains => "contains",
            Lookup::StartsWith => "startswith",
            Lookup::EndsWith => "endswith",
            Lookup::Length => "length",
            Lookup::Year => "year",
            Lookup::Month => "month",
            Lookup::Day => "day",
            Lookup::Hour => "hour",
            Lookup::Minute => "minute",
            Lookup::Second => "second",
            Lookup::Lower => "lower",
            Lookup::Upper => "upper",
            Lookup::Trim => "trim",
            Lookup::Ceil => "ceil",
            Lookup::Floor => "floor",
            Lookup::Round => "round",
            Lookup::IsNull => "isnull",
        }
    }

    /// Lookups that turn a field into a boolean test rather than a new value.
    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            Lookup::Contains | Lookup::StartsWith | Lookup::EndsWith | Lookup::IsNull
        )
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        }
    }
}

impl std::str::FromStr for ArithOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(ArithOp::Add),
            "sub" => Ok(ArithOp::Sub),
            "mul" => Ok(ArithOp::Mul),
            "div" => Ok(ArithOp::Div),
            "mod" => Ok(ArithOp::Mod),
            _ => Err(format!("Unsupported arithmetic operator: {s}")),
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
