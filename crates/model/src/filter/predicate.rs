use crate::filter::expr::Expression;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relational operators accepted by `$filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelOp::Eq => "eq",
            RelOp::Ne => "ne",
            RelOp::Lt => "lt",
            RelOp::Le => "le",
            RelOp::Gt => "gt",
            RelOp::Ge => "ge",
        }
    }

    /// True for the operators that impose an ordering (`lt, le, gt, ge`).
    pub fn is_ordering(&self) -> bool {
        matches!(self, RelOp::Lt | RelOp::Le | RelOp::Gt | RelOp::Ge)
    }
}

impl std::str::FromStr for RelOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(RelOp::Eq),
            "ne" => Ok(RelOp::Ne),
            "lt" => Ok(RelOp::Lt),
            "le" => Ok(RelOp::Le),
            "gt" => Ok(RelOp::Gt),
            "ge" => Ok(RelOp::Ge),
            _ => Err(format!("Unsupported relational operator: {s}")),
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean-valued node of a compiled filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Comparison {
        left: Expression,
        op: RelOp,
        right: Expression,
    },
    Not(Box<Predicate>),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn comparison(left: Expression, op: RelOp, right: Expression) -> Self {
        Predicate::Comparison { left, op, right }
    }

    pub fn negate(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Predicate, right: Predicate) -> Self {
        Predicate::Or(Box::new(left), Box::new(right))
    }

    /// Number of `Comparison` leaves in this tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Predicate::Comparison { .. } => 1,
            Predicate::Not(inner) => inner.leaf_count(),
            Predicate::And(l, r) | Predicate::Or(l, r) => l.leaf_count() + r.leaf_count(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Comparison { left, op, right } => write!(f, "{left} {op} {right}"),
            Predicate::Not(inner) => write!(f, "not ({inner})"),
            Predicate::And(l, r) => write!(f, "({l} and {r})"),
            Predicate::Or(l, r) => write!(f, "({l} or {r})"),
        }
    }
}
