//! Dispatch table for `$filter` functions.

use model::{
    error::{FilterError, FilterResult},
    filter::Lookup,
};

/// How a function's result is represented once compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Boolean string test on a field, compiled to a predicate.
    Match(Lookup),
    /// Qualifier appended to the field's lookup chain.
    Transform(Lookup),
    /// Composite value that stays a function call.
    Composition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn check(&self, function: &str, found: usize) -> FilterResult<()> {
        let message = match *self {
            Arity::Exactly(n) if found != n => {
                format!("expected {n} argument(s), found {found}")
            }
            Arity::AtLeast(n) if found < n => {
                format!("expected at least {n} arguments, found {found}")
            }
            _ => return Ok(()),
        };
        Err(FilterError::argument(function, message))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Function {
    Contains,
    SubstringOf,
    StartsWith,
    EndsWith,
    Length,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    ToLower,
    ToUpper,
    Trim,
    Ceiling,
    Floor,
    Round,
    Concat,
    Unsupported(String),
}

impl Function {
    /// Looks a function up by name, ignoring ASCII case.
    pub fn resolve(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "contains" => Function::Contains,
            "substringof" => Function::SubstringOf,
            "startswith" => Function::StartsWith,
            "endswith" => Function::EndsWith,
            "length" => Function::Length,
            "year" => Function::Year,
            "month" => Function::Month,
            "day" => Function::Day,
            "hour" => Function::Hour,
            "minute" => Function::Minute,
            "second" => Function::Second,
            "tolower" => Function::ToLower,
            "toupper" => Function::ToUpper,
            "trim" => Function::Trim,
            "ceiling" => Function::Ceiling,
            "floor" => Function::Floor,
            "round" => Function::Round,
            "concat" => Function::Concat,
            _ => Function::Unsupported(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Function::Contains => "contains",
            Function::SubstringOf => "substringof",
            Function::StartsWith => "startswith",
            Function::EndsWith => "endswith",
            Function::Length => "length",
            Function::Year => "year",
            Function::Month => "month",
            Function::Day => "day",
            Function::Hour => "hour",
            Function::Minute => "minute",
            Function::Second => "second",
            Function::ToLower => "tolower",
            Function::ToUpper => "toupper",
            Function::Trim => "trim",
            Function::Ceiling => "ceiling",
            Function::Floor => "floor",
            Function::Round => "round",
            Function::Concat => "concat",
            Function::Unsupported(name) => name,
        }
    }

    /// `None` for unsupported functions.
    pub fn kind(&self) -> Option<FunctionKind> {
        let kind = match self {
            Function::Contains | Function::SubstringOf => FunctionKind::Match(Lookup::Contains),
            Function::StartsWith => FunctionKind::Match(Lookup::StartsWith),
            Function::EndsWith => FunctionKind::Match(Lookup::EndsWith),
            Function::Length => FunctionKind::Transform(Lookup::Length),
            Function::Year => FunctionKind::Transform(Lookup::Year),
            Function::Month => FunctionKind::Transform(Lookup::Month),
            Function::Day => FunctionKind::Transform(Lookup::Day),
            Function::Hour => FunctionKind::Transform(Lookup::Hour),
            Function::Minute => FunctionKind::Transform(Lookup::Minute),
            Function::Second => FunctionKind::Transform(Lookup::Second),
            Function::ToLower => FunctionKind::Transform(Lookup::Lower),
            Function::ToUpper => FunctionKind::Transform(Lookup::Upper),
            Function::Trim => FunctionKind::Transform(Lookup::Trim),
            Function::Ceiling => FunctionKind::Transform(Lookup::Ceil),
            Function::Floor => FunctionKind::Transform(Lookup::Floor),
            Function::Round => FunctionKind::Transform(Lookup::Round),
            Function::Concat => FunctionKind::Composition,
            Function::Unsupported(_) => return None,
        };
        Some(kind)
    }

    pub fn arity(&self) -> Arity {
        match self.kind() {
            Some(FunctionKind::Match(_)) => Arity::Exactly(2),
            Some(FunctionKind::Composition) => Arity::AtLeast(2),
            _ => Arity::Exactly(1),
        }
    }

    /// True when the field may appear as either argument.
    pub fn accepts_either_order(&self) -> bool {
        matches!(self, Function::SubstringOf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_ignores_case() {
        assert_eq!(Function::resolve("ToUpper"), Function::ToUpper);
        assert_eq!(Function::resolve("SUBSTRINGOF"), Function::SubstringOf);
        assert_eq!(
            Function::resolve("indexof"),
            Function::Unsupported("indexof".into())
        );
        assert_eq!(Function::resolve("indexof").kind(), None);
    }

    #[test]
    fn test_qualifier_tokens() {
        let cases = vec![
            ("tolower", FunctionKind::Transform(Lookup::Lower)),
            ("toupper", FunctionKind::Transform(Lookup::Upper)),
            ("ceiling", FunctionKind::Transform(Lookup::Ceil)),
            ("year", FunctionKind::Transform(Lookup::Year)),
            ("substringof", FunctionKind::Match(Lookup::Contains)),
            ("endswith", FunctionKind::Match(Lookup::EndsWith)),
            ("concat", FunctionKind::Composition),
        ];

        for (name, expected) in cases {
            assert_eq!(Function::resolve(name).kind(), Some(expected), "{}", name);
        }
    }

    #[test]
    fn test_arity() {
        assert!(Function::Length.arity().check("length", 1).is_ok());
        assert!(Function::Length.arity().check("length", 2).is_err());
        assert!(Function::Contains.arity().check("contains", 1).is_err());
        assert!(Function::Concat.arity().check("concat", 5).is_ok());
        assert_eq!(
            Function::Concat.arity().check("concat", 1),
            Err(FilterError::argument(
                "concat",
                "expected at least 2 arguments, found 1"
            ))
        );
    }
}
