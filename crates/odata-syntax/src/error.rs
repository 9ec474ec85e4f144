use crate::parser::Rule;
use model::error::FilterError;
use pest::error::{Error as PestError, ErrorVariant, InputLocation, LineColLocation};

/// Longest slice of unmatched input quoted back in a syntax error.
const FRAGMENT_LEN: usize = 24;

/// Converts a pest failure into `FilterError::Syntax`, keeping the position
/// and the text the parser could not match.
pub fn from_pest_error(err: PestError<Rule>, input: &str) -> FilterError {
    let position = match err.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };

    let (line, column) = match err.line_col {
        LineColLocation::Pos((l, c)) => (l, c),
        LineColLocation::Span((l, c), _) => (l, c),
    };

    let rest = input.get(position..).unwrap_or_default();
    let fragment = if rest.is_empty() {
        "<end of input>".to_string()
    } else {
        rest.chars().take(FRAGMENT_LEN).collect()
    };

    let expected = match &err.variant {
        ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => positives
            .iter()
            .map(|rule| format!("{rule:?}"))
            .collect::<Vec<_>>()
            .join(", "),
        ErrorVariant::ParsingError { .. } => "a valid filter expression".to_string(),
        ErrorVariant::CustomError { message } => message.clone(),
    };

    FilterError::Syntax {
        position,
        line,
        column,
        fragment,
        expected,
    }
}
