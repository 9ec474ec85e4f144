use crate::error::from_pest_error;
use model::error::{FilterError, FilterResult};
use pest::{Parser, iterators::Pair};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar/odata_filter.pest"]
pub struct ODataParser;

/// Parses `input` into its raw `filter` parse tree.
///
/// The nesting depth is measured before the PEG engine runs so that
/// pathological input is rejected without deep recursion.
pub fn parse_tree(input: &str, max_depth: usize) -> FilterResult<Pair<'_, Rule>> {
    let depth = nesting_depth(input);
    if depth > max_depth {
        return Err(FilterError::DepthExceeded { limit: max_depth });
    }

    let mut pairs =
        ODataParser::parse(Rule::filter, input).map_err(|e| from_pest_error(e, input))?;

    pairs
        .next()
        .ok_or_else(|| FilterError::structure("empty filter"))
}

/// Upper bound on the recursion a filter needs: the deepest parenthesis
/// level plus the number of boolean connectives, ignoring quoted text.
pub fn nesting_depth(input: &str) -> usize {
    let mut in_string = false;
    let mut paren_depth = 0usize;
    let mut max_paren_depth = 0usize;
    let mut connectives = 0usize;
    let mut word = String::new();

    let mut close_word = |word: &mut String| {
        if matches!(word.as_str(), "and" | "or" | "not") {
            connectives += 1;
        }
        word.clear();
    };

    for ch in input.chars() {
        if in_string {
            if ch == '\'' {
                in_string = false;
            }
            continue;
        }

        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '/' {
            word.push(ch);
            continue;
        }
        close_word(&mut word);

        match ch {
            '\'' => in_string = true,
            '(' => {
                paren_depth += 1;
                max_paren_depth = max_paren_depth.max(paren_depth);
            }
            ')' => paren_depth = paren_depth.saturating_sub(1),
            _ => {}
        }
    }
    close_word(&mut word);

    max_paren_depth + connectives
}
