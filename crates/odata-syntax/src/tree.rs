//! Parse-tree reduction.
//!
//! The grammar needs wrapper and whitespace rules that carry no meaning for
//! the compiler. Each rule lists the child rules it cares about; everything
//! else is looked through.

use crate::parser::Rule;
use pest::iterators::Pair;
use tracing::trace;

/// Child rules that are significant under `rule`.
pub fn significant(rule: Rule) -> &'static [Rule] {
    match rule {
        Rule::filter => &[Rule::bool_common_expr],
        Rule::bool_common_expr => &[
            Rule::not_expr,
            Rule::common_expr,
            Rule::and_expr,
            Rule::or_expr,
        ],
        Rule::common_expr => &[
            Rule::paren_expr,
            Rule::function_marker_expr,
            Rule::function_expr,
            Rule::rel_expr,
        ],
        Rule::function_expr => &[
            Rule::func_name,
            Rule::function_expr,
            Rule::select_path,
            Rule::number,
            Rule::string,
            Rule::json_primitive,
        ],
        Rule::function_marker_expr => &[
            Rule::rel_marker,
            Rule::function_expr,
            Rule::math_expr,
            Rule::select_path,
            Rule::number,
            Rule::string,
            Rule::json_primitive,
        ],
        Rule::rel_expr => &[
            Rule::rel_marker,
            Rule::function_expr,
            Rule::select_path,
            Rule::number,
            Rule::string,
            Rule::json_primitive,
        ],
        Rule::math_expr => &[
            Rule::math_marker,
            Rule::select_path,
            Rule::number,
            Rule::string,
            Rule::json_primitive,
        ],
        Rule::paren_expr | Rule::or_expr | Rule::and_expr | Rule::not_expr => {
            &[Rule::bool_common_expr]
        }
        _ => &[],
    }
}

/// Returns the significant descendants of `pair`, left to right.
///
/// A child whose rule is significant for `pair` is kept as is. Any other
/// child is searched, with `pair`'s list, and its significant descendants
/// are spliced in its place.
pub fn reduce(pair: Pair<'_, Rule>) -> Vec<Pair<'_, Rule>> {
    let rule = pair.as_rule();
    let keep = significant(rule);
    let mut reduced = Vec::new();
    collect(pair, keep, &mut reduced);

    trace!(
        ?rule,
        kept = ?reduced.iter().map(|p| p.as_rule()).collect::<Vec<_>>(),
        "reduced parse node"
    );
    reduced
}

fn collect<'i>(pair: Pair<'i, Rule>, keep: &[Rule], out: &mut Vec<Pair<'i, Rule>>) {
    for child in pair.into_inner() {
        if keep.contains(&child.as_rule()) {
            out.push(child);
        } else {
            collect(child, keep, out);
        }
    }
}
