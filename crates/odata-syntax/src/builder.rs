use crate::{
    ast::{
        expr::{
            BoolExpr, BoolHead, BoolTail, CommonExpr, Connective, FunctionExpr, MarkerExpr,
            MarkerSubject, MathExpr, Operand, RelExpr,
        },
        span::Span,
    },
    parser::{Rule, parse_tree},
    tree::reduce,
};
use model::{
    core::literal::Literal,
    error::{FilterError, FilterResult},
    filter::{ArithOp, RelOp},
};
use pest::iterators::Pair;

/// Parse `$filter` text into a typed syntax tree.
pub fn parse(input: &str, max_depth: usize) -> FilterResult<BoolExpr> {
    let tree = parse_tree(input, max_depth)?;
    let root = single(reduce(tree), "filter")?;
    build_bool(root)
}

fn pair_to_span(pair: &Pair<Rule>) -> Span {
    let (line, col) = pair.line_col();
    let span_pest = pair.as_span();
    Span::new(span_pest.start(), span_pest.end(), line, col)
}

fn unexpected(context: &str, pair: Option<Pair<Rule>>) -> FilterError {
    match pair {
        Some(pair) => FilterError::structure(format!(
            "unexpected {:?} '{}' in {context}",
            pair.as_rule(),
            pair.as_str()
        )),
        None => FilterError::structure(format!("incomplete {context}")),
    }
}

fn single<'i>(pieces: Vec<Pair<'i, Rule>>, context: &str) -> FilterResult<Pair<'i, Rule>> {
    let mut pieces = pieces.into_iter();
    let first = pieces.next().ok_or_else(|| unexpected(context, None))?;
    match pieces.next() {
        None => Ok(first),
        extra => Err(unexpected(context, extra)),
    }
}

fn build_bool(pair: Pair<Rule>) -> FilterResult<BoolExpr> {
    let span = pair_to_span(&pair);
    let mut pieces = reduce(pair).into_iter();

    let head = match pieces.next() {
        Some(p) if p.as_rule() == Rule::not_expr => build_not(p)?,
        Some(p) if p.as_rule() == Rule::common_expr => BoolHead::Common(build_common(p)?),
        other => return Err(unexpected("boolean expression", other)),
    };

    let tail = match pieces.next() {
        Some(p) if matches!(p.as_rule(), Rule::and_expr | Rule::or_expr) => Some(build_tail(p)?),
        None => None,
        other => return Err(unexpected("boolean expression", other)),
    };

    if let Some(extra) = pieces.next() {
        return Err(unexpected("boolean expression", Some(extra)));
    }

    Ok(BoolExpr { head, tail, span })
}

fn build_not(pair: Pair<Rule>) -> FilterResult<BoolHead> {
    let mut pieces = reduce(pair).into_iter();
    let inner = pieces.next().map(build_bool).transpose()?;

    if let Some(extra) = pieces.next() {
        return Err(unexpected("not expression", Some(extra)));
    }

    Ok(BoolHead::Not(inner.map(Box::new)))
}

fn build_tail(pair: Pair<Rule>) -> FilterResult<BoolTail> {
    let connective = match pair.as_rule() {
        Rule::and_expr => Connective::And,
        _ => Connective::Or,
    };
    let rest = single(reduce(pair), "boolean continuation")?;

    Ok(BoolTail {
        connective,
        rest: Box::new(build_bool(rest)?),
    })
}

fn build_common(pair: Pair<Rule>) -> FilterResult<CommonExpr> {
    let inner = single(reduce(pair), "expression")?;

    match inner.as_rule() {
        Rule::paren_expr => {
            let nested = single(reduce(inner), "parenthesized expression")?;
            Ok(CommonExpr::Paren(Box::new(build_bool(nested)?)))
        }
        Rule::function_marker_expr => Ok(CommonExpr::Marker(build_marker(inner)?)),
        Rule::rel_expr => Ok(CommonExpr::Relation(build_rel(inner)?)),
        Rule::function_expr => Ok(CommonExpr::Function(build_function(inner)?)),
        _ => Err(unexpected("expression", Some(inner))),
    }
}

/// Splits a reduced node into exactly three pieces.
fn triple<'i>(
    pair: Pair<'i, Rule>,
    context: &str,
) -> FilterResult<(Pair<'i, Rule>, Pair<'i, Rule>, Pair<'i, Rule>)> {
    let pieces = reduce(pair);
    if pieces.len() != 3 {
        return Err(FilterError::structure(format!(
            "{context} needs 3 parts, found {}",
            pieces.len()
        )));
    }

    let mut pieces = pieces.into_iter();
    match (pieces.next(), pieces.next(), pieces.next()) {
        (Some(a), Some(b), Some(c)) => Ok((a, b, c)),
        _ => Err(unexpected(context, None)),
    }
}

fn build_marker(pair: Pair<Rule>) -> FilterResult<MarkerExpr> {
    let span = pair_to_span(&pair);
    let (subject, op, value) = triple(pair, "function comparison")?;

    let subject = match subject.as_rule() {
        Rule::function_expr => MarkerSubject::Function(build_function(subject)?),
        Rule::math_expr => MarkerSubject::Math(build_math(subject)?),
        _ => return Err(unexpected("function comparison", Some(subject))),
    };

    Ok(MarkerExpr {
        subject,
        op: build_rel_op(op)?,
        value: build_literal(value)?,
        span,
    })
}

fn build_math(pair: Pair<Rule>) -> FilterResult<MathExpr> {
    let span = pair_to_span(&pair);
    let (field, op, operand) = triple(pair, "arithmetic expression")?;

    if field.as_rule() != Rule::select_path {
        return Err(unexpected("arithmetic expression", Some(field)));
    }
    let op = op
        .as_str()
        .parse::<ArithOp>()
        .map_err(FilterError::Structure)?;

    Ok(MathExpr {
        field: split_path(field.as_str()),
        op,
        operand: build_literal(operand)?,
        span,
    })
}

fn build_rel(pair: Pair<Rule>) -> FilterResult<RelExpr> {
    let span = pair_to_span(&pair);
    let (left, op, right) = triple(pair, "comparison")?;

    Ok(RelExpr {
        left: build_operand(left)?,
        op: build_rel_op(op)?,
        right: build_operand(right)?,
        span,
    })
}

fn build_rel_op(pair: Pair<Rule>) -> FilterResult<RelOp> {
    if pair.as_rule() != Rule::rel_marker {
        return Err(unexpected("comparison operator", Some(pair)));
    }
    pair.as_str().parse::<RelOp>().map_err(FilterError::Structure)
}

fn build_function(pair: Pair<Rule>) -> FilterResult<FunctionExpr> {
    let span = pair_to_span(&pair);
    let mut pieces = reduce(pair).into_iter();

    let name = match pieces.next() {
        Some(p) if p.as_rule() == Rule::func_name => p.as_str().to_string(),
        other => return Err(unexpected("function call", other)),
    };
    let args = pieces.map(build_operand).collect::<FilterResult<Vec<_>>>()?;

    Ok(FunctionExpr { name, args, span })
}

fn build_operand(pair: Pair<Rule>) -> FilterResult<Operand> {
    match pair.as_rule() {
        Rule::function_expr => Ok(Operand::Function(build_function(pair)?)),
        Rule::select_path => Ok(Operand::Path(split_path(pair.as_str()))),
        _ => Ok(Operand::Literal(build_literal(pair)?)),
    }
}

fn build_literal(pair: Pair<Rule>) -> FilterResult<Literal> {
    let text = pair.as_str();
    match pair.as_rule() {
        Rule::number => Literal::parse_number(text)
            .ok_or_else(|| FilterError::structure(format!("number out of range: {text}"))),
        Rule::string => Ok(Literal::String(parse_string_literal(text))),
        Rule::json_primitive => match text {
            "true" => Ok(Literal::Boolean(true)),
            "false" => Ok(Literal::Boolean(false)),
            _ => Ok(Literal::Null),
        },
        _ => Err(unexpected("literal", Some(pair))),
    }
}

/// Strips the surrounding quotes and decodes doubled quotes.
fn parse_string_literal(s: &str) -> String {
    let inner = s
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(s);
    inner.replace("''", "'")
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_literal() {
        assert_eq!(parse_string_literal("'it''s'"), "it's");
        assert_eq!(parse_string_literal("''"), "");
        assert_eq!(parse_string_literal("'('"), "(");
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("Address/City"), vec!["Address", "City"]);
        assert_eq!(split_path("Name"), vec!["Name"]);
    }
}
