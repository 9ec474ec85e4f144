use crate::{
    functions::{Function, FunctionKind},
    merge::{self, Fragment},
    settings::FilterSettings,
};
use model::{
    core::literal::Literal,
    error::{FilterError, FilterResult},
    filter::{Expression, FieldPath, FilterSpec, Lookup, Predicate, RelOp},
};
use odata_syntax::ast::{
    BoolExpr, BoolHead, CommonExpr, Connective, FunctionExpr, MarkerExpr, MarkerSubject,
    Operand, RelExpr,
};
use std::collections::HashSet;
use tracing::debug;

/// Compiles `$filter` text into a [`FilterSpec`].
///
/// A `Compiler` holds only its settings, so one instance can be shared
/// across threads. Annotation numbering restarts on every call.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    settings: FilterSettings,
}

impl Compiler {
    pub fn new(settings: FilterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    pub fn compile(&self, text: &str) -> FilterResult<FilterSpec> {
        let tree = odata_syntax::parse(text, self.settings.max_depth)?;
        let mut ctx = CompileContext::new(&self.settings);
        referenced_fields(&tree, &mut ctx.reserved);
        let spec = ctx.bool_expr(&tree)?.into_spec();

        debug!(
            filter = text,
            annotations = spec.annotations.len(),
            "Compiled filter"
        );
        Ok(spec)
    }
}

/// Compiles with default settings.
pub fn compile(text: &str) -> FilterResult<FilterSpec> {
    Compiler::default().compile(text)
}

/// Intermediate result of an operand or function call.
#[derive(Debug, Clone, PartialEq)]
enum Term {
    Field(FieldPath),
    Literal(Literal),
    Composite(Expression),
    Match(Predicate),
}

impl Term {
    fn describe(&self) -> String {
        match self {
            Term::Field(path) => format!("field {path}"),
            Term::Literal(lit) => format!("literal {lit}"),
            Term::Composite(expr) => format!("computed value {expr}"),
            Term::Match(predicate) => format!("boolean test {predicate}"),
        }
    }
}

/// Per-call state: the annotation counter, the current nesting depth and the
/// field names a minted annotation must not shadow.
struct CompileContext<'a> {
    settings: &'a FilterSettings,
    annotations: usize,
    depth: usize,
    reserved: HashSet<String>,
}

impl<'a> CompileContext<'a> {
    fn new(settings: &'a FilterSettings) -> Self {
        Self {
            settings,
            annotations: 0,
            depth: 0,
            reserved: HashSet::new(),
        }
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> FilterResult<T>) -> FilterResult<T> {
        if self.depth >= self.settings.max_depth {
            return Err(FilterError::DepthExceeded {
                limit: self.settings.max_depth,
            });
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn bool_expr(&mut self, expr: &BoolExpr) -> FilterResult<Fragment> {
        let head = match &expr.head {
            BoolHead::Not(None) => {
                return Err(FilterError::structure(format!(
                    "'not' at {} has no operand",
                    expr.span
                )));
            }
            BoolHead::Not(Some(inner)) => merge::not(self.nested(|c| c.bool_expr(inner))?)?,
            BoolHead::Common(common) => self.common(common)?,
        };

        let Some(tail) = &expr.tail else {
            return Ok(head);
        };

        let rest = self.nested(|c| c.bool_expr(&tail.rest))?;
        match tail.connective {
            Connective::And => merge::and(head, rest),
            Connective::Or => merge::or(head, rest),
        }
    }

    fn common(&mut self, expr: &CommonExpr) -> FilterResult<Fragment> {
        match expr {
            CommonExpr::Paren(inner) => self.nested(|c| c.bool_expr(inner)),
            CommonExpr::Marker(marker) => self.marker(marker),
            CommonExpr::Relation(rel) => self.relation(rel),
            CommonExpr::Function(call) => match self.function(call)? {
                Term::Field(path) => Ok(Fragment::value(path.into())),
                Term::Composite(expr) => Ok(Fragment::value(expr)),
                Term::Match(predicate) => Ok(Fragment::predicate(predicate)),
                Term::Literal(lit) => Ok(Fragment::value(lit.into())),
            },
        }
    }

    fn relation(&mut self, rel: &RelExpr) -> FilterResult<Fragment> {
        let left = self.operand(&rel.left)?;
        let right = self.operand(&rel.right)?;
        let mut pending = Vec::new();

        let left = match left {
            Term::Field(path) => path,
            Term::Composite(expr) => self.annotate(expr, &mut pending),
            Term::Match(predicate) => {
                return Ok(Fragment::predicate(match_against(predicate, rel, &right)?));
            }
            Term::Literal(lit) => {
                return Err(FilterError::structure(format!(
                    "comparison at {} must start with a field or function, found literal {lit}",
                    rel.span
                )));
            }
        };

        let right = match right {
            Term::Field(path) => Expression::FieldPath(path),
            Term::Literal(lit) => Expression::Literal(lit),
            Term::Composite(expr) => self.annotate(expr, &mut pending).into(),
            other @ Term::Match(_) => {
                return Err(FilterError::structure(format!(
                    "{} cannot be the right side of a comparison",
                    other.describe()
                )));
            }
        };

        let predicate = comparison(left, rel.op, right)?;
        Ok(with_annotations(Fragment::predicate(predicate), pending))
    }

    fn marker(&mut self, marker: &MarkerExpr) -> FilterResult<Fragment> {
        let computed = match &marker.subject {
            MarkerSubject::Function(call) => match self.function(call)? {
                Term::Field(path) => {
                    let predicate = comparison(path, marker.op, marker.value.clone().into())?;
                    return Ok(Fragment::predicate(predicate));
                }
                Term::Composite(expr) => expr,
                other => {
                    return Err(FilterError::structure(format!(
                        "{} cannot be compared with {}",
                        other.describe(),
                        marker.value
                    )));
                }
            },
            MarkerSubject::Math(math) => Expression::Arithmetic {
                op: math.op,
                left: FieldPath::new(math.field.clone()),
                right: math.operand.clone(),
            },
        };

        let mut pending = Vec::new();
        let field = self.annotate(computed, &mut pending);
        let predicate = comparison(field, marker.op, marker.value.clone().into())?;
        Ok(with_annotations(Fragment::predicate(predicate), pending))
    }

    fn operand(&mut self, operand: &Operand) -> FilterResult<Term> {
        match operand {
            Operand::Path(segments) => Ok(Term::Field(FieldPath::new(segments.clone()))),
            Operand::Literal(lit) => Ok(Term::Literal(lit.clone())),
            Operand::Function(call) => self.nested(|c| c.function(call)),
        }
    }

    fn function(&mut self, call: &FunctionExpr) -> FilterResult<Term> {
        let function = Function::resolve(&call.name);
        let kind = function
            .kind()
            .ok_or_else(|| FilterError::UnknownFunction(call.name.clone()))?;
        function.arity().check(function.name(), call.args.len())?;

        let args = call
            .args
            .iter()
            .map(|arg| self.operand(arg))
            .collect::<FilterResult<Vec<_>>>()?;

        match kind {
            FunctionKind::Match(lookup) => string_match(&function, lookup, args),
            FunctionKind::Transform(lookup) => transform(&function, lookup, args),
            FunctionKind::Composition => composition(&function, args),
        }
    }

    /// Mints the next synthetic field name for `expr`, skipping names the
    /// filter already uses as fields.
    fn annotate(&mut self, expr: Expression, pending: &mut Vec<(String, Expression)>) -> FieldPath {
        let name = loop {
            self.annotations += 1;
            let name = format!("{}_{}", self.settings.annotation_prefix, self.annotations);
            if !self.reserved.contains(&name) {
                break name;
            }
        };
        debug!(annotation = %name, expression = %expr, "Annotating computed value");

        pending.push((name.clone(), expr));
        FieldPath::new(vec![name])
    }
}

/// Collects the leading segment of every field path in `expr`.
fn referenced_fields(expr: &BoolExpr, out: &mut HashSet<String>) {
    match &expr.head {
        BoolHead::Not(inner) => {
            if let Some(inner) = inner {
                referenced_fields(inner, out);
            }
        }
        BoolHead::Common(CommonExpr::Paren(inner)) => referenced_fields(inner, out),
        BoolHead::Common(CommonExpr::Marker(marker)) => match &marker.subject {
            MarkerSubject::Function(call) => call_fields(call, out),
            MarkerSubject::Math(math) => path_head(&math.field, out),
        },
        BoolHead::Common(CommonExpr::Function(call)) => call_fields(call, out),
        BoolHead::Common(CommonExpr::Relation(rel)) => {
            operand_fields(&rel.left, out);
            operand_fields(&rel.right, out);
        }
    }

    if let Some(tail) = &expr.tail {
        referenced_fields(&tail.rest, out);
    }
}

fn call_fields(call: &FunctionExpr, out: &mut HashSet<String>) {
    for arg in &call.args {
        operand_fields(arg, out);
    }
}

fn operand_fields(operand: &Operand, out: &mut HashSet<String>) {
    match operand {
        Operand::Path(segments) => path_head(segments, out),
        Operand::Function(call) => call_fields(call, out),
        Operand::Literal(_) => {}
    }
}

fn path_head(segments: &[String], out: &mut HashSet<String>) {
    if let Some(head) = segments.first() {
        out.insert(head.clone());
    }
}

fn with_annotations(fragment: Fragment, pending: Vec<(String, Expression)>) -> Fragment {
    pending
        .into_iter()
        .fold(fragment, |fragment, (name, expr)| {
            fragment.with_annotation(name, expr)
        })
}

/// Builds `left op right`, rewriting comparisons against `null` into an
/// is-null probe.
fn comparison(left: FieldPath, op: RelOp, right: Expression) -> FilterResult<Predicate> {
    if !matches!(right, Expression::Literal(Literal::Null)) {
        return Ok(Predicate::comparison(left.into(), op, right));
    }

    if op.is_ordering() {
        return Err(FilterError::structure(format!(
            "'{op}' cannot compare {left} with null"
        )));
    }

    let probe = Predicate::comparison(
        left.with_lookup(Lookup::IsNull).into(),
        RelOp::Eq,
        Literal::Boolean(true).into(),
    );
    Ok(match op {
        RelOp::Ne => Predicate::negate(probe),
        _ => probe,
    })
}

/// `contains(Name, 'x') eq true` and friends.
fn match_against(predicate: Predicate, rel: &RelExpr, right: &Term) -> FilterResult<Predicate> {
    let expected = match right {
        Term::Literal(Literal::Boolean(b)) => *b,
        other => {
            return Err(FilterError::structure(format!(
                "a string test can only be compared with true or false, found {}",
                other.describe()
            )));
        }
    };

    match (rel.op, expected) {
        (RelOp::Eq, true) | (RelOp::Ne, false) => Ok(predicate),
        (RelOp::Eq, false) | (RelOp::Ne, true) => Ok(Predicate::negate(predicate)),
        (op, _) => Err(FilterError::structure(format!(
            "'{op}' cannot compare a string test with a boolean"
        ))),
    }
}

fn string_match(function: &Function, lookup: Lookup, args: Vec<Term>) -> FilterResult<Term> {
    let mut args = args.into_iter();
    let (field, needle) = match (args.next(), args.next()) {
        (Some(Term::Field(field)), Some(Term::Literal(Literal::String(needle)))) => {
            (field, needle)
        }
        (Some(Term::Literal(Literal::String(needle))), Some(Term::Field(field)))
            if function.accepts_either_order() =>
        {
            (field, needle)
        }
        (first, second) => {
            let found = [first, second]
                .iter()
                .flatten()
                .map(Term::describe)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(FilterError::argument(
                function.name(),
                format!("expected a field and a string, found {found}"),
            ));
        }
    };

    Ok(Term::Match(Predicate::comparison(
        field.with_lookup(lookup).into(),
        RelOp::Eq,
        Literal::String(needle).into(),
    )))
}

fn transform(function: &Function, lookup: Lookup, args: Vec<Term>) -> FilterResult<Term> {
    match args.into_iter().next() {
        Some(Term::Field(field)) => Ok(Term::Field(field.with_lookup(lookup))),
        Some(other) => Err(FilterError::argument(
            function.name(),
            format!("expected a field, found {}", other.describe()),
        )),
        None => Err(FilterError::argument(function.name(), "missing argument")),
    }
}

fn composition(function: &Function, args: Vec<Term>) -> FilterResult<Term> {
    let args = args
        .into_iter()
        .map(|arg| match arg {
            Term::Field(field) => Ok(Expression::FieldPath(field)),
            Term::Literal(Literal::Null) => Err(FilterError::argument(
                function.name(),
                "null is not a valid argument",
            )),
            Term::Literal(lit) => Ok(Expression::Literal(lit)),
            Term::Composite(expr) => Ok(expr),
            other @ Term::Match(_) => Err(FilterError::argument(
                function.name(),
                format!("{} cannot be an argument", other.describe()),
            )),
        })
        .collect::<FilterResult<Vec<_>>>()?;

    Ok(Term::Composite(Expression::FunctionCall {
        name: function.name().to_string(),
        args,
    }))
}
