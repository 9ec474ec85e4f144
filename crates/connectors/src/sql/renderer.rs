//! Defines the core rendering trait and context for converting filter
//! nodes to SQL.

use crate::sql::dialect::Dialect;
use model::core::literal::Literal;

/// A trait for any filter node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// Accumulates the SQL string and the bound parameters, and provides
/// access to the dialect for syntax-specific details.
pub struct Renderer<'a> {
    pub sql: String,
    pub params: Vec<Literal>,
    pub dialect: &'a dyn Dialect,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            dialect,
        }
    }

    /// Consumes the renderer and returns the final SQL string and parameters.
    pub fn finish(self) -> (String, Vec<Literal>) {
        (self.sql, self.params)
    }

    pub fn add_param(&mut self, value: Literal) {
        self.params.push(value);
        let placeholder = self.dialect.get_placeholder(self.params.len() - 1);
        self.sql.push_str(&placeholder);
    }

    /// Renders `node` on its own and returns its text. Parameters keep
    /// accumulating, so placeholder numbering stays continuous.
    pub fn render_detached(&mut self, node: &dyn Render) -> String {
        let outer = std::mem::take(&mut self.sql);
        node.render(self);
        std::mem::replace(&mut self.sql, outer)
    }
}
