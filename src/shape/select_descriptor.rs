use std::fmt;

use crate::ir::{ArithmeticOp, Expr, FunctionKind, QueryMetadata};

#[derive(Clone, PartialEq)]
pub enum SelectKind {
    Column { name: String },
    Aggregate { function: String, target: String, distinct: bool },
    Arithmetic { left: Box<Expr>, op: ArithmeticOp, right: Box<Expr> },
    Subquery { metadata: QueryMetadata },
    Raw { expr: Expr },
}

/// One resolved select member of a projection. `member` is the declaring
/// member name, `alias` the exposed name (defaulted to the member name),
/// `source` the alias of the query source the member reads from.
#[derive(Clone, PartialEq)]
pub struct SelectDescriptor {
    pub member: String,
    pub alias: String,
    pub source: String,
    pub kind: SelectKind,
}

impl SelectDescriptor {
    /// The name this select is found under during reference resolution.
    pub fn reference_name(&self) -> &str {
        &self.alias
    }

    /// Materialize the IR expression this select stands for.
    pub fn to_expr(&self) -> Expr {
        match &self.kind {
            SelectKind::Column { name } => Expr::column(&self.source, name),
            SelectKind::Aggregate { function, target, distinct } => {
                // target "*" means a zero-argument aggregate (COUNT(*))
                let args = if target == "*" {
                    vec![]
                } else {
                    vec![Expr::column(&self.source, target)]
                };
                Expr::Function {
                    name: function.clone(),
                    args,
                    distinct: *distinct,
                    options: vec![],
                    kind: FunctionKind::Aggregate,
                }
            }
            SelectKind::Arithmetic { left, op, right } => {
                Expr::arithmetic(*left.clone(), *op, *right.clone())
            }
            SelectKind::Subquery { metadata } => Expr::subquery(metadata.clone()),
            SelectKind::Raw { expr } => expr.clone(),
        }
    }
}

impl fmt::Debug for SelectDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            SelectKind::Column { name } => format!("column {}", name),
            SelectKind::Aggregate { function, target, .. } => format!("{}({})", function, target),
            SelectKind::Arithmetic { .. } => "arithmetic".to_string(),
            SelectKind::Subquery { .. } => "subquery".to_string(),
            SelectKind::Raw { .. } => "raw".to_string(),
        };
        write!(f, "SelectDescriptor({} as {} from {}, {})", self.member, self.alias, self.source, kind)
    }
}
