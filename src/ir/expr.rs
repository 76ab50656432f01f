use std::fmt;

use crate::{
    ir::{ArithmeticOp, FunctionKind, IrError, Literal, OrderKey, Predicate, QueryMetadata, SelectItem},
    visit::{LowerError, Visitor},
};

#[derive(Clone, PartialEq)]
pub enum Expr {
    Constant(Literal),
    Column { source: String, name: String },
    Tuple(Vec<Expr>),
    Arithmetic { left: Box<Expr>, op: ArithmeticOp, right: Box<Expr> },
    Function { name: String, args: Vec<Expr>, distinct: bool, options: Vec<Literal>, kind: FunctionKind },
    Case { cases: Vec<(Predicate, Expr)>, otherwise: Option<Box<Expr>> },
    Subquery(Box<QueryMetadata>),
    Window { name: String, args: Vec<Expr>, partition_by: Vec<Expr>, order_by: Vec<OrderKey> },
}

impl Expr {
    pub fn constant(value: impl Into<Literal>) -> Expr {
        Expr::Constant(value.into())
    }

    pub fn column(source: &str, name: &str) -> Expr {
        Expr::Column { source: source.to_string(), name: name.to_string() }
    }

    pub fn tuple(items: Vec<Expr>) -> Expr {
        Expr::Tuple(items)
    }

    pub fn arithmetic(left: Expr, op: ArithmeticOp, right: Expr) -> Expr {
        Expr::Arithmetic { left: Box::new(left), op, right: Box::new(right) }
    }

    pub fn function(name: &str, args: Vec<Expr>, kind: FunctionKind) -> Result<Expr, IrError> {
        Self::function_with(name, args, false, vec![], kind)
    }

    pub fn aggregate(name: &str, args: Vec<Expr>, distinct: bool) -> Result<Expr, IrError> {
        Self::function_with(name, args, distinct, vec![], FunctionKind::Aggregate)
    }

    pub fn function_with(
        name: &str,
        args: Vec<Expr>,
        distinct: bool,
        options: Vec<Literal>,
        kind: FunctionKind,
    ) -> Result<Expr, IrError> {
        if name.trim().is_empty() {
            return IrError::EmptyFunctionName.err();
        }

        Ok(Expr::Function { name: name.to_string(), args, distinct, options, kind })
    }

    pub fn case(cases: Vec<(Predicate, Expr)>, otherwise: Option<Expr>) -> Result<Expr, IrError> {
        if cases.is_empty() {
            return IrError::EmptyCase.err();
        }

        Ok(Expr::Case { cases, otherwise: otherwise.map(Box::new) })
    }

    pub fn subquery(metadata: QueryMetadata) -> Expr {
        Expr::Subquery(Box::new(metadata))
    }

    pub fn window(
        name: &str,
        args: Vec<Expr>,
        partition_by: Vec<Expr>,
        order_by: Vec<OrderKey>,
    ) -> Result<Expr, IrError> {
        if name.trim().is_empty() {
            return IrError::EmptyFunctionName.err();
        }

        Ok(Expr::Window { name: name.to_string(), args, partition_by, order_by })
    }

    /// Wrap the expression into a select-list entry under the given alias.
    pub fn aliased(self, alias: &str) -> SelectItem {
        SelectItem { expr: self, alias: Some(alias.to_string()) }
    }

    pub fn accept<R, C, V>(&self, visitor: &mut V, ctx: &mut C) -> Result<R, LowerError>
    where
        V: Visitor<R, C> + ?Sized,
    {
        match self {
            Expr::Constant(value) => visitor.visit_constant(value, ctx),
            Expr::Column { source, name } => visitor.visit_column(source, name, ctx),
            Expr::Tuple(items) => visitor.visit_tuple(items, ctx),
            Expr::Arithmetic { left, op, right } => visitor.visit_arithmetic(left, *op, right, ctx),
            Expr::Function { name, args, distinct, options, kind } => {
                visitor.visit_function(name, args, *distinct, options, *kind, ctx)
            }
            Expr::Case { cases, otherwise } => visitor.visit_case(cases, otherwise.as_deref(), ctx),
            Expr::Subquery(metadata) => visitor.visit_subquery(metadata, ctx),
            Expr::Window { name, args, partition_by, order_by } => {
                visitor.visit_window(name, args, partition_by, order_by, ctx)
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(lit) => write!(f, "{}", lit),
            Expr::Column { source, name } => write!(f, "{}.{}", source, name),
            Expr::Tuple(items) => {
                let inner = items.iter().map(|i| format!("{}", i)).collect::<Vec<_>>().join(", ");
                write!(f, "({})", inner)
            }
            Expr::Arithmetic { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Expr::Function { name, args, distinct, .. } => {
                let inner = args.iter().map(|a| format!("{}", a)).collect::<Vec<_>>().join(", ");
                if *distinct {
                    write!(f, "{}(DISTINCT {})", name, inner)
                } else {
                    write!(f, "{}({})", name, inner)
                }
            }
            Expr::Case { cases, otherwise } => {
                write!(f, "CASE[{} when(s)", cases.len())?;
                if otherwise.is_some() {
                    write!(f, ", else")?;
                }
                write!(f, "]")
            }
            Expr::Subquery(_) => write!(f, "(subquery)"),
            Expr::Window { name, .. } => write!(f, "{}() OVER (..)", name),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(_) => write!(f, "Constant({})", self),
            Expr::Column { .. } => write!(f, "Column({})", self),
            Expr::Tuple(_) => write!(f, "Tuple({})", self),
            Expr::Arithmetic { .. } => write!(f, "Arithmetic({})", self),
            Expr::Function { .. } => write!(f, "Function({})", self),
            Expr::Case { .. } => write!(f, "Case({})", self),
            Expr::Subquery(_) => write!(f, "Subquery({})", self),
            Expr::Window { .. } => write!(f, "Window({})", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_rejects_empty_name() {
        let result = Expr::function("  ", vec![], FunctionKind::Scalar);
        assert_eq!(result, IrError::EmptyFunctionName.err());
    }

    #[test]
    fn test_case_rejects_empty_when_list() {
        let result = Expr::case(vec![], Some(Expr::constant(0)));
        assert_eq!(result, IrError::EmptyCase.err());
    }

    #[test]
    fn test_aliased_wraps_into_select_item() {
        let item = Expr::column("c", "full_name").aliased("name");
        assert_eq!(item.alias.as_deref(), Some("name"));
        match item.expr {
            Expr::Column { source, name } => {
                assert_eq!(source, "c");
                assert_eq!(name, "full_name");
            }
            _ => panic!(),
        }
    }
}
