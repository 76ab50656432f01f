use std::fmt;

use crate::{
    ir::{ComparatorOp, Expr, IrError, LogicalOp},
    visit::{LowerError, Visitor},
};

#[derive(Clone, PartialEq)]
pub enum Predicate {
    Compare { left: Expr, op: ComparatorOp, right: Option<Box<Expr>> },
    Logical { op: LogicalOp, children: Vec<Predicate> },
}

impl Predicate {
    /// Binary operators require a right operand, the null tests forbid one.
    pub fn compare(left: Expr, op: ComparatorOp, right: Option<Expr>) -> Result<Predicate, IrError> {
        if op.takes_operand() && right.is_none() {
            return IrError::MissingOperand { node: "Comparison", operand: "right" }.err();
        }
        if !op.takes_operand() && right.is_some() {
            return IrError::UnexpectedOperand { op }.err();
        }

        Ok(Predicate::Compare { left, op, right: right.map(Box::new) })
    }

    pub fn eq(left: Expr, right: Expr) -> Predicate {
        Predicate::Compare { left, op: ComparatorOp::Eq, right: Some(Box::new(right)) }
    }

    pub fn is_null(expr: Expr) -> Predicate {
        Predicate::Compare { left: expr, op: ComparatorOp::IsNull, right: None }
    }

    pub fn is_not_null(expr: Expr) -> Predicate {
        Predicate::Compare { left: expr, op: ComparatorOp::IsNotNull, right: None }
    }

    /// A singleton list collapses to its only child instead of a one-armed
    /// logical node.
    pub fn logical(op: LogicalOp, mut children: Vec<Predicate>) -> Result<Predicate, IrError> {
        match children.len() {
            0 => IrError::EmptyLogical.err(),
            1 => Ok(children.remove(0)),
            _ => Ok(Predicate::Logical { op, children }),
        }
    }

    pub fn and(children: Vec<Predicate>) -> Result<Predicate, IrError> {
        Self::logical(LogicalOp::And, children)
    }

    pub fn or(children: Vec<Predicate>) -> Result<Predicate, IrError> {
        Self::logical(LogicalOp::Or, children)
    }

    pub fn accept<R, C, V>(&self, visitor: &mut V, ctx: &mut C) -> Result<R, LowerError>
    where
        V: Visitor<R, C> + ?Sized,
    {
        match self {
            Predicate::Compare { left, op, right } => {
                visitor.visit_comparison(left, *op, right.as_deref(), ctx)
            }
            Predicate::Logical { op, children } => visitor.visit_logical(*op, children, ctx),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { left, op, right } => match right {
                Some(right) => write!(f, "{} {} {}", left, op, right),
                None => write!(f, "{} {}", left, op),
            },
            Predicate::Logical { op, children } => {
                let inner = children.iter().map(|c| format!("{}", c)).collect::<Vec<_>>().join(&format!(" {} ", op));
                write!(f, "({})", inner)
            }
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { .. } => write!(f, "Compare({})", self),
            Predicate::Logical { .. } => write!(f, "Logical({})", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_requires_right_operand() {
        let result = Predicate::compare(Expr::column("a", "age"), ComparatorOp::Gt, None);
        assert_eq!(result, IrError::MissingOperand { node: "Comparison", operand: "right" }.err());
    }

    #[test]
    fn test_null_test_rejects_right_operand() {
        let result = Predicate::compare(
            Expr::column("a", "age"),
            ComparatorOp::IsNull,
            Some(Expr::constant(1)),
        );
        assert_eq!(result, IrError::UnexpectedOperand { op: ComparatorOp::IsNull }.err());
    }

    #[test]
    fn test_logical_collapses_singleton() {
        let single = Predicate::is_null(Expr::column("a", "deleted_at"));
        let result = Predicate::and(vec![single.clone()]).expect("Failed to build logical predicate");
        assert_eq!(result, single);
    }

    #[test]
    fn test_logical_rejects_empty_children() {
        assert_eq!(Predicate::or(vec![]), IrError::EmptyLogical.err());
    }
}
