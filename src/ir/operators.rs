use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparatorOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
    In,
    NotIn,
    Between,
    IsNull,
    IsNotNull,
}

impl ComparatorOp {
    /// The null tests are the only comparisons without a right operand.
    pub fn takes_operand(&self) -> bool {
        !matches!(self, ComparatorOp::IsNull | ComparatorOp::IsNotNull)
    }
}

impl fmt::Display for ComparatorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparatorOp::Eq => write!(f, "="),
            ComparatorOp::NotEq => write!(f, "<>"),
            ComparatorOp::Lt => write!(f, "<"),
            ComparatorOp::LtEq => write!(f, "<="),
            ComparatorOp::Gt => write!(f, ">"),
            ComparatorOp::GtEq => write!(f, ">="),
            ComparatorOp::Like => write!(f, "LIKE"),
            ComparatorOp::NotLike => write!(f, "NOT LIKE"),
            ComparatorOp::In => write!(f, "IN"),
            ComparatorOp::NotIn => write!(f, "NOT IN"),
            ComparatorOp::Between => write!(f, "BETWEEN"),
            ComparatorOp::IsNull => write!(f, "IS NULL"),
            ComparatorOp::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

impl fmt::Debug for ComparatorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComparatorOp({})", self)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "AND"),
            LogicalOp::Or => write!(f, "OR"),
        }
    }
}

impl fmt::Debug for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogicalOp({})", self)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticOp::Add => write!(f, "+"),
            ArithmeticOp::Sub => write!(f, "-"),
            ArithmeticOp::Mul => write!(f, "*"),
            ArithmeticOp::Div => write!(f, "/"),
        }
    }
}

impl fmt::Debug for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArithmeticOp({})", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOp {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl fmt::Display for SetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOp::Union => write!(f, "UNION"),
            SetOp::UnionAll => write!(f, "UNION ALL"),
            SetOp::Intersect => write!(f, "INTERSECT"),
            SetOp::Except => write!(f, "EXCEPT"),
        }
    }
}

impl fmt::Debug for SetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SetOp({})", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionKind {
    Scalar,
    Aggregate,
}
