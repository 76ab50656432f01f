use std::fmt;

use crate::ir::Expr;

/// One select-list entry: an expression plus the alias it is exposed under.
#[derive(Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn new(expr: Expr) -> SelectItem {
        SelectItem { expr, alias: None }
    }

    pub fn aliased(expr: Expr, alias: &str) -> SelectItem {
        SelectItem { expr, alias: Some(alias.to_string()) }
    }
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} as {}", self.expr, alias),
            None => write!(f, "{}", self.expr),
        }
    }
}

impl fmt::Debug for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SelectItem({})", self)
    }
}

#[derive(Clone, PartialEq)]
pub struct OrderKey {
    pub expr: Expr,
    pub ascending: bool,
}

impl OrderKey {
    pub fn asc(expr: Expr) -> OrderKey {
        OrderKey { expr, ascending: true }
    }

    pub fn desc(expr: Expr) -> OrderKey {
        OrderKey { expr, ascending: false }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.expr, if self.ascending { "ASC" } else { "DESC" })
    }
}

impl fmt::Debug for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderKey({})", self)
    }
}
