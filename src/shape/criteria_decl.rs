use indexmap::IndexMap;

use crate::{
    ir::{ComparatorOp, Expr, Literal, LogicalOp},
    shape::RefDecl,
};

/// A filter type describes itself by populating a `CriteriaDecl`: one call
/// per member (operator + live value extractor, optionally a reference
/// override, a raw expression, or a group id) plus the class-level group
/// definitions. Compiled descriptors are cached per type; values are read
/// per call through the extractor, never baked in.
pub trait FilterShape: Sized + 'static {
    fn declare(d: &mut CriteriaDecl<Self>);
}

/// A filter member's extracted value. `Flag` drives operand-less operators
/// (the null tests); `None` from the extractor omits the criterion for that
/// bind call.
#[derive(Debug, Clone, PartialEq)]
pub enum CriterionValue {
    Value(Literal),
    List(Vec<Literal>),
    Range(Literal, Literal),
    Flag,
}

impl CriterionValue {
    pub fn value(literal: impl Into<Literal>) -> CriterionValue {
        CriterionValue::Value(literal.into())
    }

    pub fn list(literals: Vec<Literal>) -> CriterionValue {
        CriterionValue::List(literals)
    }

    pub fn range(low: impl Into<Literal>, high: impl Into<Literal>) -> CriterionValue {
        CriterionValue::Range(low.into(), high.into())
    }
}

impl From<Literal> for CriterionValue {
    fn from(value: Literal) -> Self {
        CriterionValue::Value(value)
    }
}

impl From<&str> for CriterionValue {
    fn from(value: &str) -> Self {
        CriterionValue::Value(Literal::from(value))
    }
}

impl From<String> for CriterionValue {
    fn from(value: String) -> Self {
        CriterionValue::Value(Literal::from(value))
    }
}

impl From<i64> for CriterionValue {
    fn from(value: i64) -> Self {
        CriterionValue::Value(Literal::from(value))
    }
}

impl From<bool> for CriterionValue {
    fn from(value: bool) -> Self {
        CriterionValue::Value(Literal::from(value))
    }
}

impl From<Vec<Literal>> for CriterionValue {
    fn from(value: Vec<Literal>) -> Self {
        CriterionValue::List(value)
    }
}

pub struct MemberDecl<F> {
    pub(crate) name: String,
    pub(crate) op: ComparatorOp,
    pub(crate) extract: fn(&F) -> Option<CriterionValue>,
    pub(crate) reference: Option<RefDecl>,
    pub(crate) raw: Option<Expr>,
    pub(crate) group: Option<String>,
}

impl<F> MemberDecl<F> {
    /// Resolve against this identifier instead of the member name.
    pub fn reference(&mut self, ident: &str) -> &mut Self {
        self.reference = Some(RefDecl::new(ident, None));
        self
    }

    pub fn reference_from(&mut self, ident: &str, source: &str) -> &mut Self {
        self.reference = Some(RefDecl::new(ident, Some(source)));
        self
    }

    /// Compare against this expression verbatim. A raw expression always
    /// bypasses reference resolution.
    pub fn raw(&mut self, expr: Expr) -> &mut Self {
        self.raw = Some(expr);
        self
    }

    pub fn group(&mut self, id: &str) -> &mut Self {
        self.group = Some(id.to_string());
        self
    }
}

#[derive(Clone, PartialEq)]
pub struct GroupDef {
    pub op: LogicalOp,
    pub children: Vec<String>,
}

pub struct CriteriaDecl<F> {
    pub(crate) members: Vec<MemberDecl<F>>,
    pub(crate) groups: IndexMap<String, GroupDef>,
}

impl<F> CriteriaDecl<F> {
    pub fn new() -> CriteriaDecl<F> {
        CriteriaDecl { members: Vec::new(), groups: IndexMap::new() }
    }

    pub fn member(
        &mut self,
        name: &str,
        op: ComparatorOp,
        extract: fn(&F) -> Option<CriterionValue>,
    ) -> &mut MemberDecl<F> {
        self.members.push(MemberDecl {
            name: name.to_string(),
            op,
            extract,
            reference: None,
            raw: None,
            group: None,
        });
        let index = self.members.len() - 1;
        &mut self.members[index]
    }

    pub fn group(&mut self, id: &str, op: LogicalOp, children: &[&str]) -> &mut Self {
        self.groups.insert(
            id.to_string(),
            GroupDef { op, children: children.iter().map(|c| c.to_string()).collect::<Vec<_>>() },
        );
        self
    }
}

impl<F> Default for CriteriaDecl<F> {
    fn default() -> Self {
        Self::new()
    }
}
