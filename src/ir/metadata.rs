use indexmap::IndexMap;
use std::fmt;

use crate::ir::{Expr, IrError, JoinType, OrderKey, Predicate, SelectItem, Source};

#[derive(Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub source: Source,
    pub on: Predicate,
}

impl fmt::Debug for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Join({:?} {} on {})", self.join_type, self.source, self.on)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restriction {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// One query block's clauses, built incrementally. Mutation needs `&mut`
/// access, so handing the metadata to a visitor by shared reference is the
/// freeze point. Nested blocks (subqueries, CTE bodies) each own their own
/// instance.
#[derive(Default, Clone, PartialEq)]
pub struct QueryMetadata {
    from: Option<Source>,
    selects: Vec<SelectItem>,
    joins: Vec<Join>,
    criteria: Vec<Predicate>,
    group_by: Vec<Expr>,
    having: Vec<Predicate>,
    order_by: Vec<OrderKey>,
    distinct: bool,
    restriction: Option<Restriction>,
}

impl QueryMetadata {
    pub fn new() -> QueryMetadata {
        QueryMetadata::default()
    }

    pub fn set_from(&mut self, source: Source) -> Result<&mut Self, IrError> {
        let alias = source.alias();
        if self.joins.iter().any(|j| j.source.alias() == alias) {
            return IrError::DuplicateAlias(alias).err();
        }

        self.from = Some(source);
        Ok(self)
    }

    pub fn set_from_aliased(&mut self, source: Source, alias: &str) -> Result<&mut Self, IrError> {
        self.set_from(source.with_alias(alias))
    }

    pub fn add_select(&mut self, item: SelectItem) -> &mut Self {
        self.selects.push(item);
        self
    }

    /// Join order is alias-resolution order: a join may reference aliases
    /// bound before it, never after.
    pub fn add_join(&mut self, join: Join) -> Result<&mut Self, IrError> {
        let alias = join.source.alias();
        let taken = self.from.as_ref().is_some_and(|f| f.alias() == alias)
            || self.joins.iter().any(|j| j.source.alias() == alias);
        if taken {
            return IrError::DuplicateAlias(alias).err();
        }

        self.joins.push(join);
        Ok(self)
    }

    pub fn add_where(&mut self, predicate: Predicate) -> &mut Self {
        self.criteria.push(predicate);
        self
    }

    pub fn add_group_by(&mut self, expr: Expr) -> &mut Self {
        self.group_by.push(expr);
        self
    }

    pub fn add_having(&mut self, predicate: Predicate) -> &mut Self {
        self.having.push(predicate);
        self
    }

    pub fn add_order_by(&mut self, key: OrderKey) -> &mut Self {
        self.order_by.push(key);
        self
    }

    pub fn set_distinct(&mut self, distinct: bool) -> &mut Self {
        self.distinct = distinct;
        self
    }

    pub fn set_restriction(&mut self, limit: Option<u64>, offset: Option<u64>) -> &mut Self {
        self.restriction = Some(Restriction { limit, offset });
        self
    }

    pub fn reset_selects(&mut self) -> &mut Self {
        self.selects.clear();
        self
    }

    pub fn reset_joins(&mut self) -> &mut Self {
        self.joins.clear();
        self
    }

    pub fn reset_where(&mut self) -> &mut Self {
        self.criteria.clear();
        self
    }

    pub fn reset_group_by(&mut self) -> &mut Self {
        self.group_by.clear();
        self
    }

    pub fn reset_having(&mut self) -> &mut Self {
        self.having.clear();
        self
    }

    pub fn reset_order_by(&mut self) -> &mut Self {
        self.order_by.clear();
        self
    }

    pub fn reset_restriction(&mut self) -> &mut Self {
        self.restriction = None;
        self
    }

    pub fn from(&self) -> Option<&Source> {
        self.from.as_ref()
    }

    pub fn require_from(&self) -> Result<&Source, IrError> {
        self.from.as_ref().ok_or(IrError::MissingFrom)
    }

    pub fn selects(&self) -> &[SelectItem] {
        &self.selects
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn wheres(&self) -> &[Predicate] {
        &self.criteria
    }

    pub fn group_bys(&self) -> &[Expr] {
        &self.group_by
    }

    pub fn havings(&self) -> &[Predicate] {
        &self.having
    }

    pub fn order_bys(&self) -> &[OrderKey] {
        &self.order_by
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn restriction(&self) -> Option<Restriction> {
        self.restriction
    }

    /// Map of alias -> source covering FROM plus every join target, in
    /// insertion order. This is the whole name-resolution context a visitor
    /// gets during lowering.
    pub fn source_map(&self) -> IndexMap<String, &Source> {
        let mut map = IndexMap::new();
        if let Some(from) = &self.from {
            map.insert(from.alias(), from);
        }
        for join in &self.joins {
            map.insert(join.source.alias(), &join.source);
        }

        map
    }
}

impl fmt::Display for QueryMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selects = self.selects.iter().map(|s| format!("{}", s)).collect::<Vec<_>>().join(", ");
        let joins = self.joins.iter().map(|j| format!("{:?}", j)).collect::<Vec<_>>().join(", ");
        let from = match &self.from { Some(s) => format!("{}", s), None => "None".to_string() };

        write!(
            f,
            "QueryMetadata(from={}, selects=[{}], joins=[{}], where={}, group_by={}, having={}, order_by={}, distinct={}, restriction={:?})",
            from,
            selects,
            joins,
            self.criteria.len(),
            self.group_by.len(),
            self.having.len(),
            self.order_by.len(),
            self.distinct,
            self.restriction,
        )
    }
}

impl fmt::Debug for QueryMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QueryMetadata({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ComparatorOp;

    fn on(left_source: &str, right_source: &str) -> Predicate {
        Predicate::eq(Expr::column(left_source, "id"), Expr::column(right_source, "ref_id"))
    }

    #[test]
    fn test_source_map_preserves_insertion_order() {
        let mut meta = QueryMetadata::new();
        meta.set_from_aliased(Source::entity("Customer"), "c").expect("Failed to set from");
        meta.add_join(Join {
            join_type: JoinType::Inner,
            source: Source::entity_aliased("Order", "o"),
            on: on("c", "o"),
        })
        .expect("Failed to add join");
        meta.add_join(Join {
            join_type: JoinType::Left,
            source: Source::entity_aliased("OrderLine", "l"),
            on: on("o", "l"),
        })
        .expect("Failed to add join");

        let source_map = meta.source_map();
        let aliases: Vec<&String> = source_map.keys().collect::<Vec<_>>();
        assert_eq!(aliases, vec!["c", "o", "l"]);
    }

    #[test]
    fn test_add_join_rejects_duplicate_alias() {
        let mut meta = QueryMetadata::new();
        meta.set_from_aliased(Source::entity("Customer"), "c").expect("Failed to set from");

        let result = meta.add_join(Join {
            join_type: JoinType::Inner,
            source: Source::entity_aliased("Order", "c"),
            on: on("c", "c"),
        });

        match result {
            Err(IrError::DuplicateAlias(alias)) => assert_eq!(alias, "c"),
            _ => panic!(),
        }
    }

    #[test]
    fn test_require_from_on_empty_block() {
        let meta = QueryMetadata::new();
        assert_eq!(meta.require_from(), Err(IrError::MissingFrom));
    }

    #[test]
    fn test_reset_where_clears_only_criteria() {
        let mut meta = QueryMetadata::new();
        meta.set_from(Source::entity("Customer")).expect("Failed to set from");
        meta.add_where(
            Predicate::compare(Expr::column("customer", "age"), ComparatorOp::Gt, Some(Expr::constant(16)))
                .expect("Failed to build predicate"),
        );
        meta.add_order_by(OrderKey::asc(Expr::column("customer", "name")));

        meta.reset_where();

        assert!(meta.wheres().is_empty());
        assert_eq!(meta.order_bys().len(), 1);
    }

    #[test]
    fn test_restriction_is_set_and_reset() {
        let mut meta = QueryMetadata::new();
        meta.set_from(Source::entity("Customer")).expect("Failed to set from");

        meta.set_restriction(Some(20), Some(60));
        assert_eq!(meta.restriction(), Some(Restriction { limit: Some(20), offset: Some(60) }));

        meta.reset_restriction();
        assert_eq!(meta.restriction(), None);
    }

    #[test]
    fn test_entity_from_gets_default_alias_in_source_map() {
        let mut meta = QueryMetadata::new();
        meta.set_from(Source::entity("CustomerOrder")).expect("Failed to set from");

        assert!(meta.source_map().contains_key("customer_order"));
    }
}
