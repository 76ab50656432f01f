use std::{fmt, sync::Arc};

use tracing::debug;

use crate::{
    ir::{ComparatorOp, Expr, IrError, LogicalOp, Predicate},
    schema::EntityProvider,
    shape::{
        cache, CriteriaDecl, CriterionValue, FilterShape, GroupCompiler, ProjectionDescriptor,
        ResolveContext, ResolvedRef, ShapeError,
    },
};

/// A compiled leaf criterion: the resolved target expression, the operator,
/// and the extractor that reads the live value from a filter instance.
pub struct CriteriaDescriptor<F> {
    pub member: String,
    pub op: ComparatorOp,
    pub expr: Expr,
    pub(crate) extract: fn(&F) -> Option<CriterionValue>,
}

impl<F> CriteriaDescriptor<F> {
    /// Read the member's current value from an instance. Extraction is live:
    /// the same descriptor serves every instance of the filter type.
    pub fn value_of(&self, filter: &F) -> Option<CriterionValue> {
        (self.extract)(filter)
    }

    fn bind(&self, filter: &F) -> Result<Option<Predicate>, IrError> {
        let value = match (self.extract)(filter) {
            Some(value) => value,
            None => return Ok(None),
        };

        let right = match value {
            CriterionValue::Flag => None,
            CriterionValue::Value(lit) => Some(Expr::Constant(lit)),
            CriterionValue::List(items) => {
                Some(Expr::tuple(items.into_iter().map(Expr::Constant).collect::<Vec<_>>()))
            }
            CriterionValue::Range(low, high) => {
                Some(Expr::tuple(vec![Expr::Constant(low), Expr::Constant(high)]))
            }
        };

        Predicate::compare(self.expr.clone(), self.op, right).map(Some)
    }
}

impl<F> fmt::Debug for CriteriaDescriptor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CriteriaDescriptor({} {} {})", self.member, self.op, self.expr)
    }
}

pub enum PredicateDescriptor<F> {
    Criteria(CriteriaDescriptor<F>),
    Group(GroupDescriptor<F>),
}

impl<F> fmt::Debug for PredicateDescriptor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateDescriptor::Criteria(c) => write!(f, "{:?}", c),
            PredicateDescriptor::Group(g) => write!(f, "{:?}", g),
        }
    }
}

/// A logical grouping of criteria and subgroups. The compiler's root group
/// always carries `And`.
pub struct GroupDescriptor<F> {
    pub op: LogicalOp,
    pub children: Vec<PredicateDescriptor<F>>,
}

impl<F> GroupDescriptor<F> {
    /// Build the predicate tree for one filter instance. Members whose
    /// extractor yields `None` are omitted for this call, and groups left
    /// empty by omission are dropped; `None` means no predicate at all.
    pub fn bind(&self, filter: &F) -> Result<Option<Predicate>, IrError> {
        let mut bound: Vec<Predicate> = Vec::with_capacity(self.children.len());
        for child in &self.children {
            let predicate = match child {
                PredicateDescriptor::Criteria(leaf) => leaf.bind(filter)?,
                PredicateDescriptor::Group(group) => group.bind(filter)?,
            };
            if let Some(predicate) = predicate {
                bound.push(predicate);
            }
        }

        if bound.is_empty() {
            return Ok(None);
        }

        Predicate::logical(self.op, bound).map(Some)
    }
}

impl<F> fmt::Debug for GroupDescriptor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupDescriptor({} of {:?})", self.op, self.children)
    }
}

pub struct CriteriaCompiler;

impl CriteriaCompiler {
    /// Compile a filter type's declarations against a projection into the
    /// cached root group descriptor.
    pub fn compile<F: FilterShape>(
        projection: &ProjectionDescriptor,
        provider: &dyn EntityProvider,
    ) -> Result<Arc<GroupDescriptor<F>>, ShapeError> {
        if let Some(found) = cache::criteria_get::<F>() {
            return Ok(found);
        }

        let mut decl: CriteriaDecl<F> = CriteriaDecl::new();
        F::declare(&mut decl);

        let ctx = ResolveContext {
            root_entity: &projection.entity,
            root_alias: &projection.alias,
            selects: &projection.selects,
            joins: &projection.joins,
            provider,
        };

        let mut resolved = Vec::with_capacity(decl.members.len());
        for member in decl.members {
            let expr = match member.raw {
                // explicit raw expression: no resolution at all
                Some(raw) => raw,
                None => {
                    let (ident, source) = match &member.reference {
                        Some(reference) => (reference.ident.as_str(), reference.source.as_deref()),
                        None => (member.name.as_str(), None),
                    };
                    match ctx.resolve(ident, source)? {
                        ResolvedRef::Select(index) => projection.selects[index].to_expr(),
                        ResolvedRef::Member { source, name } => Expr::column(&source, &name),
                    }
                }
            };

            resolved.push((
                CriteriaDescriptor { member: member.name, op: member.op, expr, extract: member.extract },
                member.group,
            ));
        }

        let root = GroupCompiler::assemble(resolved, &decl.groups)?;
        debug!(
            shape = std::any::type_name::<F>(),
            children = root.children.len(),
            "compiled criteria shape"
        );

        Ok(cache::criteria_publish(Arc::new(root)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ir::{JoinType, Literal},
        schema::{EntityCatalog, EntityInfo},
        shape::JoinDescriptor,
    };

    fn catalog() -> EntityCatalog {
        let mut catalog = EntityCatalog::new();
        catalog.register(EntityInfo::new("Customer").member("id").member("city").member("vip"));
        catalog.register(
            EntityInfo::new("Order").member("id").member("customer_id").member("total").member("status"),
        );
        catalog
    }

    fn projection() -> ProjectionDescriptor {
        ProjectionDescriptor {
            shape: "test-projection",
            entity: "Customer".to_string(),
            alias: "c".to_string(),
            distinct: false,
            selects: vec![],
            joins: vec![JoinDescriptor {
                entity: "Order".to_string(),
                alias: "o".to_string(),
                join_type: JoinType::Inner,
                on: Predicate::eq(Expr::column("c", "id"), Expr::column("o", "customer_id")),
            }],
            group_by: vec![],
            order_by: vec![],
        }
    }

    fn first_leaf<F>(root: &GroupDescriptor<F>) -> &CriteriaDescriptor<F> {
        match &root.children[0] {
            PredicateDescriptor::Criteria(leaf) => leaf,
            _ => panic!(),
        }
    }

    #[derive(Default)]
    struct StatusFilter {
        status: Option<String>,
    }

    impl FilterShape for StatusFilter {
        fn declare(d: &mut CriteriaDecl<Self>) {
            d.member("status", ComparatorOp::Eq, |f| f.status.clone().map(CriterionValue::from))
                .reference_from("status", "o");
        }
    }

    #[test]
    fn test_extraction_is_live_not_snapshotted() {
        let root = CriteriaCompiler::compile::<StatusFilter>(&projection(), &catalog())
            .expect("Failed to compile criteria");

        let mut filter = StatusFilter { status: Some("A".to_string()) };
        assert_eq!(first_leaf(&root).value_of(&filter), Some(CriterionValue::from("A")));

        filter.status = Some("B".to_string());
        assert_eq!(first_leaf(&root).value_of(&filter), Some(CriterionValue::from("B")));
    }

    #[test]
    fn test_bind_omits_none_members() {
        let root = CriteriaCompiler::compile::<StatusFilter>(&projection(), &catalog())
            .expect("Failed to compile criteria");

        let empty = StatusFilter::default();
        assert_eq!(root.bind(&empty).expect("Failed to bind"), None);

        let set = StatusFilter { status: Some("new".to_string()) };
        let predicate = root.bind(&set).expect("Failed to bind").expect("Expected a predicate");
        match predicate {
            Predicate::Compare { left, op, right } => {
                assert_eq!(left, Expr::column("o", "status"));
                assert_eq!(op, ComparatorOp::Eq);
                assert_eq!(right.as_deref(), Some(&Expr::Constant(Literal::from("new"))));
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_compile_twice_returns_the_cached_descriptor() {
        let first = CriteriaCompiler::compile::<StatusFilter>(&projection(), &catalog())
            .expect("Failed to compile criteria");
        let second = CriteriaCompiler::compile::<StatusFilter>(&projection(), &catalog())
            .expect("Failed to compile criteria");

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[derive(Default)]
    struct RawOverride {
        city: Option<String>,
    }

    impl FilterShape for RawOverride {
        fn declare(d: &mut CriteriaDecl<Self>) {
            // "city" would resolve against Customer; the raw expression must
            // win without any resolution happening
            d.member("city", ComparatorOp::Eq, |f| f.city.clone().map(CriterionValue::from))
                .raw(Expr::function("LOWER", vec![Expr::column("c", "city")], crate::ir::FunctionKind::Scalar)
                    .expect("Failed to build function"));
        }
    }

    #[test]
    fn test_raw_expression_bypasses_resolution() {
        let root = CriteriaCompiler::compile::<RawOverride>(&projection(), &catalog())
            .expect("Failed to compile criteria");

        match &first_leaf(&root).expr {
            Expr::Function { name, .. } => assert_eq!(name, "LOWER"),
            _ => panic!(),
        }
    }

    #[derive(Default)]
    struct Unresolvable {
        missing: Option<i64>,
    }

    impl FilterShape for Unresolvable {
        fn declare(d: &mut CriteriaDecl<Self>) {
            d.member("missing", ComparatorOp::Eq, |f| f.missing.map(CriterionValue::from));
        }
    }

    #[test]
    fn test_unresolvable_member_fails_at_compile_time() {
        let result = CriteriaCompiler::compile::<Unresolvable>(&projection(), &catalog());

        assert_eq!(
            result.err(),
            Some(ShapeError::UnknownReference { name: "missing".to_string(), source: "c".to_string() })
        );
    }

    #[derive(Default)]
    struct NullCheck {
        only_anonymous: bool,
    }

    impl FilterShape for NullCheck {
        fn declare(d: &mut CriteriaDecl<Self>) {
            d.member("city", ComparatorOp::IsNull, |f| {
                if f.only_anonymous { Some(CriterionValue::Flag) } else { None }
            });
        }
    }

    #[test]
    fn test_flag_value_drives_operand_less_operator() {
        let root = CriteriaCompiler::compile::<NullCheck>(&projection(), &catalog())
            .expect("Failed to compile criteria");

        let predicate = root
            .bind(&NullCheck { only_anonymous: true })
            .expect("Failed to bind")
            .expect("Expected a predicate");
        match predicate {
            Predicate::Compare { op, right, .. } => {
                assert_eq!(op, ComparatorOp::IsNull);
                assert!(right.is_none());
            }
            _ => panic!(),
        }
    }
}
