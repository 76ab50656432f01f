use std::{
    any::{self, TypeId},
    fmt,
    sync::Arc,
};

use tracing::debug;

use crate::{
    ir::Source,
    schema::EntityProvider,
    shape::{
        cache, JoinDescriptor, ProjectionDecl, ProjectionShape, ResolveContext, ResolvedRef,
        SelectDescriptor, SelectKind, SelectKindDecl, ShapeError,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDescriptor {
    pub target: ResolvedRef,
    pub ascending: bool,
}

/// Fully resolved projection shape: select order equals declaration order,
/// every group-by/order-by reference is resolved, every join alias checked.
pub struct ProjectionDescriptor {
    pub shape: &'static str,
    pub entity: String,
    pub alias: String,
    pub distinct: bool,
    pub selects: Vec<SelectDescriptor>,
    pub joins: Vec<JoinDescriptor>,
    pub group_by: Vec<ResolvedRef>,
    pub order_by: Vec<OrderDescriptor>,
}

impl fmt::Debug for ProjectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProjectionDescriptor({} on {} {}, {} select(s), {} join(s))",
            self.shape,
            self.entity,
            self.alias,
            self.selects.len(),
            self.joins.len(),
        )
    }
}

pub struct ProjectionScanner;

impl ProjectionScanner {
    /// Scan a shape type into its descriptor, computing it on first use and
    /// serving the process-wide cached copy afterwards.
    pub fn scan<P: ProjectionShape>(
        provider: &dyn EntityProvider,
    ) -> Result<Arc<ProjectionDescriptor>, ShapeError> {
        let key = TypeId::of::<P>();
        if let Some(found) = cache::projection_get(key) {
            return Ok(found);
        }

        let mut decl = ProjectionDecl::new();
        P::declare(&mut decl);

        let descriptor = Self::build(any::type_name::<P>(), decl, provider)?;
        debug!(
            shape = descriptor.shape,
            selects = descriptor.selects.len(),
            joins = descriptor.joins.len(),
            "scanned projection shape"
        );

        Ok(cache::projection_publish(key, Arc::new(descriptor)))
    }

    fn build(
        shape: &'static str,
        decl: ProjectionDecl,
        provider: &dyn EntityProvider,
    ) -> Result<ProjectionDescriptor, ShapeError> {
        let entity = decl.entity.ok_or(ShapeError::MissingEntity { shape })?;
        if provider.entity(&entity).is_none() {
            return ShapeError::UnknownEntity(entity).err();
        }
        let alias = decl.alias.unwrap_or_else(|| Source::default_entity_alias(&entity));

        let mut joins: Vec<JoinDescriptor> = Vec::with_capacity(decl.joins.len());
        for join in decl.joins {
            let taken = join.alias == alias || joins.iter().any(|j| j.alias == join.alias);
            if taken {
                return ShapeError::DuplicateAlias(join.alias).err();
            }
            if provider.entity(&join.entity).is_none() {
                return ShapeError::UnknownEntity(join.entity).err();
            }
            joins.push(JoinDescriptor {
                entity: join.entity,
                alias: join.alias,
                join_type: join.join_type,
                on: join.on,
            });
        }

        let mut selects: Vec<SelectDescriptor> = Vec::with_capacity(decl.selects.len());
        for select in decl.selects {
            if selects.iter().any(|s| s.member == select.member) {
                return ShapeError::DuplicateMember(select.member).err();
            }

            // defaulting: alias <- member name, source <- projection alias
            let select_alias = select.alias.unwrap_or_else(|| select.member.clone());
            let source = select.source.unwrap_or_else(|| alias.clone());

            let source_entity = Self::entity_for(&source, &entity, &alias, &joins).ok_or_else(|| {
                ShapeError::UnknownReference { name: select.member.clone(), source: source.clone() }
            })?;

            let kind = match select.kind {
                SelectKindDecl::Column { name } => {
                    let name = name.unwrap_or_else(|| select.member.clone());
                    Self::check_member(source_entity, &name, provider)?;
                    SelectKind::Column { name }
                }
                SelectKindDecl::Aggregate { function, target, distinct } => {
                    if function.trim().is_empty() {
                        return ShapeError::Ir(crate::ir::IrError::EmptyFunctionName).err();
                    }
                    if target != "*" {
                        Self::check_member(source_entity, &target, provider)?;
                    }
                    SelectKind::Aggregate { function, target, distinct }
                }
                SelectKindDecl::Arithmetic { left, op, right } => {
                    SelectKind::Arithmetic { left: Box::new(left), op, right: Box::new(right) }
                }
                SelectKindDecl::Subquery { metadata } => SelectKind::Subquery { metadata },
                SelectKindDecl::Raw { expr } => SelectKind::Raw { expr },
            };

            selects.push(SelectDescriptor { member: select.member, alias: select_alias, source, kind });
        }

        let ctx = ResolveContext {
            root_entity: &entity,
            root_alias: &alias,
            selects: &selects,
            joins: &joins,
            provider,
        };

        let mut group_by = Vec::with_capacity(decl.group_by.len());
        for reference in &decl.group_by {
            group_by.push(ctx.resolve(&reference.ident, reference.source.as_deref())?);
        }

        let mut order_by = Vec::with_capacity(decl.order_by.len());
        for order in &decl.order_by {
            order_by.push(OrderDescriptor {
                target: ctx.resolve(&order.target.ident, order.target.source.as_deref())?,
                ascending: order.ascending,
            });
        }

        Ok(ProjectionDescriptor {
            shape,
            entity,
            alias,
            distinct: decl.distinct,
            selects,
            joins,
            group_by,
            order_by,
        })
    }

    fn entity_for<'a>(
        source: &str,
        root_entity: &'a str,
        root_alias: &str,
        joins: &'a [JoinDescriptor],
    ) -> Option<&'a str> {
        if source == root_alias {
            return Some(root_entity);
        }

        joins.iter().find(|j| j.alias == source).map(|j| j.entity.as_str())
    }

    fn check_member(
        entity_ident: &str,
        member: &str,
        provider: &dyn EntityProvider,
    ) -> Result<(), ShapeError> {
        let entity = provider
            .entity(entity_ident)
            .ok_or_else(|| ShapeError::UnknownEntity(entity_ident.to_string()))?;
        if entity.get(member).is_none() {
            return ShapeError::UnknownMember {
                entity: entity_ident.to_string(),
                member: member.to_string(),
            }
            .err();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ir::{Expr, Predicate},
        schema::{EntityCatalog, EntityInfo},
        shape::SelectKind,
    };

    fn catalog() -> EntityCatalog {
        let mut catalog = EntityCatalog::new();
        catalog.register(
            EntityInfo::new("Customer")
                .member("id")
                .member("full_name")
                .member("age")
                .member("city")
                .member("vip"),
        );
        catalog.register(
            EntityInfo::new("Order")
                .member("id")
                .member("customer_id")
                .member("total")
                .member("status"),
        );
        catalog
    }

    struct CustomerRow;

    impl ProjectionShape for CustomerRow {
        fn declare(d: &mut ProjectionDecl) {
            d.entity("Customer");
            d.column("id");
            d.column("full_name").alias("name");
            d.column("city");
        }
    }

    #[test]
    fn test_selects_keep_declaration_order_and_defaults() {
        let descriptor = ProjectionScanner::scan::<CustomerRow>(&catalog()).expect("Failed to scan shape");

        assert_eq!(descriptor.alias, "customer");
        let aliases: Vec<&str> = descriptor.selects.iter().map(|s| s.alias.as_str()).collect::<Vec<_>>();
        assert_eq!(aliases, vec!["id", "name", "city"]);
        // every select reads from the projection's own source by default
        assert!(descriptor.selects.iter().all(|s| s.source == "customer"));
    }

    #[test]
    fn test_scanning_twice_returns_the_cached_descriptor() {
        let first = ProjectionScanner::scan::<CustomerRow>(&catalog()).expect("Failed to scan shape");
        let second = ProjectionScanner::scan::<CustomerRow>(&catalog()).expect("Failed to scan shape");

        assert!(std::sync::Arc::ptr_eq(&first, &second));
        let first_members: Vec<&str> = first.selects.iter().map(|s| s.member.as_str()).collect::<Vec<_>>();
        let second_members: Vec<&str> = second.selects.iter().map(|s| s.member.as_str()).collect::<Vec<_>>();
        assert_eq!(first_members, second_members);
    }

    struct StatusPrecedence;

    impl ProjectionShape for StatusPrecedence {
        fn declare(d: &mut ProjectionDecl) {
            d.entity_aliased("Customer", "c");
            d.column("id");
            d.column("city").alias("status");
            d.inner_join(
                "Order",
                "o",
                Predicate::eq(Expr::column("c", "id"), Expr::column("o", "customer_id")),
            );
            // "status" is also a raw member of the joined Order entity
            d.group_by("status");
        }
    }

    #[test]
    fn test_select_alias_wins_over_joined_member() {
        let descriptor =
            ProjectionScanner::scan::<StatusPrecedence>(&catalog()).expect("Failed to scan shape");

        assert_eq!(descriptor.group_by, vec![ResolvedRef::Select(1)]);
    }

    struct NoEntity;

    impl ProjectionShape for NoEntity {
        fn declare(d: &mut ProjectionDecl) {
            d.column("id");
        }
    }

    #[test]
    fn test_shape_without_entity_fails() {
        let result = ProjectionScanner::scan::<NoEntity>(&catalog());

        match result {
            Err(ShapeError::MissingEntity { .. }) => {}
            _ => panic!(),
        }
    }

    struct BadColumn;

    impl ProjectionShape for BadColumn {
        fn declare(d: &mut ProjectionDecl) {
            d.entity("Customer");
            d.column("nope");
        }
    }

    #[test]
    fn test_unknown_column_member_fails() {
        let result = ProjectionScanner::scan::<BadColumn>(&catalog());

        assert_eq!(
            result.err(),
            Some(ShapeError::UnknownMember { entity: "Customer".to_string(), member: "nope".to_string() })
        );
    }

    struct ClashingJoins;

    impl ProjectionShape for ClashingJoins {
        fn declare(d: &mut ProjectionDecl) {
            d.entity_aliased("Customer", "c");
            d.column("id");
            d.inner_join(
                "Order",
                "c",
                Predicate::eq(Expr::column("c", "id"), Expr::column("c", "customer_id")),
            );
        }
    }

    #[test]
    fn test_join_alias_clash_fails() {
        let result = ProjectionScanner::scan::<ClashingJoins>(&catalog());

        assert_eq!(result.err(), Some(ShapeError::DuplicateAlias("c".to_string())));
    }

    struct AggregateRow;

    impl ProjectionShape for AggregateRow {
        fn declare(d: &mut ProjectionDecl) {
            d.entity_aliased("Customer", "c");
            d.column("city");
            d.aggregate("customers", "COUNT", "*");
            d.aggregate_distinct("cities", "COUNT", "city");
            d.group_by("city");
        }
    }

    #[test]
    fn test_aggregate_members_resolve_and_star_skips_validation() {
        let descriptor =
            ProjectionScanner::scan::<AggregateRow>(&catalog()).expect("Failed to scan shape");

        match &descriptor.selects[1].kind {
            SelectKind::Aggregate { function, target, distinct } => {
                assert_eq!(function, "COUNT");
                assert_eq!(target, "*");
                assert!(!distinct);
            }
            _ => panic!(),
        }
        match &descriptor.selects[2].kind {
            SelectKind::Aggregate { distinct, .. } => assert!(distinct),
            _ => panic!(),
        }
        assert_eq!(descriptor.group_by, vec![ResolvedRef::Select(0)]);
    }
}
