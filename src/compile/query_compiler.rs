use tracing::debug;

use crate::{
    ir::{Expr, Join, OrderKey, QueryMetadata, SelectItem, Source},
    schema::EntityProvider,
    shape::{CriteriaCompiler, FilterShape, ProjectionDescriptor, ResolvedRef, ShapeError},
};

/// Translates a resolved projection descriptor (and optionally a bound
/// filter instance) into query metadata: FROM, then joins in declaration
/// order, then selects, grouping, ordering, and the WHERE tree.
pub struct QueryCompiler;

impl QueryCompiler {
    pub fn compile(descriptor: &ProjectionDescriptor) -> Result<QueryMetadata, ShapeError> {
        let mut metadata = QueryMetadata::new();
        metadata.set_from_aliased(Source::entity(&descriptor.entity), &descriptor.alias)?;

        for join in &descriptor.joins {
            metadata.add_join(Join {
                join_type: join.join_type,
                source: Source::entity_aliased(&join.entity, &join.alias),
                on: join.on.clone(),
            })?;
        }

        if descriptor.distinct {
            metadata.set_distinct(true);
        }

        for select in &descriptor.selects {
            metadata.add_select(SelectItem::aliased(select.to_expr(), &select.alias));
        }

        for reference in &descriptor.group_by {
            metadata.add_group_by(Self::ref_expr(descriptor, reference));
        }

        for order in &descriptor.order_by {
            metadata.add_order_by(OrderKey {
                expr: Self::ref_expr(descriptor, &order.target),
                ascending: order.ascending,
            });
        }

        debug!(shape = descriptor.shape, "compiled projection into query metadata");
        Ok(metadata)
    }

    /// Compile and install the filter's bound predicate as the WHERE clause.
    pub fn compile_filtered<F: FilterShape>(
        descriptor: &ProjectionDescriptor,
        filter: &F,
        provider: &dyn EntityProvider,
    ) -> Result<QueryMetadata, ShapeError> {
        let mut metadata = Self::compile(descriptor)?;

        let root = CriteriaCompiler::compile::<F>(descriptor, provider)?;
        if let Some(predicate) = root.bind(filter).map_err(ShapeError::Ir)? {
            metadata.add_where(predicate);
        }

        Ok(metadata)
    }

    /// A resolved reference lowers to the referenced select's expression, or
    /// to a plain column on its source.
    fn ref_expr(descriptor: &ProjectionDescriptor, reference: &ResolvedRef) -> Expr {
        match reference {
            ResolvedRef::Select(index) => descriptor.selects[*index].to_expr(),
            ResolvedRef::Member { source, name } => Expr::column(source, name),
        }
    }
}
