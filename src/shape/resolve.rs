use tracing::trace;

use crate::{
    schema::EntityProvider,
    shape::{JoinDescriptor, SelectDescriptor, ShapeError},
};

/// Outcome of resolving an identifier: either one of the projection's own
/// selects (by position) or a declared member of a bound source entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRef {
    Select(usize),
    Member { source: String, name: String },
}

pub(crate) struct ResolveContext<'a> {
    pub root_entity: &'a str,
    pub root_alias: &'a str,
    pub selects: &'a [SelectDescriptor],
    pub joins: &'a [JoinDescriptor],
    pub provider: &'a dyn EntityProvider,
}

impl ResolveContext<'_> {
    /// Entity identifier bound to a source alias, if the alias is bound at
    /// all (the projection's own source or any join target).
    pub fn entity_for_alias(&self, alias: &str) -> Option<&str> {
        if alias == self.root_alias {
            return Some(self.root_entity);
        }

        self.joins.iter().find(|j| j.alias == alias).map(|j| j.entity.as_str())
    }

    /// Resolution order: the projection's own selects win over raw entity
    /// members; only then is the source alias consulted.
    pub fn resolve(&self, ident: &str, source: Option<&str>) -> Result<ResolvedRef, ShapeError> {
        if let Some(index) = self.selects.iter().position(|s| s.reference_name() == ident) {
            trace!(ident, index, "resolved reference to projection select");
            return Ok(ResolvedRef::Select(index));
        }

        let alias = source.unwrap_or(self.root_alias);
        if let Some(entity_ident) = self.entity_for_alias(alias) {
            let entity = self
                .provider
                .entity(entity_ident)
                .ok_or_else(|| ShapeError::UnknownEntity(entity_ident.to_string()))?;
            if entity.get(ident).is_some() {
                trace!(ident, alias, "resolved reference to entity member");
                return Ok(ResolvedRef::Member { source: alias.to_string(), name: ident.to_string() });
            }
        }

        ShapeError::UnknownReference { name: ident.to_string(), source: alias.to_string() }.err()
    }
}
