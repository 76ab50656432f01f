use indexmap::IndexMap;

use crate::schema::EntityInfo;

/// Access to entity metadata. Implemented by whatever supplies the physical
/// schema; the crate ships `EntityCatalog` as the in-memory implementation.
pub trait EntityProvider {
    fn entity(&self, identifier: &str) -> Option<&EntityInfo>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityCatalog {
    entities: IndexMap<String, EntityInfo>,
}

impl EntityCatalog {
    pub fn new() -> EntityCatalog {
        EntityCatalog::default()
    }

    pub fn register(&mut self, entity: EntityInfo) -> &mut Self {
        self.entities.insert(entity.identifier.clone(), entity);
        self
    }

    pub fn identifiers(&self) -> Vec<String> {
        self.entities.keys().cloned().collect::<Vec<_>>()
    }
}

impl EntityProvider for EntityCatalog {
    fn entity(&self, identifier: &str) -> Option<&EntityInfo> {
        self.entities.get(identifier)
    }
}
