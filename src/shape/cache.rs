use once_cell::sync::Lazy;
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::shape::{GroupDescriptor, ProjectionDescriptor};

// Process-wide descriptor caches, keyed by shape type identity. Entries are
// published fully built; when two threads race the first published entry
// wins and the loser's copy is discarded.

static PROJECTIONS: Lazy<RwLock<HashMap<TypeId, Arc<ProjectionDescriptor>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

static CRITERIA: Lazy<RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub(crate) fn projection_get(key: TypeId) -> Option<Arc<ProjectionDescriptor>> {
    PROJECTIONS.read().unwrap().get(&key).map(Arc::clone)
}

pub(crate) fn projection_publish(
    key: TypeId,
    descriptor: Arc<ProjectionDescriptor>,
) -> Arc<ProjectionDescriptor> {
    let mut guard = PROJECTIONS.write().unwrap();
    Arc::clone(guard.entry(key).or_insert(descriptor))
}

pub(crate) fn criteria_get<F: 'static>() -> Option<Arc<GroupDescriptor<F>>> {
    let guard = CRITERIA.read().unwrap();
    guard
        .get(&TypeId::of::<F>())
        .map(Arc::clone)
        .and_then(|entry| entry.downcast::<GroupDescriptor<F>>().ok())
}

pub(crate) fn criteria_publish<F: 'static>(
    descriptor: Arc<GroupDescriptor<F>>,
) -> Arc<GroupDescriptor<F>> {
    let mut guard = CRITERIA.write().unwrap();
    let entry = guard.entry(TypeId::of::<F>()).or_insert_with(|| {
        let erased: Arc<dyn Any + Send + Sync> = descriptor;
        erased
    });
    Arc::clone(entry)
        .downcast::<GroupDescriptor<F>>()
        .expect("criteria cache entry matches the type it is keyed by")
}
