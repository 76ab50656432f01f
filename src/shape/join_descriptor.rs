use std::fmt;

use crate::ir::{JoinType, Predicate};

#[derive(Clone, PartialEq)]
pub struct JoinDescriptor {
    pub entity: String,
    pub alias: String,
    pub join_type: JoinType,
    pub on: Predicate,
}

impl fmt::Debug for JoinDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JoinDescriptor({:?} {} {} on {})", self.join_type, self.entity, self.alias, self.on)
    }
}
