use indexmap::IndexMap;

use crate::schema::MemberInfo;

/// Declared shape of one entity: an opaque identifier, an optional physical
/// table name, and the members in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityInfo {
    pub identifier: String,
    pub table: Option<String>,
    pub members: IndexMap<String, MemberInfo>,
}

impl EntityInfo {
    pub fn new(identifier: &str) -> EntityInfo {
        EntityInfo { identifier: identifier.to_string(), table: None, members: IndexMap::new() }
    }

    pub fn with_table(mut self, table: &str) -> EntityInfo {
        self.table = Some(table.to_string());
        self
    }

    pub fn member(mut self, name: &str) -> EntityInfo {
        self.members.insert(name.to_string(), MemberInfo::new(name));
        self
    }

    pub fn member_mapped(mut self, name: &str, column: &str) -> EntityInfo {
        self.members.insert(name.to_string(), MemberInfo::mapped(name, column));
        self
    }

    pub fn get(&self, name: &str) -> Option<&MemberInfo> {
        self.members.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_keep_declaration_order() {
        let entity = EntityInfo::new("Customer").member("id").member("full_name").member("city");

        let names: Vec<&String> = entity.members.keys().collect::<Vec<_>>();
        assert_eq!(names, vec!["id", "full_name", "city"]);
    }

    #[test]
    fn test_column_name_defaults_to_member_name() {
        let entity = EntityInfo::new("Customer").member("id").member_mapped("fullName", "full_name");

        assert_eq!(entity.get("id").expect("Failed to find member").column_name(), "id");
        assert_eq!(entity.get("fullName").expect("Failed to find member").column_name(), "full_name");
    }
}
