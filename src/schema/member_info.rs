/// A declared member of an entity. The core only ever searches members by
/// name; the physical column mapping is carried opaquely for backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub name: String,
    pub column: Option<String>,
}

impl MemberInfo {
    pub fn new(name: &str) -> MemberInfo {
        MemberInfo { name: name.to_string(), column: None }
    }

    pub fn mapped(name: &str, column: &str) -> MemberInfo {
        MemberInfo { name: name.to_string(), column: Some(column.to_string()) }
    }

    /// Physical column name, defaulting to the member name.
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}
