use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::{
    ir::{IrError, QueryMetadata, SetOp},
    visit::{LowerError, Visitor},
};

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z0-9])").expect("valid acronym boundary pattern"));
static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid camel boundary pattern"));

#[derive(Clone, PartialEq)]
pub enum Source {
    Entity { identifier: String, alias: Option<String> },
    Subquery { metadata: Box<QueryMetadata>, alias: String },
    Cte { name: String, metadata: Box<QueryMetadata>, alias: Option<String> },
    SetOperation { op: SetOp, sources: Vec<Source>, alias: String },
}

impl Source {
    pub fn entity(identifier: &str) -> Source {
        Source::Entity { identifier: identifier.to_string(), alias: None }
    }

    pub fn entity_aliased(identifier: &str, alias: &str) -> Source {
        Source::Entity { identifier: identifier.to_string(), alias: Some(alias.to_string()) }
    }

    pub fn subquery(metadata: QueryMetadata, alias: &str) -> Result<Source, IrError> {
        if alias.trim().is_empty() {
            return IrError::MissingAlias { node: "Subquery" }.err();
        }

        Ok(Source::Subquery { metadata: Box::new(metadata), alias: alias.to_string() })
    }

    pub fn cte(name: &str, metadata: QueryMetadata) -> Result<Source, IrError> {
        if name.trim().is_empty() {
            return IrError::MissingAlias { node: "CommonTableExpression" }.err();
        }

        Ok(Source::Cte { name: name.to_string(), metadata: Box::new(metadata), alias: None })
    }

    pub fn set_operation(op: SetOp, sources: Vec<Source>, alias: &str) -> Result<Source, IrError> {
        if sources.len() < 2 {
            return IrError::EmptySetOperation.err();
        }
        if alias.trim().is_empty() {
            return IrError::MissingAlias { node: "SetOperation" }.err();
        }

        Ok(Source::SetOperation { op, sources, alias: alias.to_string() })
    }

    /// Every source resolves an alias: the explicit one when set, otherwise
    /// a deterministic default derived from the identifier.
    pub fn alias(&self) -> String {
        match self {
            Source::Entity { identifier, alias } => {
                alias.clone().unwrap_or_else(|| Self::default_entity_alias(identifier))
            }
            Source::Subquery { alias, .. } => alias.clone(),
            Source::Cte { name, alias, .. } => alias.clone().unwrap_or_else(|| name.clone()),
            Source::SetOperation { alias, .. } => alias.clone(),
        }
    }

    pub fn with_alias(mut self, new_alias: &str) -> Source {
        match &mut self {
            Source::Entity { alias, .. } => *alias = Some(new_alias.to_string()),
            Source::Subquery { alias, .. } => *alias = new_alias.to_string(),
            Source::Cte { alias, .. } => *alias = Some(new_alias.to_string()),
            Source::SetOperation { alias, .. } => *alias = new_alias.to_string(),
        }
        self
    }

    /// Normalized form of the identifier's last path segment: word boundaries
    /// become underscores, everything lowercased. Applying it to its own
    /// output is a no-op.
    pub fn default_entity_alias(identifier: &str) -> String {
        let last = identifier.rsplit("::").next().unwrap_or(identifier);
        let last = last.rsplit('.').next().unwrap_or(last);
        let spaced = last.replace([' ', '-'], "_");
        let split = ACRONYM_BOUNDARY.replace_all(&spaced, "${1}_${2}");
        let split = CAMEL_BOUNDARY.replace_all(&split, "${1}_${2}");
        split.to_ascii_lowercase()
    }

    pub fn accept<R, C, V>(&self, visitor: &mut V, ctx: &mut C) -> Result<R, LowerError>
    where
        V: Visitor<R, C> + ?Sized,
    {
        let alias = self.alias();
        match self {
            Source::Entity { identifier, .. } => visitor.visit_entity(identifier, &alias, ctx),
            Source::Subquery { metadata, .. } => visitor.visit_subquery(metadata, ctx),
            Source::Cte { name, metadata, .. } => visitor.visit_cte(name, metadata, &alias, ctx),
            Source::SetOperation { op, sources, .. } => {
                visitor.visit_set_operation(*op, sources, &alias, ctx)
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Entity { identifier, .. } => write!(f, "{} {}", identifier, self.alias()),
            Source::Subquery { .. } => write!(f, "(subquery) {}", self.alias()),
            Source::Cte { name, .. } => write!(f, "cte {} {}", name, self.alias()),
            Source::SetOperation { op, sources, .. } => {
                write!(f, "{} of {} sources, {}", op, sources.len(), self.alias())
            }
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Entity { .. } => write!(f, "Entity({})", self),
            Source::Subquery { .. } => write!(f, "Subquery({})", self),
            Source::Cte { .. } => write!(f, "Cte({})", self),
            Source::SetOperation { .. } => write!(f, "SetOperation({})", self),
        }
    }
}
