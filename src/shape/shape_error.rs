use std::fmt::Display;

use crate::ir::IrError;

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeError {
    MissingEntity { shape: &'static str },
    UnknownEntity(String),
    UnknownMember { entity: String, member: String },
    UnknownReference { name: String, source: String },
    DuplicateAlias(String),
    DuplicateMember(String),
    EmptyGroup(String),
    DanglingGroupChild { group: String, child: String },
    CyclicGroup(String),
    Ir(IrError),
}

impl ShapeError {
    pub fn err<T>(self) -> Result<T, ShapeError> {
        Err(self)
    }
}

impl From<IrError> for ShapeError {
    fn from(value: IrError) -> Self {
        ShapeError::Ir(value)
    }
}

impl Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeError::MissingEntity { shape } => {
                write!(f, "ShapeError: shape {} declares no root entity", shape)
            }
            ShapeError::UnknownEntity(identifier) => {
                write!(f, "ShapeError: entity '{}' is not known to the provider", identifier)
            }
            ShapeError::UnknownMember { entity, member } => {
                write!(f, "ShapeError: entity '{}' has no member '{}'", entity, member)
            }
            ShapeError::UnknownReference { name, source } => {
                write!(f, "ShapeError: reference '{}' cannot be resolved against source '{}'", name, source)
            }
            ShapeError::DuplicateAlias(alias) => {
                write!(f, "ShapeError: alias '{}' is declared more than once", alias)
            }
            ShapeError::DuplicateMember(member) => {
                write!(f, "ShapeError: member '{}' is declared more than once", member)
            }
            ShapeError::EmptyGroup(id) => {
                write!(f, "ShapeError: group '{}' has no criteria and no children", id)
            }
            ShapeError::DanglingGroupChild { group, child } => {
                write!(f, "ShapeError: group '{}' references child '{}' which is neither a criteria group nor a definition", group, child)
            }
            ShapeError::CyclicGroup(id) => {
                write!(f, "ShapeError: group '{}' participates in a definition cycle", id)
            }
            ShapeError::Ir(inner) => write!(f, "ShapeError: {}", inner),
        }
    }
}
