pub mod ir;
pub use ir::{Expr, IrError, Literal, Predicate, QueryMetadata, SelectItem, Source};

pub mod visit;
pub use visit::{LowerError, Visitor};

pub mod schema;
pub use schema::{EntityCatalog, EntityInfo, EntityProvider};

pub mod shape;
pub use shape::{CriteriaDecl, FilterShape, ProjectionDecl, ProjectionShape};

pub mod compile;
pub use compile::QueryCompiler;
