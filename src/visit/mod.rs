pub mod visitor;
pub use visitor::*;

pub mod lower_error;
pub use lower_error::*;
