pub mod member_info;
pub use member_info::*;

pub mod entity_info;
pub use entity_info::*;

pub mod catalog;
pub use catalog::*;
