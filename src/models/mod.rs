pub mod catalog;
pub mod schema;
pub mod value;

pub use catalog::*;
pub use schema::*;
pub use value::*;
