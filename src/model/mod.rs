pub mod hybrid;
pub mod query;

pub use hybrid::*;
pub use query::*;
