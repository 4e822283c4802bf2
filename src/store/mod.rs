pub mod session_cache;
pub mod sqlite;
pub mod traits;

pub use session_cache::*;
pub use sqlite::*;
pub use traits::*;
