pub mod derive;
pub mod enrich;
pub mod parents;
pub mod scoring;
pub mod view;

pub use derive::*;
pub use enrich::*;
pub use parents::*;
pub use scoring::{align_features, encode_features, load_model, score_record, LinearModel, SuccessModel};
pub use view::*;
