pub mod columns;
pub mod export;
pub mod import;

pub use export::export_view;
pub use import::read_records;
