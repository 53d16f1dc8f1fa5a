// src/patent/mod.rs
pub mod bundle;
pub mod dialect;
pub mod models;

pub use dialect::Dialect;
pub use models::{DocFamily, PatentDocument, PatentType, SchemaVersion};
