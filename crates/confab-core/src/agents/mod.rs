//! Agent personas — profile data model, catalog bookkeeping, built-in set
//!
//! A persona's identifier keys both its response rule and its membership in
//! conversation groups. The catalog tracks which personas are installed;
//! only installed personas are ever auto-selected.

pub mod builtin;
pub mod catalog;
pub mod profile;

pub use builtin::builtin_profiles;
pub use catalog::{AgentCatalog, CatalogError};
pub use profile::{AgentDraft, AgentProfile};
