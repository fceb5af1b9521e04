//! # Flowconf Schema
//!
//! Component schema model, the external registry collaborator trait,
//! and the session-lived schema cache.
//!
//! Schemas are fetched on demand, keyed by `(kind, name)`, and are
//! immutable once fetched. Every consumer treats a missing schema as
//! "schema unknown, skip schema-driven behavior", never as an error.

mod cache;
mod model;
mod provider;

pub use cache::SchemaCache;
pub use model::{ComponentRef, ComponentSchema, SchemaNode};
pub use provider::{ProviderError, SchemaProvider};
