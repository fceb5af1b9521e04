use async_trait::async_trait;
use thiserror::Error;

use flowconf_document::ComponentKind;

use crate::model::{ComponentRef, ComponentSchema};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("schema registry transport failure: {0}")]
    Transport(String),

    #[error("no schema registered for {kind} '{name}'")]
    NotFound { kind: ComponentKind, name: String },

    #[error("malformed schema payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// External schema registry collaborator.
///
/// Transport, auth and timeouts live behind this trait; the engine only
/// sees success or failure per call.
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    /// Fetches the configuration schema for one named component.
    async fn fetch_schema(
        &self,
        kind: ComponentKind,
        name: &str,
    ) -> Result<ComponentSchema, ProviderError>;

    /// Fetches the full catalog of components the registry knows about.
    async fn fetch_catalog(&self) -> Result<Vec<ComponentRef>, ProviderError>;
}
