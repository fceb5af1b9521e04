use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use flowconf_document::ComponentKind;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("validator transport failure: {0}")]
    Transport(String),

    #[error("validator rejected the request: {0}")]
    Rejected(String),
}

/// Verdict from the remote validator for one component's configuration.
/// `errors` carries free-text messages without position information;
/// the pipeline recovers positions itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteValidation {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// External remote-validation collaborator. Transport, auth and
/// timeouts live behind this trait.
#[async_trait]
pub trait RemoteValidator: Send + Sync {
    async fn validate(
        &self,
        kind: ComponentKind,
        name: &str,
        config: &Value,
    ) -> Result<RemoteValidation, RemoteError>;
}
