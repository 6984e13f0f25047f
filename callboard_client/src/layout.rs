use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use crate::api::AuthenticatedTransport;
use crate::error::LayoutError;
use crate::models::LayoutPreferences;

const LAYOUT_PATH: &str = "/call-layout";

/// The server answers either `{ "data": { ... } }` or the bare object.
#[derive(Deserialize)]
#[serde(untagged)]
enum LayoutEnvelope {
    Wrapped { data: LayoutPreferences },
    Bare(LayoutPreferences),
}

impl LayoutEnvelope {
    fn into_inner(self) -> LayoutPreferences {
        match self {
            LayoutEnvelope::Wrapped { data } => data,
            LayoutEnvelope::Bare(prefs) => prefs,
        }
    }
}

/// Reads and writes the user's saved call layout.
///
/// Reads are best effort and fall back to an empty layout. Writes report
/// every failure so a lost save never goes unnoticed.
#[derive(Clone)]
pub struct LayoutGateway {
    transport: Arc<dyn AuthenticatedTransport>,
}

impl LayoutGateway {
    pub fn new(transport: Arc<dyn AuthenticatedTransport>) -> Self {
        Self { transport }
    }

    pub async fn fetch(&self) -> LayoutPreferences {
        let response = match self.transport.get(LAYOUT_PATH).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "call layout unavailable, using defaults");
                return LayoutPreferences::default();
            }
        };
        if !response.is_success() {
            warn!(status = response.status, "call layout request failed, using defaults");
            return LayoutPreferences::default();
        }
        match response.json::<LayoutEnvelope>() {
            Ok(envelope) => envelope.into_inner(),
            Err(err) => {
                warn!(error = %err, "unexpected call layout shape, using defaults");
                LayoutPreferences::default()
            }
        }
    }

    pub async fn save(&self, prefs: &LayoutPreferences) -> Result<(), LayoutError> {
        let body =
            serde_json::to_value(prefs).map_err(|err| LayoutError::Transport(err.to_string()))?;
        let response = self.transport.put_json(LAYOUT_PATH, body).await?;
        if !response.is_success() {
            return Err(LayoutError::SaveFailed {
                status: response.status,
            });
        }
        Ok(())
    }
}
