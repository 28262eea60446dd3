//! Move-source connectivity probing
//!
//! Servers implementing this class of API evolve their surface over time:
//! newer builds expose a models listing, older ones only a chat or legacy
//! completion endpoint. [`probe`] tries the three shapes in fixed priority
//! order so an old server still reports as reachable instead of hard-failing
//! on one assumed shape.
//!
//! [`ConnectionMonitor`] owns the periodic re-probe task. It only ever
//! writes [`ConnectionState`]; game state and history are out of its reach.
//! Lifecycle is explicit: `start` spawns the loop, `stop` (or drop) aborts
//! it.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use super::fetch::{ChatRequest, CompletionRequest};

/// Timeout for each individual probe attempt
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default interval between probe rounds
pub const PROBE_INTERVAL: Duration = Duration::from_secs(15);

/// Model id reported when a server answers but does not name its model
pub const UNKNOWN_MODEL: &str = "Unknown";

/// Last known reachability of the move source
///
/// Refreshed out of band by [`ConnectionMonitor`]; read by the fetcher to
/// pick a model identifier and by the presentation layer for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub connected: bool,
    /// Model identifier advertised by the server, if any check surfaced one
    pub model_id: Option<String>,
    /// Aggregated error text from the last failed probe round
    pub last_error: Option<String>,
}

/// Shared handle to the latest [`ConnectionState`]
pub type SharedConnectionState = Arc<RwLock<ConnectionState>>;

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

#[derive(Debug, Deserialize)]
struct LivenessResponse {
    model: Option<String>,
}

/// Probe the move source once
///
/// Tries, in order: the models listing, a trivial chat completion, a trivial
/// legacy completion. The first success wins and short-circuits the rest;
/// if all three fail the returned state aggregates every failure message.
pub async fn probe(client: &Client, base_url: &str) -> ConnectionState {
    let mut failures: Vec<String> = Vec::new();

    match probe_models(client, base_url).await {
        Ok(model_id) => return ConnectionState {
            connected: true,
            model_id: Some(model_id),
            last_error: None,
        },
        Err(err) => failures.push(format!("models: {err}")),
    }

    match probe_chat(client, base_url).await {
        Ok(model_id) => return ConnectionState {
            connected: true,
            model_id: Some(model_id),
            last_error: None,
        },
        Err(err) => failures.push(format!("chat/completions: {err}")),
    }

    match probe_completions(client, base_url).await {
        Ok(model_id) => return ConnectionState {
            connected: true,
            model_id: Some(model_id),
            last_error: None,
        },
        Err(err) => failures.push(format!("completions: {err}")),
    }

    ConnectionState {
        connected: false,
        model_id: None,
        last_error: Some(failures.join("; ")),
    }
}

async fn probe_models(client: &Client, base_url: &str) -> Result<String, String> {
    let response = client
        .get(format!("{base_url}/models"))
        .timeout(PROBE_TIMEOUT)
        .send()
        .await
        .map_err(|err| err.to_string())?
        .error_for_status()
        .map_err(|err| err.to_string())?;
    let listing: ModelsResponse = response.json().await.map_err(|err| err.to_string())?;
    listing
        .models
        .first()
        .map(|model| model.id.clone())
        .ok_or_else(|| "no models advertised".to_string())
}

async fn probe_chat(client: &Client, base_url: &str) -> Result<String, String> {
    let body = ChatRequest::new(UNKNOWN_MODEL, "Connectivity check.", "ping");
    liveness_post(client, &format!("{base_url}/chat/completions"), &body).await
}

async fn probe_completions(client: &Client, base_url: &str) -> Result<String, String> {
    let body = CompletionRequest::new(UNKNOWN_MODEL, "ping");
    liveness_post(client, &format!("{base_url}/completions"), &body).await
}

/// POST a trivial body; success is "any non-empty response body came back"
async fn liveness_post<T: serde::Serialize>(
    client: &Client,
    url: &str,
    body: &T,
) -> Result<String, String> {
    let response = client
        .post(url)
        .timeout(PROBE_TIMEOUT)
        .json(body)
        .send()
        .await
        .map_err(|err| err.to_string())?
        .error_for_status()
        .map_err(|err| err.to_string())?;
    let text = response.text().await.map_err(|err| err.to_string())?;
    if text.trim().is_empty() {
        return Err("empty response body".to_string());
    }
    let model = serde_json::from_str::<LivenessResponse>(&text)
        .ok()
        .and_then(|parsed| parsed.model)
        .unwrap_or_else(|| UNKNOWN_MODEL.to_string());
    Ok(model)
}

/// Background probe loop with an explicit start/stop lifecycle
pub struct ConnectionMonitor {
    state: SharedConnectionState,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl ConnectionMonitor {
    /// Spawn the probe loop; the first probe fires immediately
    pub fn start(client: Client, base_url: String, interval: Duration) -> Self {
        // Configurable interval with a sanity floor
        let interval = interval.max(Duration::from_secs(1));
        let state: SharedConnectionState = Arc::new(RwLock::new(ConnectionState::default()));
        let shared = Arc::clone(&state);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let next = probe(&client, &base_url).await;
                let was_connected = shared.read().connected;
                if next.connected && !was_connected {
                    info!(
                        "[PROBE] move source online (model {})",
                        next.model_id.as_deref().unwrap_or(UNKNOWN_MODEL)
                    );
                } else if !next.connected && was_connected {
                    warn!(
                        "[PROBE] move source offline: {}",
                        next.last_error.as_deref().unwrap_or("unknown error")
                    );
                }
                *shared.write() = next;
            }
        });
        Self {
            state,
            task: Some(task),
        }
    }

    /// Handle for readers (the fetcher, the UI)
    pub fn shared(&self) -> SharedConnectionState {
        Arc::clone(&self.state)
    }

    /// Snapshot of the latest state
    pub fn state(&self) -> ConnectionState {
        self.state.read().clone()
    }

    /// Abort the probe loop
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ConnectionMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_state_starts_disconnected() {
        let state = ConnectionState::default();
        assert!(!state.connected);
        assert!(state.model_id.is_none());
        assert!(state.last_error.is_none());
    }

    #[test]
    fn models_listing_deserializes_and_ignores_extras() {
        let listing: ModelsResponse = serde_json::from_str(
            r#"{"models":[{"id":"llama-3.2-3b","object":"model"},{"id":"other"}],"total":2}"#,
        )
        .unwrap();
        assert_eq!(listing.models.len(), 2);
        assert_eq!(listing.models[0].id, "llama-3.2-3b");
    }

    #[test]
    fn empty_models_listing_is_not_a_success() {
        let listing: ModelsResponse = serde_json::from_str(r#"{"models":[]}"#).unwrap();
        assert!(listing.models.first().is_none());
    }
}
