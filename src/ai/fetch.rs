//! Raw move acquisition over HTTP
//!
//! Two request shapes are supported, tried in order: the modern chat
//! completion endpoint, then the legacy completion endpoint. A shape counts
//! as failed on transport errors, timeouts, non-success status, or a body
//! without usable text; the next shape is tried and only after both fail
//! does the caller see [`AiError::SourceUnavailable`].
//!
//! The sampling parameters are fixed constants biasing the model toward one
//! short move token. That is a correctness measure, not a quality one:
//! verbose output defeats the downstream parser.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use shakmaty::Chess;
use tracing::{info, warn};

use super::connection::{ConnectionState, SharedConnectionState, UNKNOWN_MODEL};
use super::error::AiError;
use super::prompt::MovePrompt;

/// Per-attempt timeout; generation is slower than a liveness check
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 12;
const STOP: [&str; 2] = ["\n", "."];
const TOP_P: f32 = 1.0;
const FREQUENCY_PENALTY: f32 = 0.0;
const PRESENCE_PENALTY: f32 = 0.0;

/// Chat-style request body
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stop: &'static [&'static str],
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatRequest<'a> {
    pub(crate) fn new(model: &'a str, system: &'a str, user: &'a str) -> Self {
        ChatRequest {
            model,
            messages: vec![
                ChatRequestMessage {
                    role: "system",
                    content: system,
                },
                ChatRequestMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stop: &STOP,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
            stream: false,
        }
    }
}

/// Legacy completion-style request body, same tuning
#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
    stop: &'static [&'static str],
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
    stream: bool,
}

impl<'a> CompletionRequest<'a> {
    pub(crate) fn new(model: &'a str, prompt: &'a str) -> Self {
        CompletionRequest {
            model,
            prompt,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stop: &STOP,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: Option<String>,
}

/// Fetch raw move text from the server, trying both request shapes
pub async fn fetch_raw_move(
    client: &Client,
    base_url: &str,
    prompt: &MovePrompt,
    model_id: &str,
) -> Result<String, AiError> {
    let chat_error = match chat_attempt(client, base_url, prompt, model_id).await {
        Ok(text) => {
            info!("[AI] chat completion answered: {text:?}");
            return Ok(text);
        }
        Err(err) => err,
    };
    warn!("[AI] chat completion attempt failed: {chat_error}");

    match completion_attempt(client, base_url, prompt, model_id).await {
        Ok(text) => {
            info!("[AI] legacy completion answered: {text:?}");
            Ok(text)
        }
        Err(completion_error) => {
            warn!("[AI] legacy completion attempt failed: {completion_error}");
            Err(AiError::SourceUnavailable {
                message: format!("chat: {chat_error}; completions: {completion_error}"),
            })
        }
    }
}

async fn chat_attempt(
    client: &Client,
    base_url: &str,
    prompt: &MovePrompt,
    model_id: &str,
) -> Result<String, String> {
    let body = ChatRequest::new(model_id, &prompt.system, &prompt.user);
    let response = client
        .post(format!("{base_url}/chat/completions"))
        .timeout(FETCH_TIMEOUT)
        .json(&body)
        .send()
        .await
        .map_err(|err| err.to_string())?
        .error_for_status()
        .map_err(|err| err.to_string())?;
    let parsed: ChatResponse = response.json().await.map_err(|err| err.to_string())?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| "no message content in response".to_string())
}

async fn completion_attempt(
    client: &Client,
    base_url: &str,
    prompt: &MovePrompt,
    model_id: &str,
) -> Result<String, String> {
    let text = prompt.completion_text();
    let body = CompletionRequest::new(model_id, &text);
    let response = client
        .post(format!("{base_url}/completions"))
        .timeout(FETCH_TIMEOUT)
        .json(&body)
        .send()
        .await
        .map_err(|err| err.to_string())?
        .error_for_status()
        .map_err(|err| err.to_string())?;
    let parsed: CompletionResponse = response.json().await.map_err(|err| err.to_string())?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.text)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| "no completion text in response".to_string())
}

/// One configured move source: HTTP client, base URL, connection handle
///
/// The connection handle is injected rather than looked up ambiently; it
/// names the model to ask for and is advisory only - the fetcher attempts
/// the request even when the last probe failed, since a refused connection
/// fails fast into the fallback path anyway.
pub struct RemoteMoveSource {
    client: Client,
    base_url: String,
    connection: SharedConnectionState,
    move_delay: Duration,
}

impl RemoteMoveSource {
    pub fn new(
        client: Client,
        base_url: String,
        connection: SharedConnectionState,
        move_delay: Duration,
    ) -> Self {
        RemoteMoveSource {
            client,
            base_url,
            connection,
            move_delay,
        }
    }

    /// Pacing delay applied before each remote turn
    pub fn move_delay(&self) -> Duration {
        self.move_delay
    }

    /// Snapshot of the probe loop's latest result
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.read().clone()
    }

    /// Request raw move text for the side to move in `position`
    pub async fn request_move(&self, position: &Chess) -> Result<String, AiError> {
        let prompt = MovePrompt::for_position(position);
        let model_id = self
            .connection
            .read()
            .model_id
            .clone()
            .unwrap_or_else(|| UNKNOWN_MODEL.to_string());
        fetch_raw_move(&self.client, &self.base_url, &prompt, &model_id).await
    }
}
