/// AI Client — the single point of entry for every AI enhancement call.
///
/// ARCHITECTURAL RULE: No other module may call the chat-completions API directly.
/// Callers go through `produce_or_fallback`, which always yields a value: when the
/// provider is disabled or fails, the deterministic heuristic result is returned.
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

pub mod prompts;

pub const DEFAULT_ENDPOINT: &str = "https://api.x.ai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "grok-2-latest";
const TEMPERATURE: f32 = 0.2;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI enhancement is not configured")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("AI returned empty content")]
    EmptyContent,
}

/// Instructions for one structured request. The provider must answer with a JSON object.
#[derive(Debug, Clone)]
pub struct StructuredRequest<'a> {
    pub instructions: &'a str,
    pub schema_hint: Option<&'a str>,
}

/// Capability behind the optional AI layer. Chosen once at startup.
#[async_trait]
pub trait AiProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn produce(&self, request: &StructuredRequest<'_>) -> Result<serde_json::Value, AiError>;
}

/// Builds the provider for this process: Grok when an API key is configured,
/// the heuristic-only provider otherwise.
pub fn build_provider(config: &Config) -> anyhow::Result<Arc<dyn AiProvider>> {
    match &config.grok_api_key {
        Some(key) => {
            let client = GrokClient::new(
                key.clone(),
                config.grok_model.clone(),
                config.grok_base_url.clone(),
            )?;
            info!("AI enhancement enabled (model: {})", config.grok_model);
            Ok(Arc::new(client))
        }
        None => {
            info!("AI enhancement disabled; using heuristic results only");
            Ok(Arc::new(HeuristicOnly))
        }
    }
}

/// Single attempt against the provider. Any failure, including a reply whose shape
/// does not match `T`, is logged and answered with `fallback()`. No retries.
pub async fn produce_or_fallback<T, F>(
    provider: &dyn AiProvider,
    request: &StructuredRequest<'_>,
    fallback: F,
) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let outcome = provider
        .produce(request)
        .await
        .and_then(|value| serde_json::from_value::<T>(value).map_err(AiError::Parse));

    match outcome {
        Ok(value) => value,
        Err(AiError::Disabled) => fallback(),
        Err(e) => {
            warn!("AI request via {} failed, using fallback: {e}", provider.name());
            fallback()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Heuristic-only provider
// ────────────────────────────────────────────────────────────────────────────

/// Provider used when no AI key is configured. Always defers to the fallback.
pub struct HeuristicOnly;

#[async_trait]
impl AiProvider for HeuristicOnly {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn produce(&self, _request: &StructuredRequest<'_>) -> Result<serde_json::Value, AiError> {
        Err(AiError::Disabled)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Grok chat-completions provider
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl ChatCompletion {
    /// Text content of the first choice, if any.
    fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

/// Network-backed provider speaking the OpenAI-style chat-completions protocol.
#[derive(Clone)]
pub struct GrokClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GrokClient {
    pub fn new(api_key: String, model: String, endpoint: String) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model,
            endpoint,
        })
    }
}

#[async_trait]
impl AiProvider for GrokClient {
    fn name(&self) -> &'static str {
        "grok"
    }

    async fn produce(&self, request: &StructuredRequest<'_>) -> Result<serde_json::Value, AiError> {
        let user_prompt = build_user_prompt(request);
        let body = ChatRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::JSON_ONLY_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletion = response.json().await?;
        let text = completion.text().ok_or(AiError::EmptyContent)?;
        debug!("AI call succeeded ({} chars)", text.len());

        Ok(serde_json::from_str(extract_json(text))?)
    }
}

fn build_user_prompt(request: &StructuredRequest<'_>) -> String {
    match request.schema_hint {
        Some(hint) => format!("{}\nSchema Hint: {}", request.instructions, hint),
        None => request.instructions.to_string(),
    }
}

/// Cuts the JSON object out of model output: strips ```json fences, then keeps the
/// span from the first `{` to the last `}`. Returns the input trimmed when no such span exists.
fn extract_json(text: &str) -> &str {
    let text = strip_json_fences(text);
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(|s| s.trim())
                .unwrap_or(stripped)
        }
        None => text,
    }
}
