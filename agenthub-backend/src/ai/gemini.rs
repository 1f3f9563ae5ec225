use crate::ai::{ModelClient, ModelError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// REST client for the Gemini `generateContent` endpoint, bound to one
/// API key. Failover across keys lives in [`crate::ai::ModelGateway`].
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    label: String,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
    #[serde(default)]
    status: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str, label: &str) -> Result<Self, String> {
        if api_key.is_empty() {
            return Err("Gemini API key is empty".to_string());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            label: label.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, self.model, self.api_key
        )
    }
}

/// Map a non-success response to a [`ModelError`], pulling the provider's
/// error message out of the body when it parses.
fn classify_error(status: u16, body: &str) -> ModelError {
    let (message, error_status) = match serde_json::from_str::<GeminiErrorResponse>(body) {
        Ok(parsed) => (parsed.error.message, parsed.error.status),
        Err(_) => (format!("HTTP {}: {}", status, body), String::new()),
    };

    let quota = status == 429
        || error_status == "RESOURCE_EXHAUSTED"
        || message.to_lowercase().contains("quota");

    if quota {
        ModelError::RateLimited(message)
    } else {
        ModelError::Upstream(message)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, ModelError> {
        let request = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: system_prompt.to_string(),
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: user_text.to_string(),
                }],
            }],
        };

        log::debug!(
            "[GEMINI:{}] sending request to model {} ({} prompt chars)",
            self.label,
            self.model,
            system_prompt.len() + user_text.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Upstream(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status.as_u16(), &body));
        }

        let data: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Upstream(format!("Failed to parse Gemini response: {}", e)))?;

        let candidate = data
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::Upstream("Gemini returned no candidates".to_string()))?;

        let text = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(ModelError::Upstream(
                "Gemini returned an empty completion".to_string(),
            ));
        }

        Ok(text)
    }

    fn label(&self) -> &str {
        &self.label
    }
}
