//! Wire format of the `chat/completions` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ProviderError;

use super::types::{OpenAiRequest, OpenAiResponse};

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiRequest {
    pub model: String,
    pub messages: Vec<OpenAiApiMessage>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiMessage {
    pub role: String,
    pub content: String,
}

impl From<OpenAiRequest> for OpenAiApiRequest {
    fn from(value: OpenAiRequest) -> Self {
        Self {
            model: value.model,
            messages: value
                .messages
                .into_iter()
                .map(|message| OpenAiApiMessage {
                    role: message.role.as_str().to_string(),
                    content: message.content,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiResponse {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<OpenAiApiChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiChoice {
    pub message: OpenAiApiAssistantMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiAssistantMessage {
    pub content: Option<String>,
    pub refusal: Option<String>,
}

impl TryFrom<OpenAiApiResponse> for OpenAiResponse {
    type Error = ProviderError;

    fn try_from(value: OpenAiApiResponse) -> Result<Self, Self::Error> {
        let choice = value.choices.into_iter().next().ok_or_else(|| {
            ProviderError::malformed_response("OpenAI response did not include choices")
        })?;

        let content = choice.message.content.unwrap_or_default();
        if content.trim().is_empty() {
            return Err(ProviderError::malformed_response(match choice.message.refusal {
                Some(refusal) => format!("OpenAI refused the request: {refusal}"),
                None => "OpenAI choice contained no text".to_string(),
            }));
        }

        Ok(Self {
            model: value.model,
            content,
            finish_reason: choice.finish_reason,
        })
    }
}

pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    value
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
}
