//! Wire format of the `generateContent` REST endpoint.

use serde::{Deserialize, Serialize};

use crate::ProviderError;

use super::types::{GeminiRequest, GeminiResponse};

#[derive(Debug, Serialize)]
pub(crate) struct GeminiApiRequest {
    pub contents: Vec<GeminiApiContent>,
    pub system_instruction: GeminiApiContent,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GeminiApiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiApiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GeminiApiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl From<GeminiRequest> for GeminiApiRequest {
    fn from(value: GeminiRequest) -> Self {
        Self {
            contents: value
                .contents
                .into_iter()
                .map(|content| GeminiApiContent {
                    role: Some(content.role.as_str().to_string()),
                    parts: vec![GeminiApiPart {
                        text: Some(content.text),
                    }],
                })
                .collect(),
            system_instruction: GeminiApiContent {
                role: None,
                parts: vec![GeminiApiPart {
                    text: Some(value.system_instruction),
                }],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiApiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiApiCandidate>,
    #[serde(rename = "promptFeedback")]
    pub prompt_feedback: Option<GeminiApiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiApiCandidate {
    pub content: Option<GeminiApiContent>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiApiPromptFeedback {
    #[serde(rename = "blockReason")]
    pub block_reason: Option<String>,
}

impl TryFrom<GeminiApiResponse> for GeminiResponse {
    type Error = ProviderError;

    fn try_from(value: GeminiApiResponse) -> Result<Self, Self::Error> {
        let block_reason = value
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason);

        let Some(candidate) = value.candidates.into_iter().next() else {
            return Err(ProviderError::malformed_response(match block_reason {
                Some(reason) => format!("Gemini blocked the prompt: {reason}"),
                None => "Gemini response did not include candidates".to_string(),
            }));
        };

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::malformed_response(format!(
                "Gemini candidate contained no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(Self {
            text,
            finish_reason: candidate.finish_reason,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeminiApiErrorEnvelope {
    error: GeminiApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiApiErrorBody {
    message: Option<String>,
    status: Option<String>,
}

pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let envelope = serde_json::from_str::<GeminiApiErrorEnvelope>(body).ok()?;
    let message = envelope.error.message?;
    Some(match envelope.error.status {
        Some(status) if !status.is_empty() => format!("{status}: {message}"),
        _ => message,
    })
}
