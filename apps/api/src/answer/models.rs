use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::answer::pipeline::PipelineConfig;
use crate::document::decode_document_content;
use crate::errors::AppError;
use crate::prompt::RewriteContext;

pub const MISSING_QUESTION_MESSAGE: &str = "Missing 'question' in request";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Answer request as sent by callers. Every field is optional at this layer so
/// that missing values map to our own error messages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswerRequest {
    pub question: Option<String>,
    pub user_data: Option<Value>,
    pub client_id: Option<String>,
    /// Base64-encoded supporting text.
    pub document_content: Option<String>,
    pub options: Option<Vec<String>>,
    pub action: Option<String>,
    pub feedback: Option<String>,
    pub previous_response: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Generate,
    Regenerate,
}

impl Action {
    /// `None` for anything other than `generate` / `regenerate`.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            None | Some("") | Some("generate") => Some(Action::Generate),
            Some("regenerate") => Some(Action::Regenerate),
            Some(_) => None,
        }
    }
}

/// A request that passed validation and is ready for the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerJob {
    pub question: String,
    pub user_data: Option<Value>,
    pub client_id: Option<String>,
    pub document_text: Option<String>,
    pub options: Option<Vec<String>>,
    pub rewrite: Option<RewriteContext>,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub result: String,
}

/// Lambda-proxy style response: the status plus the JSON body as a string.
#[derive(Debug, Serialize)]
pub struct Envelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl Envelope {
    pub fn from_result(result: Result<String, AppError>) -> Self {
        match result {
            Ok(answer) => Envelope {
                status_code: 200,
                body: json!({ "result": answer }).to_string(),
            },
            Err(e) => {
                let (status, body) = e.into_status_and_body();
                Envelope {
                    status_code: status.as_u16(),
                    body: body.to_string(),
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing and validation
// ────────────────────────────────────────────────────────────────────────────

/// Parses an invocation event. A non-empty `body` field (JSON text or an object)
/// replaces the outer event.
pub fn parse_event(event: Value) -> Result<AnswerRequest, AppError> {
    let Value::Object(mut map) = event else {
        return Err(AppError::Validation(
            "Request must be a JSON object".to_string(),
        ));
    };

    let payload = match map.remove("body") {
        Some(Value::String(raw)) if !raw.trim().is_empty() => serde_json::from_str(&raw)
            .map_err(|e| AppError::Validation(format!("Request body is not valid JSON: {e}")))?,
        Some(Value::Object(inner)) => Value::Object(inner),
        Some(Value::String(_)) | Some(Value::Null) | None => Value::Object(map),
        Some(_) => {
            return Err(AppError::Validation(
                "Request body must be a JSON string or object".to_string(),
            ))
        }
    };

    serde_json::from_value(payload)
        .map_err(|e| AppError::Validation(format!("Invalid request: {e}")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AnswerRequest {
    /// Checks required fields and decodes inline document content. Nothing here
    /// touches the network.
    pub fn validate(self, pipeline: &PipelineConfig) -> Result<AnswerJob, AppError> {
        let question = non_blank(self.question)
            .ok_or_else(|| AppError::Validation(MISSING_QUESTION_MESSAGE.to_string()))?;

        let action = Action::parse(self.action.as_deref()).ok_or(AppError::InvalidAction)?;

        let rewrite = match action {
            Action::Generate => None,
            Action::Regenerate => {
                if !pipeline.include_rewrite {
                    return Err(AppError::InvalidAction);
                }
                match (non_blank(self.previous_response), non_blank(self.feedback)) {
                    (Some(previous_answer), Some(feedback)) => Some(RewriteContext {
                        previous_answer,
                        feedback,
                    }),
                    _ => return Err(AppError::InvalidAction),
                }
            }
        };

        let document_text = match self.document_content {
            Some(encoded) if pipeline.include_document_text => {
                non_blank(Some(decode_document_content(&encoded)?))
            }
            Some(_) => {
                debug!("Ignoring document_content: document text is disabled");
                None
            }
            None => None,
        };

        let options = if pipeline.include_options {
            self.options
        } else {
            None
        };

        Ok(AnswerJob {
            question,
            user_data: self.user_data.filter(|v| !v.is_null()),
            client_id: non_blank(self.client_id),
            document_text,
            options,
            rewrite,
        })
    }
}
