//! Axum route handlers for the Answer API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde_json::Value;
use tracing::{info, warn};

use crate::answer::models::{parse_event, AnswerRequest, AnswerResponse, Envelope};
use crate::answer::service::answer_question;
use crate::document::{combine_documents, extract_upload};
use crate::errors::AppError;
use crate::state::AppState;

/// An uploaded file part, held until the text fields have been validated.
struct UploadedFile {
    filename: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/answers
///
/// Answers one question. The payload may be the request itself or an event whose
/// `body` field carries it.
pub async fn handle_answer(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnswerResponse>, AppError> {
    let result = answer_from_body(&state, &body).await?;
    Ok(Json(AnswerResponse { result }))
}

/// POST /invoke
///
/// Same pipeline as `/api/v1/answers`, but always replies 200 with a
/// `{statusCode, body}` envelope for Lambda-proxy style callers.
pub async fn handle_invoke(State(state): State<AppState>, body: Bytes) -> Json<Envelope> {
    let envelope = Envelope::from_result(answer_from_body(&state, &body).await);
    info!(status = envelope.status_code, "Invocation finished");
    Json(envelope)
}

/// POST /api/v1/answers/upload
///
/// Multipart variant: text fields mirror the JSON request, and every file part is
/// extracted to text and appended, in upload order, as supporting document text.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnswerResponse>, AppError> {
    let mut request = AnswerRequest::default();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if field.file_name().is_some() {
            let filename = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file part: {e}")))?;
            files.push(UploadedFile {
                filename,
                content_type,
                bytes,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read field '{name}': {e}")))?;
        apply_text_field(&mut request, &name, value)?;
    }

    let pipeline = state.config.pipeline;
    let mut job = request.validate(&pipeline)?;

    if !files.is_empty() {
        if pipeline.include_document_text {
            let mut texts: Vec<String> = job.document_text.take().into_iter().collect();
            for file in files {
                texts.push(extract_upload(file.filename, file.content_type, file.bytes).await?);
            }
            job.document_text = combine_documents(texts);
        } else {
            warn!(count = files.len(), "Ignoring uploaded files: document text is disabled");
        }
    }

    let result = answer_question(&state, job).await?;
    Ok(Json(AnswerResponse { result }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn answer_from_body(state: &AppState, body: &[u8]) -> Result<String, AppError> {
    let event: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Request is not valid JSON: {e}")))?;
    let job = parse_event(event)?.validate(&state.config.pipeline)?;
    answer_question(state, job).await
}

fn apply_text_field(request: &mut AnswerRequest, name: &str, value: String) -> Result<(), AppError> {
    match name {
        "question" => request.question = Some(value),
        "client_id" => request.client_id = Some(value),
        "action" => request.action = Some(value),
        "feedback" => request.feedback = Some(value),
        "previous_response" => request.previous_response = Some(value),
        "document_content" => request.document_content = Some(value),
        "user_data" => {
            let data = serde_json::from_str(&value)
                .map_err(|e| AppError::Validation(format!("user_data is not valid JSON: {e}")))?;
            request.user_data = Some(data);
        }
        "options" | "options[]" => {
            let options = request.options.get_or_insert_with(Vec::new);
            // A JSON string array carries several options; anything else is one option.
            match serde_json::from_str::<Vec<String>>(&value) {
                Ok(parsed) => options.extend(parsed),
                Err(_) => options.push(value),
            }
        }
        other => warn!("Ignoring unknown form field '{other}'"),
    }
    Ok(())
}
