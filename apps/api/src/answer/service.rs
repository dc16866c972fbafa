//! Answer pipeline: turns a validated request into a cleaned answer.
//!
//! Flow: resolve user data → detect language → build prompt → invoke model →
//!       normalize output.
//!
//! Every failure is returned as an `AppError`; nothing partial is returned.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::answer::models::AnswerJob;
use crate::errors::AppError;
use crate::language::{detect_language, Language};
use crate::normalize::clean_response_with;
use crate::prompt::{build_prompt, build_rewrite_prompt, Prompt, PromptInput, RewriteInput};
use crate::state::AppState;

/// Runs the full pipeline for one request.
pub async fn answer_question(state: &AppState, job: AnswerJob) -> Result<String, AppError> {
    let pipeline = &state.config.pipeline;

    // Step 1: User data, supplied inline or fetched from the profile service
    let user_data = resolve_user_data(state, &job).await?;

    // Step 2: Language
    let language = detect_language(state.detector.as_ref(), &job.question);
    info!(language = %language, "Detected question language");

    // Step 3: Prompt
    let prompt = prepare_prompt(state, &job, &user_data, language)?;
    debug!(
        language = %prompt.language(),
        chars = prompt.as_str().len(),
        rewrite = job.rewrite.is_some(),
        "Prompt ready"
    );

    // Step 4: Model call, exactly once
    let raw = state
        .llm
        .invoke(&state.config.model_id, prompt.as_str(), &state.config.decoding)
        .await?;

    // Step 5: Normalize
    let answer = clean_response_with(&raw, &pipeline.normalize_options());
    if answer.is_empty() {
        warn!("Model returned no usable text after cleaning");
    }
    info!(chars = answer.len(), "Generated answer");

    Ok(answer)
}

/// Regenerate requests use the dedicated rewrite template unless document text is
/// present, in which case the standard template carries an inline rewrite context
/// so the document block is kept.
fn prepare_prompt(
    state: &AppState,
    job: &AnswerJob,
    user_data: &Value,
    language: Language,
) -> Result<Prompt, AppError> {
    let options = job.options.as_deref();

    let prompt = match (&job.rewrite, &job.document_text) {
        (Some(rewrite), None) => build_rewrite_prompt(
            language,
            &RewriteInput {
                previous_answer: &rewrite.previous_answer,
                feedback: &rewrite.feedback,
                question: &job.question,
                user_data,
                options,
            },
            &state.config.pipeline,
        )?,
        _ => build_prompt(
            language,
            &PromptInput {
                question: &job.question,
                user_data,
                document_text: job.document_text.as_deref(),
                options,
                rewrite: job.rewrite.as_ref(),
            },
            &state.config.pipeline,
        )?,
    };

    Ok(prompt)
}

/// Inline `user_data` wins; otherwise fetch by `client_id`, then by the
/// configured default profile.
async fn resolve_user_data(state: &AppState, job: &AnswerJob) -> Result<Value, AppError> {
    if let Some(user_data) = &job.user_data {
        return Ok(user_data.clone());
    }

    let profile_id = job
        .client_id
        .as_deref()
        .or(state.config.default_profile_id.as_deref())
        .ok_or_else(|| {
            AppError::UpstreamFetch("no user_data, client_id, or default profile".to_string())
        })?;

    state
        .profiles
        .fetch(profile_id)
        .await
        .map_err(|e| AppError::UpstreamFetch(format!("profile {profile_id}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::pipeline::PipelineConfig;
    use crate::llm_client::InferenceError;
    use crate::prompt::RewriteContext;
    use crate::test_support::{test_state, StubInference, StubProfiles};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn job(question: &str) -> AnswerJob {
        AnswerJob {
            question: question.to_string(),
            user_data: None,
            client_id: None,
            document_text: None,
            options: None,
            rewrite: None,
        }
    }

    #[tokio::test]
    async fn test_generates_and_cleans_answer() {
        let llm = StubInference::replying("Response:\n**Response**: Acme builds robots.");
        let profiles = StubProfiles::with(json!({"company_name": "Acme"}));
        let state = test_state(llm.clone(), profiles.clone(), PipelineConfig::default());

        let mut request = job("What does your company do?");
        request.client_id = Some("client-7".to_string());

        let answer = answer_question(&state, request).await.unwrap();
        assert_eq!(answer, "Acme builds robots.");
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
        assert_eq!(profiles.requested(), vec!["client-7".to_string()]);

        let prompt = llm.last_prompt();
        assert!(prompt.contains("What does your company do?"));
        assert!(prompt.contains("\"company_name\": \"Acme\""));
    }

    #[tokio::test]
    async fn test_inline_user_data_skips_fetch() {
        let llm = StubInference::replying("x\nAnswer");
        let profiles = StubProfiles::with(json!({"unused": true}));
        let state = test_state(llm.clone(), profiles.clone(), PipelineConfig::default());

        let mut request = job("Q?");
        request.user_data = Some(json!({"inline": "yes"}));

        answer_question(&state, request).await.unwrap();
        assert!(profiles.requested().is_empty());
        assert!(llm.last_prompt().contains("\"inline\": \"yes\""));
    }

    #[tokio::test]
    async fn test_default_profile_used_without_client_id() {
        let llm = StubInference::replying("x\nAnswer");
        let profiles = StubProfiles::with(json!({"name": "Default Co"}));
        let state = test_state(llm, profiles.clone(), PipelineConfig::default());

        answer_question(&state, job("Q?")).await.unwrap();
        assert_eq!(profiles.requested(), vec!["default-profile".to_string()]);
    }

    #[tokio::test]
    async fn test_profile_failure_is_upstream_error_and_skips_model() {
        let llm = StubInference::replying("x\nAnswer");
        let state = test_state(llm.clone(), StubProfiles::failing(), PipelineConfig::default());

        let result = answer_question(&state, job("Q?")).await;
        assert!(matches!(result, Err(AppError::UpstreamFetch(_))));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_model_failure_is_inference_error() {
        let llm = StubInference::failing("ThrottlingException");
        let state = test_state(
            llm.clone(),
            StubProfiles::with(json!({"a": 1})),
            PipelineConfig::default(),
        );

        let result = answer_question(&state, job("Q?")).await;
        assert!(matches!(
            result,
            Err(AppError::Inference(InferenceError::Service(_)))
        ));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_regenerate_uses_rewrite_template() {
        let llm = StubInference::replying("Response:\nImproved answer.");
        let state = test_state(
            llm.clone(),
            StubProfiles::with(json!({"a": 1})),
            PipelineConfig::default(),
        );

        let mut request = job("Describe the project.");
        request.rewrite = Some(RewriteContext {
            previous_answer: "Old text".to_string(),
            feedback: "Add budget".to_string(),
        });

        let answer = answer_question(&state, request).await.unwrap();
        assert_eq!(answer, "Improved answer.");

        let prompt = llm.last_prompt();
        assert!(prompt.starts_with("You are an expert at revising answers"));
        assert!(prompt.contains("**Previous Answer**:\nOld text"));
        assert!(prompt.contains("**Feedback**:\nAdd budget"));
    }

    #[tokio::test]
    async fn test_regenerate_with_document_keeps_document_block() {
        let llm = StubInference::replying("x\nAnswer");
        let state = test_state(
            llm.clone(),
            StubProfiles::with(json!({"a": 1})),
            PipelineConfig::default(),
        );

        let mut request = job("Describe the project.");
        request.document_text = Some("Budget: $50k".to_string());
        request.rewrite = Some(RewriteContext {
            previous_answer: "Old text".to_string(),
            feedback: "Add budget".to_string(),
        });

        answer_question(&state, request).await.unwrap();
        let prompt = llm.last_prompt();
        assert!(prompt.contains("**Rewrite Context**:"));
        assert!(prompt.contains("**Supporting Document**:\nBudget: $50k"));
    }

    #[tokio::test]
    async fn test_sys_tokens_stripped_when_configured() {
        let llm = StubInference::replying("<<SYS>>\n<<SYS>>Clean answer[/SYS]");
        let pipeline = PipelineConfig {
            strip_sys_tokens: true,
            ..PipelineConfig::default()
        };
        let state = test_state(llm, StubProfiles::with(json!({"a": 1})), pipeline);

        let answer = answer_question(&state, job("Q?")).await.unwrap();
        assert_eq!(answer, "Clean answer");
    }

    #[tokio::test]
    async fn test_french_question_gets_french_template() {
        let llm = StubInference::replying("x\nRéponse");
        let state = test_state(
            llm.clone(),
            StubProfiles::with(json!({"a": 1})),
            PipelineConfig::default(),
        );

        answer_question(
            &state,
            job("Décrivez les objectifs principaux de votre entreprise pour les trois prochaines années et expliquez comment la subvention vous aidera."),
        )
        .await
        .unwrap();

        assert!(llm.last_prompt().starts_with("Vous êtes un expert"));
    }
}
