//! Prompt construction for grant answers.
//!
//! Block order is fixed: preamble and instructions, rewrite context, question,
//! options, user information, supporting document, response label. Optional blocks
//! are controlled by the deployment's [`PipelineConfig`].

pub mod templates;

use std::fmt;

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use thiserror::Error;
use tracing::debug;

use crate::answer::pipeline::PipelineConfig;
use crate::language::Language;
use crate::prompt::templates::{template_for, TemplateText};

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to serialize user data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A fully rendered prompt, tagged with the language its template was chosen for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    language: Language,
    text: String,
}

impl Prompt {
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A prior answer plus the user's critique of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteContext {
    pub previous_answer: String,
    pub feedback: String,
}

/// Inputs to the standard answer template.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub question: &'a str,
    pub user_data: &'a Value,
    pub document_text: Option<&'a str>,
    pub options: Option<&'a [String]>,
    pub rewrite: Option<&'a RewriteContext>,
}

/// Inputs to the dedicated rewrite template.
#[derive(Debug, Clone, Copy)]
pub struct RewriteInput<'a> {
    pub previous_answer: &'a str,
    pub feedback: &'a str,
    pub question: &'a str,
    pub user_data: &'a Value,
    pub options: Option<&'a [String]>,
}

/// Builds the standard answer prompt.
pub fn build_prompt(
    language: Language,
    input: &PromptInput<'_>,
    pipeline: &PipelineConfig,
) -> Result<Prompt, PromptError> {
    let text = template_for(language);
    let mut blocks = Vec::with_capacity(8);

    blocks.push(format!(
        "{}\n\n{}",
        text.preamble,
        instructions(text, pipeline.include_options, false)
    ));

    if let Some(rewrite) = input.rewrite {
        blocks.push(format!(
            "{} {} {} {} {}",
            text.rewrite_context_label,
            text.previous_answer_label,
            rewrite.previous_answer.trim(),
            text.feedback_label,
            rewrite.feedback.trim()
        ));
    }

    blocks.push(labeled(text.question_label, input.question));

    if pipeline.include_options {
        blocks.push(labeled(text.options_label, &render_options(text, input.options)));
    }

    blocks.push(labeled(text.user_data_label, &render_user_data(input.user_data)?));

    if pipeline.include_document_text {
        let document = input
            .document_text
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(text.not_provided);
        blocks.push(labeled(text.document_label, document));
    }

    blocks.push(text.response_label.to_string());

    let prompt = Prompt {
        language,
        text: blocks.join("\n\n"),
    };
    debug!(language = %language, "Generated prompt: {}", prompt.text);
    Ok(prompt)
}

/// Builds the prompt asking the model to revise a previous answer using feedback.
pub fn build_rewrite_prompt(
    language: Language,
    input: &RewriteInput<'_>,
    pipeline: &PipelineConfig,
) -> Result<Prompt, PromptError> {
    let text = template_for(language);
    let mut blocks = Vec::with_capacity(7);

    blocks.push(format!(
        "{}\n\n{}",
        text.rewrite_preamble,
        instructions(text, pipeline.include_options, true)
    ));
    blocks.push(labeled(text.question_label, input.question));
    blocks.push(labeled(text.previous_answer_label, input.previous_answer.trim()));
    blocks.push(labeled(text.feedback_label, input.feedback.trim()));

    if pipeline.include_options {
        blocks.push(labeled(text.options_label, &render_options(text, input.options)));
    }

    blocks.push(labeled(text.user_data_label, &render_user_data(input.user_data)?));
    blocks.push(text.response_label.to_string());

    let prompt = Prompt {
        language,
        text: blocks.join("\n\n"),
    };
    debug!(language = %language, "Generated rewrite prompt: {}", prompt.text);
    Ok(prompt)
}

fn instructions(text: &TemplateText, with_options: bool, rewrite: bool) -> String {
    let mut lines = vec![text.instructions_label];
    if rewrite {
        lines.push(text.rewrite_instruction);
        lines.push(text.consistency_instruction);
    }
    if with_options {
        lines.push(text.options_instruction);
    }
    lines.push(text.fact_instruction);
    lines.push(text.paragraph_instruction);
    lines.push(text.style_instruction);
    lines.push(text.language_instruction);
    lines.join("\n")
}

fn labeled(label: &str, body: &str) -> String {
    format!("{label}\n{body}")
}

/// One option per line, verbatim and in the caller's order.
fn render_options(text: &TemplateText, options: Option<&[String]>) -> String {
    match options {
        Some(options) if !options.is_empty() => options
            .iter()
            .map(|option| format!("- {option}"))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => text.not_provided.to_string(),
    }
}

/// Pretty-prints user data with a four-space indent. Nothing is truncated.
fn render_user_data(user_data: &Value) -> Result<String, PromptError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    user_data.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
