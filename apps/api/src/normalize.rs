//! Post-processing of raw model output.
//!
//! The model tends to restate a label such as "Response:" on its own first line,
//! so the first line is dropped outright whenever the output has more than one.

const RESPONSE_LABELS: &[&str] = &["**Response**:", "Response:"];
const SYS_TOKENS: &[&str] = &["<<SYS>>", "[/SYS]"];

#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    /// Also remove Llama-2 style `<<SYS>>` / `[/SYS]` markers.
    pub strip_sys_tokens: bool,
}

/// Cleans raw model output with the default options.
pub fn clean_response(raw: &str) -> String {
    clean_response_with(raw, &NormalizeOptions::default())
}

pub fn clean_response_with(raw: &str, options: &NormalizeOptions) -> String {
    let mut text = match raw.split_once('\n') {
        Some((_, rest)) => rest.trim().to_string(),
        None => raw.trim().to_string(),
    };

    for label in RESPONSE_LABELS {
        text = text.replace(label, "").trim().to_string();
    }

    if options.strip_sys_tokens {
        for token in SYS_TOKENS {
            text = text.replace(token, "").trim().to_string();
        }
    }

    text
}
