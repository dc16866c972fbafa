use crate::normalize::NormalizeOptions;

/// Per-deployment switches for the optional parts of the answer pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Render the supporting-document block and accept document input.
    pub include_document_text: bool,
    /// Render the options block and the pick-one-option instruction.
    pub include_options: bool,
    /// Accept `regenerate` requests.
    pub include_rewrite: bool,
    pub strip_sys_tokens: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            include_document_text: true,
            include_options: true,
            include_rewrite: true,
            strip_sys_tokens: false,
        }
    }
}

impl PipelineConfig {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            strip_sys_tokens: self.strip_sys_tokens,
        }
    }
}
