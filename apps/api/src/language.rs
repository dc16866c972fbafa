//! Language detection for incoming questions.
//!
//! Only English and French templates exist, so anything the identifier cannot
//! classify as one of the two falls back to English. Detection never fails the
//! request.

use std::fmt;

use thiserror::Error;
use tracing::warn;
use whatlang::{Detector, Lang};

/// The two languages a prompt can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    French,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
        }
    }

    /// Strict lookup by ISO 639-1 code.
    pub fn from_code(code: &str) -> Result<Self, UnsupportedLanguage> {
        match code {
            "en" => Ok(Language::English),
            "fr" => Ok(Language::French),
            other => Err(UnsupportedLanguage(other.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("No features in text")]
    NoFeatures,

    #[error("Could not identify language")]
    Unidentified,
}

/// A statistical language identifier returning an ISO language code.
///
/// Built once at startup and shared by reference; implementations must return the
/// same code for the same input.
pub trait LanguageIdentifier: Send + Sync {
    fn identify(&self, text: &str) -> Result<String, DetectionError>;
}

/// Trigram-based identifier backed by `whatlang`.
pub struct WhatlangIdentifier {
    detector: Detector,
}

impl WhatlangIdentifier {
    pub fn new() -> Self {
        Self {
            detector: Detector::new(),
        }
    }
}

impl Default for WhatlangIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageIdentifier for WhatlangIdentifier {
    fn identify(&self, text: &str) -> Result<String, DetectionError> {
        if !text.chars().any(char::is_alphabetic) {
            return Err(DetectionError::NoFeatures);
        }

        let info = self
            .detector
            .detect(text)
            .ok_or(DetectionError::Unidentified)?;

        let code = match info.lang() {
            Lang::Eng => "en",
            Lang::Fra => "fr",
            other => other.code(),
        };
        Ok(code.to_string())
    }
}

/// Detects the language of `text`, defaulting to English on failure or on any
/// language other than English and French.
pub fn detect_language(identifier: &dyn LanguageIdentifier, text: &str) -> Language {
    match identifier.identify(text) {
        Ok(code) => Language::from_code(&code).unwrap_or_else(|e| {
            warn!("Language detection failed: {e}");
            Language::English
        }),
        Err(e) => {
            warn!("Language detection failed: {e}");
            Language::English
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedIdentifier(Result<&'static str, ()>);

    impl LanguageIdentifier for FixedIdentifier {
        fn identify(&self, _text: &str) -> Result<String, DetectionError> {
            self.0
                .map(str::to_string)
                .map_err(|_| DetectionError::Unidentified)
        }
    }

    #[test]
    fn test_unsupported_code_falls_back_to_english() {
        let identifier = FixedIdentifier(Ok("de"));
        assert_eq!(detect_language(&identifier, "Wie heißt Ihr Unternehmen?"), Language::English);
    }

    #[test]
    fn test_identifier_error_falls_back_to_english() {
        let identifier = FixedIdentifier(Err(()));
        assert_eq!(detect_language(&identifier, "?"), Language::English);
    }

    #[test]
    fn test_french_code_is_kept() {
        let identifier = FixedIdentifier(Ok("fr"));
        assert_eq!(detect_language(&identifier, "Bonjour"), Language::French);
    }

    #[test]
    fn test_from_code_is_strict() {
        assert_eq!(Language::from_code("en"), Ok(Language::English));
        assert_eq!(Language::from_code("fr"), Ok(Language::French));
        assert_eq!(
            Language::from_code("es"),
            Err(UnsupportedLanguage("es".to_string()))
        );
    }

    #[test]
    fn test_whatlang_detects_english_question() {
        let identifier = WhatlangIdentifier::new();
        let language = detect_language(
            &identifier,
            "Describe how your organization will use the funding to hire new employees and grow the business over the next two years.",
        );
        assert_eq!(language, Language::English);
    }

    #[test]
    fn test_whatlang_detects_french_question() {
        let identifier = WhatlangIdentifier::new();
        let language = detect_language(
            &identifier,
            "Décrivez comment votre entreprise utilisera le financement pour embaucher de nouveaux employés et développer ses activités au cours des deux prochaines années.",
        );
        assert_eq!(language, Language::French);
    }

    #[test]
    fn test_whatlang_is_deterministic() {
        let identifier = WhatlangIdentifier::new();
        let text = "Quel est le nom légal de votre entreprise et depuis quand existe-t-elle ?";
        let first = identifier.identify(text).unwrap();
        for _ in 0..5 {
            assert_eq!(identifier.identify(text).unwrap(), first);
        }
    }

    #[test]
    fn test_whatlang_rejects_text_without_letters() {
        let identifier = WhatlangIdentifier::new();
        assert!(matches!(
            identifier.identify("12345 ?!"),
            Err(DetectionError::NoFeatures)
        ));
        assert_eq!(detect_language(&identifier, "12345 ?!"), Language::English);
    }
}
