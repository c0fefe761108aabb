//! Job submission types.
//!
//! [`Mode`] is a closed enumeration of the five transformation
//! pipelines. Each variant carries exactly the parameters it needs, so
//! invalid combinations (a translation without a target language, say)
//! cannot be constructed.

use serde::{Deserialize, Serialize};

/// The five document transformation pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    /// Extract text from the source document, no further transformation.
    RecognizeOnly,
    /// Extract text, then proofread it in the given language.
    RecognizeAndProofread { language: String },
    /// Proofread the source text in the given language.
    ProofreadOnly { language: String },
    /// Extract text, then translate it.
    RecognizeAndTranslate { source: String, target: String },
    /// Translate the source text.
    TranslateOnly { source: String, target: String },
}

impl Mode {
    /// Whether this pipeline starts with a recognition pass.
    pub fn requires_recognition(&self) -> bool {
        matches!(
            self,
            Mode::RecognizeOnly
                | Mode::RecognizeAndProofread { .. }
                | Mode::RecognizeAndTranslate { .. }
        )
    }

    /// Fragment used in the output artifact filename:
    /// `{job_id}_{suffix}.txt`.
    pub fn output_suffix(&self) -> String {
        match self {
            Mode::RecognizeOnly => "ocr_raw".to_string(),
            Mode::RecognizeAndProofread { .. } => "ocr_proofread".to_string(),
            Mode::ProofreadOnly { .. } => "proofread".to_string(),
            Mode::RecognizeAndTranslate { target, .. } => format!("ocr_translated_{target}"),
            Mode::TranslateOnly { target, .. } => format!("translated_{target}"),
        }
    }

    /// Short human-readable label for logs and artifact headers.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::RecognizeOnly => "Recognition",
            Mode::RecognizeAndProofread { .. } => "Recognition + Proofread",
            Mode::ProofreadOnly { .. } => "Proofread",
            Mode::RecognizeAndTranslate { .. } => "Recognition + Translation",
            Mode::TranslateOnly { .. } => "Translation",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognition_requirement_per_mode() {
        assert!(Mode::RecognizeOnly.requires_recognition());
        assert!(
            Mode::RecognizeAndProofread {
                language: "en".into()
            }
            .requires_recognition()
        );
        assert!(
            !Mode::ProofreadOnly {
                language: "en".into()
            }
            .requires_recognition()
        );
        assert!(
            !Mode::TranslateOnly {
                source: "en".into(),
                target: "fr".into()
            }
            .requires_recognition()
        );
    }

    #[test]
    fn output_suffixes_match_artifact_scheme() {
        assert_eq!(Mode::RecognizeOnly.output_suffix(), "ocr_raw");
        assert_eq!(
            Mode::RecognizeAndProofread {
                language: "en".into()
            }
            .output_suffix(),
            "ocr_proofread"
        );
        assert_eq!(
            Mode::ProofreadOnly {
                language: "pt".into()
            }
            .output_suffix(),
            "proofread"
        );
        assert_eq!(
            Mode::RecognizeAndTranslate {
                source: "de".into(),
                target: "en".into()
            }
            .output_suffix(),
            "ocr_translated_en"
        );
        assert_eq!(
            Mode::TranslateOnly {
                source: "en".into(),
                target: "fr".into()
            }
            .output_suffix(),
            "translated_fr"
        );
    }

    #[test]
    fn mode_serialization_roundtrip() {
        let mode = Mode::TranslateOnly {
            source: "en".into(),
            target: "fr".into(),
        };
        let json = serde_json::to_string(&mode).unwrap();
        assert!(json.contains(r#""mode":"translate_only"#));
        let parsed: Mode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, mode);
    }
}
