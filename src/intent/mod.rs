//! Intent catalog and prompt resolution for the vision model runtime.
//!
//! An intent is a named task template describing what the model should do
//! with an uploaded file. Resolution turns an intent id (plus the user's
//! custom text for the `custom` intent) into the literal prompt string the
//! runtime receives. The catalog is fixed at process start and held in
//! `AppState` so resolution stays a pure function of its inputs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod pricing;

pub use pricing::{ModelRates, PriceTable, estimate_tokens};

/// Prefix token that switches the model into document-layout-aware mode.
pub const GROUNDING_MARKER: &str = "<|grounding|>";

#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error("Unknown intent: {0}")]
    UnknownIntent(String),

    #[error("Custom intent requires a non-empty prompt")]
    EmptyCustomPrompt,

    #[error("Unknown model: {0}")]
    UnknownModel(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentId {
    DocumentToMarkdown,
    GeneralOcr,
    FreeOcr,
    ParseFigure,
    DetailedDescription,
    Custom,
}

impl IntentId {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentId::DocumentToMarkdown => "document-to-markdown",
            IntentId::GeneralOcr => "general-ocr",
            IntentId::FreeOcr => "free-ocr",
            IntentId::ParseFigure => "parse-figure",
            IntentId::DetailedDescription => "detailed-description",
            IntentId::Custom => "custom",
        }
    }
}

impl fmt::Display for IntentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentId {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document-to-markdown" => Ok(IntentId::DocumentToMarkdown),
            "general-ocr" => Ok(IntentId::GeneralOcr),
            "free-ocr" => Ok(IntentId::FreeOcr),
            "parse-figure" => Ok(IntentId::ParseFigure),
            "detailed-description" => Ok(IntentId::DetailedDescription),
            "custom" => Ok(IntentId::Custom),
            other => Err(ResolveError::UnknownIntent(other.to_string())),
        }
    }
}

/// A single entry in the intent catalog.
#[derive(Clone, Debug, Serialize)]
pub struct Intent {
    pub id: IntentId,
    pub label: &'static str,
    pub template: &'static str,
    /// Whether the grounding marker is prepended to the template. The two
    /// general description intents run without layout grounding.
    pub grounded: bool,
}

/// The fixed set of intents, constructed once at startup.
#[derive(Clone, Debug)]
pub struct IntentCatalog {
    intents: Vec<Intent>,
}

impl IntentCatalog {
    pub fn builtin() -> Self {
        Self {
            intents: vec![
                Intent {
                    id: IntentId::DocumentToMarkdown,
                    label: "Document to Markdown",
                    template: "Convert the document to markdown.",
                    grounded: true,
                },
                Intent {
                    id: IntentId::GeneralOcr,
                    label: "General OCR",
                    template: "OCR this image.",
                    grounded: true,
                },
                Intent {
                    id: IntentId::FreeOcr,
                    label: "Free OCR (no layout)",
                    template: "Free OCR.",
                    grounded: false,
                },
                Intent {
                    id: IntentId::ParseFigure,
                    label: "Parse Figure",
                    template: "Parse the figure.",
                    grounded: true,
                },
                Intent {
                    id: IntentId::DetailedDescription,
                    label: "Detailed Description",
                    template: "Describe this image in detail.",
                    grounded: false,
                },
                Intent {
                    id: IntentId::Custom,
                    label: "Custom Intent",
                    template: "",
                    grounded: true,
                },
            ],
        }
    }

    pub fn all(&self) -> &[Intent] {
        &self.intents
    }

    fn get(&self, id: IntentId) -> &Intent {
        self.intents
            .iter()
            .find(|intent| intent.id == id)
            .expect("builtin catalog covers every intent id")
    }

    /// Resolve the literal prompt string for an intent.
    ///
    /// The `custom` intent uses `custom_text` verbatim as its template and
    /// fails with `EmptyCustomPrompt` when the text is missing or blank.
    /// The grounding marker is prepended unless the intent is ungrounded or
    /// the template already starts with the marker, so resolving an
    /// already-marked custom prompt never double-prepends.
    pub fn resolve_prompt(
        &self,
        id: IntentId,
        custom_text: Option<&str>,
    ) -> Result<String, ResolveError> {
        let intent = self.get(id);

        let template = if id == IntentId::Custom {
            match custom_text.map(str::trim) {
                Some(text) if !text.is_empty() => text,
                _ => return Err(ResolveError::EmptyCustomPrompt),
            }
        } else {
            intent.template
        };

        if intent.grounded && !template.starts_with(GROUNDING_MARKER) {
            Ok(format!("{GROUNDING_MARKER}{template}"))
        } else {
            Ok(template.to_string())
        }
    }
}
