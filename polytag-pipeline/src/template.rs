use polytag_llm::traits::GenerationParams;
use polytag_web::{ExtractionSettings, StripRule};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker of the summary node read alongside the headline in taxonomy mode.
pub const DEFAULT_SUMMARY_SELECTOR: &str = r#"[data-testid="summary"]"#;

/// Which instruction the excerpt is rendered into, and therefore which
/// result shape comes back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    /// Free-form `{topic}:{politician}` extraction.
    #[default]
    #[serde(alias = "pairExtraction")]
    Pairs,
    /// One label out of the fixed [`crate::Taxonomy`].
    #[serde(alias = "taxonomyClassification")]
    Taxonomy,
}

impl Template {
    /// Output budget is the only knob that differs between templates.
    pub fn generation_params(self) -> GenerationParams {
        let max_tokens = match self {
            Template::Pairs => 100,
            Template::Taxonomy => 20,
        };
        GenerationParams::default().with_max_tokens(max_tokens)
    }

    /// Extraction chain each template was tuned against.
    pub fn default_extraction(self) -> ExtractionSettings {
        match self {
            Template::Pairs => ExtractionSettings {
                strip: StripRule::Strict,
                ..ExtractionSettings::default()
            },
            Template::Taxonomy => ExtractionSettings {
                summary_selector: Some(DEFAULT_SUMMARY_SELECTOR.to_string()),
                strip: StripRule::Basic,
                ..ExtractionSettings::default()
            },
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Template::Pairs => f.write_str("pairs"),
            Template::Taxonomy => f.write_str("taxonomy"),
        }
    }
}

impl FromStr for Template {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pairs" | "pair" | "pairextraction" => Ok(Template::Pairs),
            "taxonomy" | "taxonomyclassification" => Ok(Template::Taxonomy),
            other => Err(format!(
                "unknown template `{other}` (expected `pairs` or `taxonomy`)"
            )),
        }
    }
}
