use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of policy-domain labels offered to the model.
///
/// Labels are single tokens so that the last-token reduction in
/// [`crate::normalize`] can recover them from a verbose completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Taxonomy {
    Taxes,
    Healthcare,
    Technology,
    Conflict,
    InternationalRelations,
    Immigration,
    Education,
    Climate,
    Economy,
    SocialWelfare,
    Housing,
    Justice,
    CivilRights,
    Infrastructure,
}

impl Taxonomy {
    pub const ALL: [Taxonomy; 14] = [
        Taxonomy::Taxes,
        Taxonomy::Healthcare,
        Taxonomy::Technology,
        Taxonomy::Conflict,
        Taxonomy::InternationalRelations,
        Taxonomy::Immigration,
        Taxonomy::Education,
        Taxonomy::Climate,
        Taxonomy::Economy,
        Taxonomy::SocialWelfare,
        Taxonomy::Housing,
        Taxonomy::Justice,
        Taxonomy::CivilRights,
        Taxonomy::Infrastructure,
    ];

    /// The exact token the model is asked to answer with.
    pub fn label(self) -> &'static str {
        match self {
            Taxonomy::Taxes => "Taxes",
            Taxonomy::Healthcare => "Healthcare",
            Taxonomy::Technology => "Technology",
            Taxonomy::Conflict => "Conflict",
            Taxonomy::InternationalRelations => "InternationalRelations",
            Taxonomy::Immigration => "Immigration",
            Taxonomy::Education => "Education",
            Taxonomy::Climate => "Climate",
            Taxonomy::Economy => "Economy",
            Taxonomy::SocialWelfare => "SocialWelfare",
            Taxonomy::Housing => "Housing",
            Taxonomy::Justice => "Justice",
            Taxonomy::CivilRights => "CivilRights",
            Taxonomy::Infrastructure => "Infrastructure",
        }
    }

    /// Case-insensitive lookup that ignores surrounding punctuation
    /// (`"infrastructure."`, `"**Economy**"`).
    ///
    /// ```
    /// use polytag_pipeline::Taxonomy;
    ///
    /// assert_eq!(Taxonomy::from_label("economy."), Some(Taxonomy::Economy));
    /// assert_eq!(Taxonomy::from_label("Sports"), None);
    /// ```
    pub fn from_label(raw: &str) -> Option<Taxonomy> {
        let cleaned = raw.trim().trim_matches(|c: char| !c.is_alphanumeric());
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(cleaned))
    }

    /// Comma separated list for the prompt.
    pub fn prompt_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
