//! Reduce a raw completion to the result shape of its template.
//!
//! Both reductions are deliberately loose: they tolerate chatter around the
//! answer instead of parsing it strictly.

use crate::template::Template;
use serde::Serialize;

/// Final output of one request.
///
/// Serializes as a bare JSON array (pairs) or a bare JSON string (label).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ClassificationResult {
    Pairs(Vec<String>),
    Label(String),
}

impl ClassificationResult {
    /// The sentinel for `template`: `[]` or `""`.
    pub fn empty(template: Template) -> Self {
        match template {
            Template::Pairs => ClassificationResult::Pairs(Vec::new()),
            Template::Taxonomy => ClassificationResult::Label(String::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ClassificationResult::Pairs(pairs) => pairs.is_empty(),
            ClassificationResult::Label(label) => label.is_empty(),
        }
    }
}

/// `*`-separated candidates, trimmed, empties dropped, order kept.
///
/// ```
/// use polytag_pipeline::normalize::normalize_pairs;
///
/// let got = normalize_pairs(" Topic:Health * Economy:Jane Doe * ");
/// assert_eq!(got, vec!["Topic:Health", "Economy:Jane Doe"]);
/// ```
pub fn normalize_pairs(completion: &str) -> Vec<String> {
    completion
        .split('*')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Last whitespace-delimited token, or `""`.
///
/// ```
/// use polytag_pipeline::normalize::normalize_label;
///
/// assert_eq!(normalize_label("Based on the text: Infrastructure"), "Infrastructure");
/// assert_eq!(normalize_label("   "), "");
/// ```
pub fn normalize_label(completion: &str) -> String {
    completion
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .to_string()
}

pub fn normalize(template: Template, completion: &str) -> ClassificationResult {
    match template {
        Template::Pairs => ClassificationResult::Pairs(normalize_pairs(completion)),
        Template::Taxonomy => ClassificationResult::Label(normalize_label(completion)),
    }
}

/// One `topic:politician` candidate split for downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicPair {
    pub topic: String,
    pub politician: String,
}

impl TopicPair {
    /// Split on the first `:`; both halves must be non-empty after trimming.
    ///
    /// ```
    /// use polytag_pipeline::TopicPair;
    ///
    /// let pair = TopicPair::parse("Economy: Jane Doe").unwrap();
    /// assert_eq!(pair.topic, "Economy");
    /// assert_eq!(pair.politician, "Jane Doe");
    /// assert!(TopicPair::parse("no delimiter").is_none());
    /// ```
    pub fn parse(candidate: &str) -> Option<TopicPair> {
        let (topic, politician) = candidate.split_once(':')?;
        let (topic, politician) = (topic.trim(), politician.trim());
        if topic.is_empty() || politician.is_empty() {
            return None;
        }
        Some(TopicPair {
            topic: topic.to_string(),
            politician: politician.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_keep_order_and_drop_empties() {
        assert_eq!(
            normalize_pairs("*a:b**  *c:d*"),
            vec!["a:b".to_string(), "c:d".to_string()]
        );
    }

    #[test]
    fn pairs_without_delimiter_yield_single_candidate() {
        assert_eq!(
            normalize_pairs("\nHealthcare:John Smith\n"),
            vec!["Healthcare:John Smith".to_string()]
        );
    }

    #[test]
    fn pairs_of_blank_completion_are_empty() {
        assert!(normalize_pairs("  * * ").is_empty());
        assert!(normalize_pairs("").is_empty());
    }

    #[test]
    fn label_takes_last_token_across_lines() {
        assert_eq!(normalize_label("The category is\n\nEconomy\n"), "Economy");
        assert_eq!(normalize_label("Housing"), "Housing");
    }

    #[test]
    fn label_does_not_check_membership() {
        assert_eq!(normalize_label("I think: Sports"), "Sports");
    }

    #[test]
    fn result_serializes_as_bare_json() {
        let pairs = ClassificationResult::Pairs(vec!["a:b".into()]);
        assert_eq!(serde_json::to_string(&pairs).unwrap(), r#"["a:b"]"#);
        let label = ClassificationResult::Label("Economy".into());
        assert_eq!(serde_json::to_string(&label).unwrap(), r#""Economy""#);
    }

    #[test]
    fn sentinels_are_empty() {
        assert!(ClassificationResult::empty(Template::Pairs).is_empty());
        assert!(ClassificationResult::empty(Template::Taxonomy).is_empty());
        assert_eq!(
            serde_json::to_string(&ClassificationResult::empty(Template::Pairs)).unwrap(),
            "[]"
        );
    }

    #[test]
    fn topic_pair_splits_on_first_colon_only() {
        let pair = TopicPair::parse("Foreign Policy:Dr: Who").unwrap();
        assert_eq!(pair.topic, "Foreign Policy");
        assert_eq!(pair.politician, "Dr: Who");
        assert!(TopicPair::parse(":Nobody").is_none());
    }
}
