//! Tiered text extraction from article HTML.
//!
//! A [`TextExtractor`] holds an ordered list of [`ExtractionStrategy`]
//! values. Each strategy either yields non-empty text or declines; the first
//! one that yields wins. The winning text is whitespace-normalised and capped
//! at [`MAX_EXCERPT_WORDS`] tokens.
//!
//! A matched node with no text is treated exactly like a missing node, so
//! the chain keeps falling through.

use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};

/// Hard cap on the number of whitespace-delimited tokens in an excerpt.
pub const MAX_EXCERPT_WORDS: usize = 1000;

pub const DEFAULT_HEADLINE_SELECTOR: &str = r#"h1[data-testid="headline"]"#;

/// Which strategy produced an excerpt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceTier {
    Headline,
    HeadlineSummary,
    FullBody,
    None,
}

/// Markup removed from a subtree before its text is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripRule {
    /// `script` and `style`.
    #[default]
    Basic,
    /// `script`, `style`, plus structural containers (`div`, `class`).
    Strict,
}

impl StripRule {
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            StripRule::Basic => &["script", "style"],
            StripRule::Strict => &["script", "style", "div", "class"],
        }
    }
}

/// Bounded plain-text excerpt of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    words: Vec<String>,
    source_tier: SourceTier,
}

impl ExtractedText {
    /// The empty sentinel: no words, tier `None`.
    pub fn empty() -> Self {
        Self {
            words: Vec::new(),
            source_tier: SourceTier::None,
        }
    }

    /// Normalise whitespace in `raw` and keep at most [`MAX_EXCERPT_WORDS`] tokens.
    ///
    /// ```
    /// use polytag_web::{ExtractedText, SourceTier};
    ///
    /// let text = ExtractedText::from_raw("  Senator\n\t Smith   speaks ", SourceTier::Headline);
    /// assert_eq!(text.text(), "Senator Smith speaks");
    /// assert_eq!(text.words().len(), 3);
    /// ```
    pub fn from_raw(raw: &str, source_tier: SourceTier) -> Self {
        let words: Vec<String> = raw
            .split_whitespace()
            .take(MAX_EXCERPT_WORDS)
            .map(str::to_string)
            .collect();
        if words.is_empty() {
            return Self::empty();
        }
        Self { words, source_tier }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn source_tier(&self) -> SourceTier {
        self.source_tier
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words rejoined with single spaces.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// One way of pulling text out of a parsed document.
pub trait ExtractionStrategy: Send + Sync {
    fn tier(&self) -> SourceTier;

    /// Non-empty raw text, or `None` to let the next strategy try.
    fn attempt(&self, document: &Html) -> Option<String>;
}

/// Text of every node matching the headline marker.
pub struct HeadlineStrategy {
    headline: Selector,
    strip: StripRule,
}

impl HeadlineStrategy {
    pub fn new(headline: Selector, strip: StripRule) -> Self {
        Self { headline, strip }
    }
}

impl ExtractionStrategy for HeadlineStrategy {
    fn tier(&self) -> SourceTier {
        SourceTier::Headline
    }

    fn attempt(&self, document: &Html) -> Option<String> {
        non_blank(select_text(document, &self.headline, self.strip))
    }
}

/// `headline + " " + summary`; either part may be missing.
pub struct HeadlineSummaryStrategy {
    headline: Selector,
    summary: Selector,
    strip: StripRule,
}

impl HeadlineSummaryStrategy {
    pub fn new(headline: Selector, summary: Selector, strip: StripRule) -> Self {
        Self {
            headline,
            summary,
            strip,
        }
    }
}

impl ExtractionStrategy for HeadlineSummaryStrategy {
    fn tier(&self) -> SourceTier {
        SourceTier::HeadlineSummary
    }

    fn attempt(&self, document: &Html) -> Option<String> {
        let headline = select_text(document, &self.headline, self.strip);
        let summary = select_text(document, &self.summary, self.strip);
        non_blank(format!("{headline} {summary}"))
    }
}

/// Whole `<body>`, last resort.
pub struct BodyStrategy {
    body: Selector,
    strip: StripRule,
}

impl BodyStrategy {
    pub fn new(strip: StripRule) -> Self {
        Self {
            body: Selector::parse("body").expect("static selector"),
            strip,
        }
    }
}

impl ExtractionStrategy for BodyStrategy {
    fn tier(&self) -> SourceTier {
        SourceTier::FullBody
    }

    fn attempt(&self, document: &Html) -> Option<String> {
        non_blank(select_text(document, &self.body, self.strip))
    }
}

/// Selector and stripping knobs used to assemble the default chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractionSettings {
    #[serde(default = "default_headline_selector")]
    pub headline_selector: String,
    /// When set, the headline tier also reads this node and appends it.
    #[serde(default)]
    pub summary_selector: Option<String>,
    #[serde(default)]
    pub strip: StripRule,
}

fn default_headline_selector() -> String {
    DEFAULT_HEADLINE_SELECTOR.to_string()
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            headline_selector: default_headline_selector(),
            summary_selector: None,
            strip: StripRule::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid selector `{selector}`: {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub reason: String,
}

/// Ordered chain of extraction strategies.
pub struct TextExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl TextExtractor {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Headline (or headline + summary) tier followed by the body fallback.
    pub fn from_settings(settings: &ExtractionSettings) -> Result<Self, SelectorError> {
        let headline = parse_selector(&settings.headline_selector)?;
        let first: Box<dyn ExtractionStrategy> = match &settings.summary_selector {
            Some(summary) => Box::new(HeadlineSummaryStrategy::new(
                headline,
                parse_selector(summary)?,
                settings.strip,
            )),
            None => Box::new(HeadlineStrategy::new(headline, settings.strip)),
        };
        Ok(Self::new(vec![first, Box::new(BodyStrategy::new(settings.strip))]))
    }

    /// Run the chain over an already parsed document.
    pub fn extract(&self, document: &Html) -> ExtractedText {
        for strategy in &self.strategies {
            if let Some(raw) = strategy.attempt(document) {
                let text = ExtractedText::from_raw(&raw, strategy.tier());
                tracing::debug!(
                    tier = ?text.source_tier(),
                    words = text.words().len(),
                    "extract.tier.hit"
                );
                return text;
            }
            tracing::trace!(tier = ?strategy.tier(), "extract.tier.miss");
        }
        ExtractedText::empty()
    }

    /// Parse `html` and run the chain. The parsed tree never leaves this call.
    pub fn extract_html(&self, html: &str) -> ExtractedText {
        let document = Html::parse_document(html);
        self.extract(&document)
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        let headline = Selector::parse(DEFAULT_HEADLINE_SELECTOR).expect("static selector");
        Self::new(vec![
            Box::new(HeadlineStrategy::new(headline, StripRule::Basic)),
            Box::new(BodyStrategy::new(StripRule::Basic)),
        ])
    }
}

fn parse_selector(raw: &str) -> Result<Selector, SelectorError> {
    Selector::parse(raw).map_err(|e| SelectorError {
        selector: raw.to_string(),
        reason: e.to_string(),
    })
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Concatenated text of all nodes matching `selector`, skipping stripped tags.
fn select_text(document: &Html, selector: &Selector, strip: StripRule) -> String {
    let mut out = String::new();
    for element in document.select(selector) {
        if !out.is_empty() {
            out.push(' ');
        }
        collect_text(element, strip.tags(), &mut out);
    }
    out
}

fn collect_text(element: ElementRef<'_>, strip: &[&str], out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if !strip.contains(&el.name()) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, strip, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_settings() -> ExtractionSettings {
        ExtractionSettings {
            summary_selector: Some(r#"p[data-testid="summary"]"#.to_string()),
            ..ExtractionSettings::default()
        }
    }

    #[test]
    fn headline_wins_when_present() {
        let html = r#"<html><body>
            <h1 data-testid="headline">Senator Smith proposes new infrastructure bill</h1>
            <p>Lots of other body text that must not leak in.</p>
        </body></html>"#;
        let got = TextExtractor::default().extract_html(html);
        assert_eq!(got.text(), "Senator Smith proposes new infrastructure bill");
        assert_eq!(got.source_tier(), SourceTier::Headline);
    }

    #[test]
    fn headline_strips_script_and_style() {
        let html = r#"<h1 data-testid="headline">Budget <script>var x = 1;</script>vote<style>.a{}</style> today</h1>"#;
        let got = TextExtractor::default().extract_html(html);
        assert_eq!(got.text(), "Budget vote today");
    }

    #[test]
    fn strict_rule_also_strips_containers() {
        let html = r#"<h1 data-testid="headline">Tax reform <div>advert</div><class>junk</class>passes</h1>"#;
        let settings = ExtractionSettings {
            strip: StripRule::Strict,
            ..ExtractionSettings::default()
        };
        let got = TextExtractor::from_settings(&settings)
            .unwrap()
            .extract_html(html);
        assert_eq!(got.text(), "Tax reform passes");
    }

    #[test]
    fn missing_headline_falls_back_to_body() {
        let html = r#"<html><head><title>ignored</title></head>
            <body><h1>Plain heading</h1><script>track()</script><p>Body words here</p></body></html>"#;
        let got = TextExtractor::default().extract_html(html);
        assert_eq!(got.source_tier(), SourceTier::FullBody);
        assert_eq!(got.text(), "Plain headingBody words here");
        assert!(!got.text().contains("track"));
        assert!(!got.text().contains("ignored"));
    }

    #[test]
    fn empty_headline_node_is_treated_as_missing() {
        let html = r#"<body><h1 data-testid="headline">   <script>x()</script> </h1><p>Fallback text</p></body>"#;
        let got = TextExtractor::default().extract_html(html);
        assert_eq!(got.source_tier(), SourceTier::FullBody);
        assert_eq!(got.text(), "Fallback text");
    }

    #[test]
    fn headline_and_summary_are_joined() {
        let html = r#"<body>
            <h1 data-testid="headline">Clinic funding cut</h1>
            <p data-testid="summary">Governor Lee signs the order.</p>
        </body>"#;
        let got = TextExtractor::from_settings(&summary_settings())
            .unwrap()
            .extract_html(html);
        assert_eq!(got.source_tier(), SourceTier::HeadlineSummary);
        assert_eq!(got.text(), "Clinic funding cut Governor Lee signs the order.");
    }

    #[test]
    fn summary_alone_still_counts() {
        let html = r#"<body><p data-testid="summary">Only a summary</p><p>body</p></body>"#;
        let got = TextExtractor::from_settings(&summary_settings())
            .unwrap()
            .extract_html(html);
        assert_eq!(got.source_tier(), SourceTier::HeadlineSummary);
        assert_eq!(got.text(), "Only a summary");
    }

    #[test]
    fn empty_document_yields_sentinel() {
        let got = TextExtractor::default().extract_html("");
        assert!(got.is_empty());
        assert_eq!(got.source_tier(), SourceTier::None);
        assert_eq!(got.text(), "");
    }

    #[test]
    fn excerpt_is_capped_at_limit() {
        let words: Vec<String> = (0..2500).map(|i| format!("w{i}")).collect();
        let html = format!(
            r#"<h1 data-testid="headline">{}</h1>"#,
            words.join(" \n ")
        );
        let got = TextExtractor::default().extract_html(&html);
        assert_eq!(got.words().len(), MAX_EXCERPT_WORDS);
        assert_eq!(got.words()[0], "w0");
        assert_eq!(got.words()[MAX_EXCERPT_WORDS - 1], "w999");
        assert!(!got.text().contains("  "));
    }

    #[test]
    fn body_fallback_is_capped_too() {
        let body = "word ".repeat(1500);
        let got = TextExtractor::default().extract_html(&format!("<body><p>{body}</p></body>"));
        assert_eq!(got.source_tier(), SourceTier::FullBody);
        assert_eq!(got.words().len(), MAX_EXCERPT_WORDS);
    }

    #[test]
    fn invalid_selector_is_reported() {
        let settings = ExtractionSettings {
            headline_selector: "h1[".to_string(),
            ..ExtractionSettings::default()
        };
        let err = TextExtractor::from_settings(&settings).err().unwrap();
        assert_eq!(err.selector, "h1[");
    }

    #[test]
    fn custom_chain_order_is_respected() {
        struct Fixed(&'static str, SourceTier);
        impl ExtractionStrategy for Fixed {
            fn tier(&self) -> SourceTier {
                self.1
            }
            fn attempt(&self, _document: &Html) -> Option<String> {
                Some(self.0.to_string()).filter(|s| !s.is_empty())
            }
        }

        let extractor = TextExtractor::new(vec![
            Box::new(Fixed("", SourceTier::Headline)),
            Box::new(Fixed("second", SourceTier::FullBody)),
            Box::new(Fixed("third", SourceTier::FullBody)),
        ]);
        let got = extractor.extract_html("<p>x</p>");
        assert_eq!(got.text(), "second");
    }
}
