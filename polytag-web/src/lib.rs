//! Page acquisition and text extraction.
//!
//! - [`fetch`]: `PageFetcher` trait and an HTTP-backed implementation
//! - [`extract`]: ordered, first-non-empty-wins extraction strategies that
//!   reduce an HTML document to a bounded excerpt

pub mod extract;
pub mod fetch;

pub use extract::{
    ExtractedText, ExtractionSettings, ExtractionStrategy, MAX_EXCERPT_WORDS, SourceTier,
    StripRule, TextExtractor,
};
pub use fetch::{FetchError, FetchSettings, FetchedPage, HttpPageFetcher, PageFetcher};
