//! The classification pipeline: fetch → extract → prompt → infer → normalize.
//!
//! - [`template`]: the two instruction templates and their sampling presets
//! - [`taxonomy`]: the closed set of policy-domain labels
//! - [`prompt`]: renders an excerpt into a [`prompt::PromptText`]
//! - [`normalize`]: reduces a raw completion to a [`normalize::ClassificationResult`]
//! - [`pipeline`]: the per-request orchestrator
//!
//! Every failure inside [`pipeline::Pipeline::classify`] degrades to the empty
//! result for the active template; [`pipeline::Pipeline::try_classify`] keeps
//! the tagged [`error::PipelineError`] for callers that want to tell them apart.

pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod taxonomy;
pub mod template;

pub use error::PipelineError;
pub use normalize::{ClassificationResult, TopicPair};
pub use pipeline::{EmptyExtractionPolicy, PageRequest, Pipeline};
pub use prompt::{PromptText, build_prompt};
pub use taxonomy::Taxonomy;
pub use template::Template;
