use polytag_llm::traits::LlmError;
use polytag_web::FetchError;

/// Why a request produced no usable result.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("no usable text extracted from page")]
    EmptyExtraction,

    #[error("inference failed: {0}")]
    Inference(LlmError),

    #[error("malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("inference returned an empty completion")]
    EmptyCompletion,

    #[error("label `{0}` is not in the taxonomy")]
    UnknownLabel(String),
}

impl PipelineError {
    /// Stable short name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Fetch(_) => "fetch",
            PipelineError::EmptyExtraction => "empty_extraction",
            PipelineError::Inference(_) => "inference",
            PipelineError::MalformedResponse(_) => "malformed_response",
            PipelineError::EmptyCompletion => "empty_completion",
            PipelineError::UnknownLabel(_) => "unknown_label",
        }
    }
}

impl From<LlmError> for PipelineError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MalformedResponse(msg) => PipelineError::MalformedResponse(msg),
            other => PipelineError::Inference(other),
        }
    }
}
