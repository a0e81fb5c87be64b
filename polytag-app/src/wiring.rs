use polytag_common::{PolytagError, Result};
use polytag_config::{InferenceConfig, PolytagConfig};
use polytag_llm::traits::LlmError;
use polytag_llm::{SharedLlm, build_ai21_client};
use polytag_pipeline::Pipeline;
use polytag_web::{HttpPageFetcher, TextExtractor};
use std::sync::Arc;
use std::time::Duration;

fn build_llm(cfg: &InferenceConfig) -> Result<SharedLlm> {
    match cfg {
        InferenceConfig::Ai21 {
            model,
            auth_token,
            endpoint,
            timeout_secs,
        } => build_ai21_client(auth_token, model, endpoint, timeout_secs.map(Duration::from_secs))
            .map_err(|e| match e {
                LlmError::Config(msg) => PolytagError::Config(msg),
                other => PolytagError::Http(other.to_string()),
            }),
    }
}

/// Assemble the long-lived pipeline once; every request reuses it.
pub fn build_pipeline(cfg: &PolytagConfig) -> Result<Pipeline> {
    let fetcher = HttpPageFetcher::new(&cfg.fetch.settings())
        .map_err(|e| PolytagError::Http(e.to_string()))?;
    let extractor = TextExtractor::from_settings(&cfg.extraction_settings())
        .map_err(|e| PolytagError::Pipeline(e.to_string()))?;
    let llm = build_llm(&cfg.inference)?;

    tracing::info!(
        template = %cfg.template,
        model = llm.model_name(),
        empty_extraction = ?cfg.empty_extraction,
        strict_labels = cfg.strict_labels,
        "pipeline.ready"
    );

    Ok(Pipeline::new(Arc::new(fetcher), extractor, llm, cfg.template)
        .with_empty_extraction(cfg.empty_extraction)
        .with_strict_labels(cfg.strict_labels))
}
