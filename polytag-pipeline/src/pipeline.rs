use crate::error::PipelineError;
use crate::normalize::{ClassificationResult, normalize};
use crate::prompt::build_prompt;
use crate::taxonomy::Taxonomy;
use crate::template::Template;
use polytag_llm::SharedLlm;
use polytag_web::fetch::parse_page_url;
use polytag_web::{PageFetcher, TextExtractor};
use serde::Deserialize;
use std::sync::Arc;
use tracing::Instrument;

/// One classification request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    pub url: String,
}

impl PageRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// What to do when no tier produced any text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyExtractionPolicy {
    /// Return the sentinel without calling the inference service.
    #[default]
    Skip,
    /// Prompt with the empty excerpt anyway.
    Proceed,
}

/// Per-request orchestrator. Holds only immutable collaborators, so one
/// instance can serve any number of concurrent requests.
pub struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    extractor: TextExtractor,
    llm: SharedLlm,
    template: Template,
    empty_extraction: EmptyExtractionPolicy,
    strict_labels: bool,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: TextExtractor,
        llm: SharedLlm,
        template: Template,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            llm,
            template,
            empty_extraction: EmptyExtractionPolicy::default(),
            strict_labels: false,
        }
    }

    pub fn with_empty_extraction(mut self, policy: EmptyExtractionPolicy) -> Self {
        self.empty_extraction = policy;
        self
    }

    /// Reject taxonomy labels outside [`Taxonomy`] instead of passing them through.
    pub fn with_strict_labels(mut self, strict: bool) -> Self {
        self.strict_labels = strict;
        self
    }

    pub fn template(&self) -> Template {
        self.template
    }

    /// Run the pipeline; never fails. Any error is logged with its kind and
    /// replaced by the empty result for the active template.
    pub async fn classify(&self, request: &PageRequest) -> ClassificationResult {
        let span = tracing::info_span!(
            "pipeline.classify",
            request_id = %uuid::Uuid::new_v4(),
            url = %request.url,
            template = %self.template,
        );

        async {
            match self.try_classify(request).await {
                Ok(result) => {
                    tracing::info!(result = ?result, "pipeline.done");
                    result
                }
                Err(e) => {
                    tracing::warn!(kind = e.kind(), error = %e, "pipeline.degraded");
                    ClassificationResult::empty(self.template)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run the pipeline, keeping the failure kind.
    pub async fn try_classify(
        &self,
        request: &PageRequest,
    ) -> Result<ClassificationResult, PipelineError> {
        let url = parse_page_url(&request.url)?;
        let page = self.fetcher.fetch(&url).await?;

        let excerpt = self.extractor.extract_html(&page.html);
        tracing::debug!(
            tier = ?excerpt.source_tier(),
            words = excerpt.words().len(),
            digest = %page.digest,
            "pipeline.extract.done"
        );

        if excerpt.is_empty() {
            match self.empty_extraction {
                EmptyExtractionPolicy::Skip => return Err(PipelineError::EmptyExtraction),
                EmptyExtractionPolicy::Proceed => {
                    tracing::warn!("pipeline.extract.empty_proceeding")
                }
            }
        }

        let prompt = build_prompt(self.template, &excerpt);
        let params = self.template.generation_params();
        let response = self.llm.complete(&prompt.body, &params).await?;
        tracing::debug!(
            model = self.llm.model_name(),
            completion = %response.text,
            finish_reason = ?response.finish_reason,
            "pipeline.inference.done"
        );

        if response.text.trim().is_empty() {
            return Err(PipelineError::EmptyCompletion);
        }

        match normalize(self.template, &response.text) {
            ClassificationResult::Label(label) => {
                Ok(ClassificationResult::Label(self.check_label(&label)?))
            }
            pairs => Ok(pairs),
        }
    }

    fn check_label(&self, label: &str) -> Result<String, PipelineError> {
        match Taxonomy::from_label(label) {
            Some(known) if self.strict_labels => Ok(known.label().to_string()),
            Some(_) => Ok(label.to_string()),
            None if self.strict_labels => Err(PipelineError::UnknownLabel(label.to_string())),
            None => {
                tracing::warn!(label, "pipeline.label.outside_taxonomy");
                Ok(label.to_string())
            }
        }
    }
}
