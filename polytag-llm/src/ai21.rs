use crate::traits::{GenerationParams, LlmClient, LlmError, LlmResponse};
use async_trait::async_trait;
use polytag_http::{HttpClient, HttpError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const AI21_API_BASE: &str = "https://api.ai21.com/studio/v1/";

/// Client for AI21 Jurassic-2 completion models (`POST {base}/{model}/complete`).
pub struct Ai21Client {
    client: HttpClient,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest<'a> {
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stop_sequences: &'a [String],
    pub count_penalty: Penalty,
    pub presence_penalty: Penalty,
    pub frequency_penalty: Penalty,
}

#[derive(Debug, Serialize)]
pub struct Penalty {
    pub scale: f32,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(prompt: &'a str, params: &'a GenerationParams) -> Self {
        Self {
            prompt,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            stop_sequences: &params.stop_sequences,
            count_penalty: Penalty {
                scale: params.count_penalty,
            },
            presence_penalty: Penalty {
                scale: params.presence_penalty,
            },
            frequency_penalty: Penalty {
                scale: params.frequency_penalty,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub completions: Vec<Completion>,
}

/// One element in the `completions` array
#[derive(Debug, Deserialize)]
pub struct Completion {
    pub data: CompletionData,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<FinishReason>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionData {
    pub text: String,
    #[serde(default)]
    pub tokens: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct FinishReason {
    pub reason: String,
}

impl Ai21Client {
    /// Create a client against the public AI21 endpoint.
    pub fn new(api_key: String, model: String) -> Result<Self, LlmError> {
        Self::with_endpoint(api_key, model, AI21_API_BASE, None)
    }

    /// Create a client against a custom endpoint (gateway, mock server).
    pub fn with_endpoint(
        api_key: String,
        model: String,
        endpoint: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        if model.trim().is_empty() {
            return Err(LlmError::Config("model must not be empty".to_string()));
        }
        // Url::join drops the last segment unless the base ends with '/'.
        let base = format!("{}/", endpoint.trim_end_matches('/'));
        let mut client = HttpClient::new(&base)
            .map_err(|e| LlmError::Config(format!("HttpClient init failed: {e}")))?;
        if let Some(timeout) = timeout {
            client = client.with_timeout(timeout);
        }

        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl LlmClient for Ai21Client {
    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<LlmResponse, LlmError> {
        let req = CompletionRequest::new(prompt, params);
        let path = format!("{}/complete", self.model);

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            max_tokens = params.max_tokens,
            "llm.ai21.complete"
        );

        let resp: CompletionResponse = self
            .client
            .post_json(&path, Some(&self.api_key), &req)
            .await
            .map_err(http_to_llm)?;

        let first = resp.completions.into_iter().next().ok_or_else(|| {
            LlmError::MalformedResponse("response carried no completions".to_string())
        })?;

        Ok(LlmResponse {
            tokens_used: Some(first.data.tokens.len() as u32),
            text: first.data.text,
            model: Some(self.model.clone()),
            finish_reason: first.finish_reason.map(|f| f.reason),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn http_to_llm(e: HttpError) -> LlmError {
    match e {
        HttpError::Decode(msg, snippet) => {
            LlmError::MalformedResponse(format!("{msg}, body_snippet: {snippet}"))
        }
        HttpError::Api { .. } => LlmError::Api(e.to_string()),
        other => LlmError::Http(other),
    }
}
