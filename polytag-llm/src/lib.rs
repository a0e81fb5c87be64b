//! Provider-agnostic LLM integration for Polytag.
//!
//! This crate exposes a common [`traits::LlmClient`] interface, the
//! [`traits::GenerationParams`] sampling knobs, and a concrete client for
//! AI21 Jurassic-2 completion models.
//!
//! # Examples
//! ```no_run
//! use polytag_llm::ai21::Ai21Client;
//! use polytag_llm::traits::{GenerationParams, LlmClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), polytag_llm::traits::LlmError> {
//! let client = Ai21Client::new("api-key".into(), "j2-ultra".into())?;
//! let resp = client.complete("Say OK", &GenerationParams::default()).await?;
//! println!("{}", resp.text);
//! # Ok(())
//! # }
//! ```
pub mod ai21;
pub mod traits;

use ai21::Ai21Client;
use std::sync::Arc;
use std::time::Duration;
use traits::{LlmClient, LlmError};

/// Default model for classification prompts
pub const DEFAULT_AI21_MODEL: &str = "j2-ultra";

/// Shared, thread-safe handle to an inference client.
pub type SharedLlm = Arc<dyn LlmClient + Send + Sync + 'static>;

/// Build the long-lived inference handle for the process.
pub fn build_ai21_client(
    api_key: &str,
    model: &str,
    endpoint: &str,
    timeout: Option<Duration>,
) -> Result<SharedLlm, LlmError> {
    if api_key.trim().is_empty() {
        return Err(LlmError::Config("AI21 api key is empty".to_string()));
    }
    let client =
        Ai21Client::with_endpoint(api_key.to_string(), model.to_string(), endpoint, timeout)?;
    Ok(Arc::new(client))
}
