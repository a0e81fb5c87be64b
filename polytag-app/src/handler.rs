//! Event-envelope transport around [`Pipeline::classify`].
use polytag_pipeline::{PageRequest, Pipeline};
use serde::{Deserialize, Serialize};

/// Response shape expected by the invoking runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl Envelope {
    fn ok(body: String) -> Self {
        Self {
            status_code: 200,
            body,
        }
    }

    fn error(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventBody {
    url: Option<String>,
}

fn parse_request(body: &str) -> Result<PageRequest, String> {
    let event: EventBody =
        serde_json::from_str(body).map_err(|e| format!("invalid event body: {e}"))?;
    match event.url {
        Some(url) if !url.trim().is_empty() => Ok(PageRequest::new(url)),
        _ => Err("missing `url` in event body".to_string()),
    }
}

/// Classify the page named in `body` (`{"url": "..."}`).
///
/// Pipeline failures still answer 200 with the empty result; only a body
/// that cannot name a page is a 400.
pub async fn handle_event(pipeline: &Pipeline, body: &str) -> Envelope {
    let request = match parse_request(body) {
        Ok(r) => r,
        Err(msg) => {
            tracing::warn!(error = %msg, "event.rejected");
            return Envelope::error(400, &msg);
        }
    };

    let result = pipeline.classify(&request).await;
    match serde_json::to_string(&result) {
        Ok(json) => Envelope::ok(json),
        Err(e) => {
            tracing::error!(error = %e, "event.encode_failed");
            Envelope::error(500, "failed to encode result")
        }
    }
}
