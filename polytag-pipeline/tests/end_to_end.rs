mod common;

use polytag_llm::build_ai21_client;
use polytag_pipeline::{ClassificationResult, PageRequest, Pipeline, Template};
use polytag_web::{FetchSettings, HttpPageFetcher, TextExtractor};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<html><body>
  <h1 data-testid="headline">Governor Ruiz expands rural clinics</h1>
  <p data-testid="summary">The plan adds 40 sites.</p>
  <footer>© News Co</footer>
</body></html>"#;

async fn stack(server: &MockServer, template: Template) -> Pipeline {
    let fetcher = HttpPageFetcher::new(&FetchSettings::default()).unwrap();
    let llm = build_ai21_client(
        "test-key",
        "j2-ultra",
        &format!("{}/studio/v1", server.uri()),
        None,
    )
    .unwrap();
    let extractor = TextExtractor::from_settings(&template.default_extraction()).unwrap();
    Pipeline::new(Arc::new(fetcher), extractor, llm, template)
}

#[tokio::test]
async fn taxonomy_over_real_http() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/studio/v1/j2-ultra/complete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "completions": [ { "data": { "text": "\nHealthcare" } } ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let p = stack(&server, Template::Taxonomy).await;
    let got = p
        .classify(&PageRequest::new(format!("{}/article", server.uri())))
        .await;
    assert_eq!(got, ClassificationResult::Label("Healthcare".to_string()));

    let requests = server.received_requests().await.unwrap();
    let completion = requests
        .iter()
        .find(|r| r.url.path().ends_with("/complete"))
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&completion.body).unwrap();
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.starts_with(
        "\"Governor Ruiz expands rural clinics The plan adds 40 sites.\"\n"
    ));
    assert!(!prompt.contains("News Co"));
    assert_eq!(body["maxTokens"], 20);
}

#[tokio::test]
async fn inference_outage_returns_empty_pairs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let p = stack(&server, Template::Pairs).await;
    let got = p
        .classify(&PageRequest::new(format!("{}/article", server.uri())))
        .await;
    assert_eq!(got, ClassificationResult::Pairs(vec![]));
}

#[tokio::test]
async fn page_not_found_skips_inference() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let p = stack(&server, Template::Taxonomy).await;
    let got = p
        .classify(&PageRequest::new(format!("{}/missing", server.uri())))
        .await;
    assert_eq!(got, ClassificationResult::Label(String::new()));
}
