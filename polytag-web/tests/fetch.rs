use polytag_web::fetch::parse_page_url;
use polytag_web::{FetchError, FetchSettings, HttpPageFetcher, PageFetcher, SourceTier, TextExtractor};
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<!doctype html>
<html>
  <head><title>Site</title><script>window.ads = [];</script></head>
  <body>
    <nav>Home | World | Politics</nav>
    <h1 data-testid="headline">Mayor Ortiz unveils transit plan</h1>
    <article><p>The plan covers buses.</p></article>
  </body>
</html>"#;

#[tokio::test]
async fn fetches_and_extracts_headline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news/transit"))
        .and(header_exists("user-agent"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(ARTICLE),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(&FetchSettings::default()).unwrap();
    let url = parse_page_url(&format!("{}/news/transit", server.uri())).unwrap();
    let page = fetcher.fetch(&url).await.unwrap();

    assert_eq!(page.status, 200);
    assert_eq!(page.digest, blake3::hash(ARTICLE.as_bytes()).to_hex().to_string());

    let text = TextExtractor::default().extract_html(&page.html);
    assert_eq!(text.source_tier(), SourceTier::Headline);
    assert_eq!(text.text(), "Mayor Ortiz unveils transit plan");
}

#[tokio::test]
async fn server_error_surfaces_as_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(&FetchSettings::default()).unwrap();
    let url = parse_page_url(&format!("{}/down", server.uri())).unwrap();
    let err = fetcher.fetch(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Http(_)));
}
