use async_trait::async_trait;
use polytag_http::{HttpClient, HttpError};
use std::time::Duration;
use url::Url;

/// Browser-like UA; several news sites serve an empty shell to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid page url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Http(#[from] HttpError),
}

/// Raw HTML of one page plus what we learned fetching it.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects.
    pub url: Url,
    pub status: u16,
    pub html: String,
    /// blake3 hex digest of `html`, for correlating log lines.
    pub digest: String,
}

impl FetchedPage {
    pub fn new(url: Url, status: u16, html: String) -> Self {
        let digest = blake3::hash(html.as_bytes()).to_hex().to_string();
        Self {
            url,
            status,
            html,
            digest,
        }
    }
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Parse a caller-supplied page URL; only http(s) is fetchable.
pub fn parse_page_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Plain GET over [`HttpClient`]; no JavaScript rendering.
#[derive(Clone)]
pub struct HttpPageFetcher {
    client: HttpClient,
}

impl HttpPageFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let client = HttpClient::detached()?
            .with_user_agent(&settings.user_agent)?
            .with_timeout(settings.timeout);
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let resp = self.client.get_text(url.as_str()).await?;
        let page = FetchedPage::new(resp.url, resp.status.as_u16(), resp.body);
        tracing::debug!(
            url = %page.url,
            status = page.status,
            bytes = page.html.len(),
            digest = %page.digest,
            "fetch.page.done"
        );
        Ok(page)
    }
}
