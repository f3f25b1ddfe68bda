//! Content fetchers: live HTTP with session bootstrap, and saved-page files
//! for offline runs.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use ratescan_core::{ContentFetcher, FetchConfig, FetchError, ProductConfig, RawContent, SourceKind};

/// Fetches product pages over HTTP.
///
/// Some origins hand out session cookies on the landing page and answer 401
/// to cold requests, so the client keeps a cookie store, primes the session
/// on the configured bootstrap URL once, and retries a 401 with a Referer.
pub struct HttpFetcher {
    client: Client,
    bootstrap_url: Option<String>,
    bootstrapped: OnceCell<()>,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("ru-RU,ru;q=0.8,en-US;q=0.5,en;q=0.3"),
        );
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            header::HeaderValue::from_static("1"),
        );

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            bootstrap_url: config.bootstrap_url.clone(),
            bootstrapped: OnceCell::new(),
        })
    }

    /// Prime the session once so product requests carry the origin's
    /// cookies/tokens.
    async fn ensure_session(&self) -> Result<(), FetchError> {
        let Some(url) = &self.bootstrap_url else {
            return Ok(());
        };

        self.bootstrapped
            .get_or_try_init(|| async {
                debug!(url, "priming session");
                self.client
                    .get(url)
                    .send()
                    .await
                    .and_then(|resp| resp.error_for_status())
                    .map_err(|e| FetchError::Http(e.to_string()))?;
                Ok(())
            })
            .await
            .map(|_| ())
    }
}

impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, product: &ProductConfig) -> Result<RawContent, FetchError> {
        self.ensure_session().await?;

        let mut response = self
            .client
            .get(&product.url)
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            // The origin wants a same-site referer once the session exists.
            let referer = self.bootstrap_url.as_deref().unwrap_or(&product.url);
            warn!(url = %product.url, "401, retrying with referer");
            response = self
                .client
                .get(&product.url)
                .header(header::REFERER, referer)
                .send()
                .await
                .map_err(|e| FetchError::Http(e.to_string()))?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: product.url.clone(),
                status: status.as_u16(),
            });
        }

        let content = if product.kind == SourceKind::PdfText {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| FetchError::Http(e.to_string()))?;
            pdf_extract::extract_text_from_mem(&bytes)
                .map_err(|e| FetchError::Decode(e.to_string()))?
        } else {
            response
                .text()
                .await
                .map_err(|e| FetchError::Decode(e.to_string()))?
        };

        if content.trim().is_empty() {
            return Err(FetchError::EmptyBody(product.url.clone()));
        }

        Ok(RawContent::new(product.kind, content))
    }
}

/// Reads saved pages from a directory, `<dir>/<id>.<ext>`.
///
/// The extension decides the source kind, falling back to the product's
/// configured kind for `.txt` snapshots of PDF text.
pub struct FileFetcher {
    dir: PathBuf,
}

impl FileFetcher {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl ContentFetcher for FileFetcher {
    async fn fetch(&self, product: &ProductConfig) -> Result<RawContent, FetchError> {
        for ext in ["json", "html", "htm", "txt"] {
            let path = self.dir.join(format!("{}.{}", product.id, ext));
            if !path.exists() {
                continue;
            }

            debug!(path = %path.display(), "reading saved page");
            let content = fs::read_to_string(&path)?;
            let kind = match SourceKind::from_extension(ext) {
                Some(SourceKind::FreeText) => product.kind,
                Some(kind) => kind,
                None => product.kind,
            };
            return Ok(RawContent::new(kind, content));
        }

        Err(FetchError::Missing(product.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, kind: SourceKind) -> ProductConfig {
        ProductConfig::new(id, format!("https://bank.example/{id}"), kind)
    }

    #[tokio::test]
    async fn test_file_fetcher_reads_saved_page() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("prime_plus.html"), "<table></table>").unwrap();

        let fetcher = FileFetcher::new(dir.path().to_path_buf());
        let raw = fetcher
            .fetch(&product("prime_plus", SourceKind::TableHtml))
            .await
            .unwrap();

        assert_eq!(raw.kind, SourceKind::TableHtml);
        assert_eq!(raw.content, "<table></table>");
    }

    #[tokio::test]
    async fn test_file_fetcher_keeps_product_kind_for_txt() {
        // A .txt snapshot of PDF text must still run the PDF chain.
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("car_pledge.txt"), "Автокредит от 7,5%").unwrap();

        let fetcher = FileFetcher::new(dir.path().to_path_buf());
        let raw = fetcher
            .fetch(&product("car_pledge", SourceKind::PdfText))
            .await
            .unwrap();

        assert_eq!(raw.kind, SourceKind::PdfText);
    }

    #[tokio::test]
    async fn test_file_fetcher_missing_page() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FileFetcher::new(dir.path().to_path_buf());

        assert!(matches!(
            fetcher.fetch(&product("absent", SourceKind::TableHtml)).await,
            Err(FetchError::Missing(_))
        ));
    }
}
