use reqwest::{Client, redirect};
use std::future::Future;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Errors while retrieving catalog pages. Every variant is fatal to the run.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Error while sending a request to {url}. code: {status} reason: {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response from {url} is not valid UTF-8: {source}")]
    Decode {
        url: String,
        #[source]
        source: FromUtf8Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Catalog worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl FetchError {
    /// HTTP status of a rejected response, if that is what failed
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Something that can hand out catalog pages by host and path.
///
/// [`CatalogFetcher`] is the network implementation; the scanner only
/// depends on this trait.
pub trait PageSource: Send + Sync + 'static {
    fn fetch(
        &self,
        host: &str,
        path: &str,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Retrieves catalog pages with a single GET each. No retries, no timeouts,
/// and redirects are returned as failures rather than followed.
#[derive(Debug, Clone)]
pub struct CatalogFetcher {
    client: Client,
    scheme: String,
}

impl CatalogFetcher {
    /// Fetcher for HTTPS catalogs
    pub fn new() -> Result<Self, FetchError> {
        Self::with_scheme("https")
    }

    /// Fetcher using `scheme` for every request
    pub fn with_scheme(scheme: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            scheme: scheme.to_string(),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Fetch a page body. The `GET` / `GET DONE` pair is reported even when
    /// the request fails.
    pub async fn get(&self, host: &str, path: &str) -> Result<String, FetchError> {
        tracing::info!("GET {} {}", host, path);
        let result = self.get_body(host, path).await;
        tracing::info!("GET DONE {} {}", host, path);
        result
    }

    async fn get_body(&self, host: &str, path: &str) -> Result<String, FetchError> {
        let url = format!("{}://{}{}", self.scheme, host, path);
        let transport = |source| FetchError::Transport {
            url: url.clone(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("GET {} returned {}", url, status);
            return Err(FetchError::Status {
                url: url.clone(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        String::from_utf8(body.to_vec()).map_err(|source| FetchError::Decode { url, source })
    }
}

impl PageSource for CatalogFetcher {
    async fn fetch(&self, host: &str, path: &str) -> Result<String, FetchError> {
        self.get(host, path).await
    }
}
