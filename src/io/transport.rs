use std::io::Read;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_LENGTH, RANGE};
use reqwest::redirect::Policy;

use super::range::ByteRange;
use crate::error::Result;

/// Metadata learned from a probe request.
#[derive(Debug, Clone)]
pub struct Probe {
    /// Final URL after redirects.
    pub url: String,
    pub status: StatusCode,
    /// `Content-Length` as reported by the server, if any.
    pub content_length: Option<u64>,
}

/// Response to a range request. Dropping it releases the connection.
pub struct RangeResponse {
    pub status: StatusCode,
    pub body: Box<dyn Read + Send>,
}

/// HTTP capability shared by one or more [`RemoteFile`](super::RemoteFile)s.
pub trait Transport: Send + Sync {
    /// Issue a metadata-only request (HEAD) against `url`.
    fn probe(&self, url: &str) -> Result<Probe>;

    /// Issue a GET carrying `Range: <range>` against `url`.
    fn get_range(&self, url: &str, range: &ByteRange) -> Result<RangeResponse>;

    /// Hint that pooled idle connections may be dropped.
    fn close_idle_connections(&self);
}

/// Settings for the default [`HttpClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout, body reads included. `None` disables it.
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub user_agent: String,
    pub max_redirects: usize,
    pub pool_max_idle_per_host: usize,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: 10,
            pool_max_idle_per_host: usize::MAX,
            use_system_proxy: true,
        }
    }
}

impl ClientConfig {
    fn build(&self) -> reqwest::Result<Client> {
        let mut builder = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .redirect(Policy::limited(self.max_redirects))
            .pool_max_idle_per_host(self.pool_max_idle_per_host);
        if !self.use_system_proxy {
            builder = builder.no_proxy();
        }
        builder.build()
    }
}

/// [`Transport`] backed by a blocking `reqwest` client.
///
/// Must not be created or used from inside an async runtime.
pub struct HttpClient {
    config: ClientConfig,
    inner: RwLock<Client>,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = config.build()?;
        Ok(Self {
            config,
            inner: RwLock::new(client),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn current(&self) -> Client {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Transport for HttpClient {
    fn probe(&self, url: &str) -> Result<Probe> {
        let resp = self.current().head(url).send()?;

        // Parse the header directly: the body size hint of a HEAD
        // response is always zero.
        let content_length = resp
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok());

        Ok(Probe {
            url: resp.url().to_string(),
            status: resp.status(),
            content_length,
        })
    }

    fn get_range(&self, url: &str, range: &ByteRange) -> Result<RangeResponse> {
        let resp = self
            .current()
            .get(url)
            .header(RANGE, range.to_string())
            .send()?;

        Ok(RangeResponse {
            status: resp.status(),
            body: Box::new(resp),
        })
    }

    fn close_idle_connections(&self) {
        // reqwest has no explicit pool flush; replacing the client drops
        // the old pool once requests holding a clone of it complete.
        match self.config.build() {
            Ok(fresh) => {
                let old = {
                    let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
                    std::mem::replace(&mut *guard, fresh)
                };
                // Dropping the last handle joins the client's worker thread.
                drop(old);
                tracing::debug!("released idle connections");
            }
            Err(e) => tracing::warn!("failed to rebuild HTTP client: {e}"),
        }
    }
}
