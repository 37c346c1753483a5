use reqwest::{Client, Response};
use std::time::Duration;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Maximum number of redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// Classification of a transport-level failure.
///
/// HTTP status codes are not part of this taxonomy; callers inspect the
/// status on a successful response themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectFailure {
    /// Timed out while establishing the connection
    ConnectTimeout,
    /// Connected but the server failed to send data in time
    ReadTimeout,
    /// Redirect limit exceeded
    TooManyRedirects,
    /// The URL could not be parsed into a request
    InvalidUrl,
    /// TLS negotiation or certificate failure
    Tls,
    /// Failure while talking to a proxy
    Proxy,
    /// Generic connection failure (refused, reset, DNS)
    Connection,
    /// Anything the other variants do not cover
    Unclassified,
}

impl ConnectFailure {
    /// Classify a reqwest error into one of the failure categories
    pub fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            return if error.is_connect() {
                ConnectFailure::ConnectTimeout
            } else {
                ConnectFailure::ReadTimeout
            };
        }
        if error.is_redirect() {
            return ConnectFailure::TooManyRedirects;
        }
        if error.is_builder() {
            return ConnectFailure::InvalidUrl;
        }

        // reqwest does not expose TLS/proxy failures as flags, so match on
        // the error chain text like the status-line checks elsewhere
        let chain = error_chain_text(error);
        if chain.contains("certificate") || chain.contains("tls") || chain.contains("ssl") {
            ConnectFailure::Tls
        } else if chain.contains("proxy") {
            ConnectFailure::Proxy
        } else if error.is_connect() {
            ConnectFailure::Connection
        } else {
            ConnectFailure::Unclassified
        }
    }

    /// Human-readable diagnostic for a failed request to `url`
    pub fn describe(&self, url: &str, timeout: Duration) -> String {
        match self {
            ConnectFailure::ConnectTimeout => {
                format!(
                    "request to {} timed out after {} second(s)",
                    url,
                    timeout.as_secs()
                )
            }
            ConnectFailure::ReadTimeout => {
                format!(
                    "{} failed to send data within {} second(s)",
                    url,
                    timeout.as_secs()
                )
            }
            ConnectFailure::TooManyRedirects => format!("{} has too many redirects", url),
            ConnectFailure::InvalidUrl => format!("{} is not a valid URL", url),
            ConnectFailure::Tls => format!("TLS error while connecting to {}", url),
            ConnectFailure::Proxy => format!("proxy error while connecting to {}", url),
            ConnectFailure::Connection => format!("connection error while connecting to {}", url),
            ConnectFailure::Unclassified => format!("unable to handle request to {}", url),
        }
    }
}

/// Flattens an error and its sources into one lowercase string
fn error_chain_text(error: &reqwest::Error) -> String {
    let mut text = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(inner) = source {
        text.push(' ');
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text.to_lowercase()
}

/// Issues HTTP GET requests with a fixed timeout and redirect following.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Connector {
    client: Client,
    timeout: Duration,
}

impl Connector {
    /// Create a connector with the given per-request timeout
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .unwrap_or_default();

        Self { client, timeout }
    }

    /// Per-request timeout this connector was built with
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Connect to a URL.
    ///
    /// Returns the response on transport-level success without checking the
    /// HTTP status. On any transport failure the classification is logged
    /// and `None` is returned; no error escapes this boundary.
    pub async fn get(&self, url: &str) -> Option<Response> {
        match self.client.get(url).send().await {
            Ok(response) => Some(response),
            Err(error) => {
                let failure = ConnectFailure::classify(&error);
                ::log::warn!("{}", failure.describe(url, self.timeout));
                None
            }
        }
    }
}

impl Default for Connector {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}
