//! Configuration for talking to the finance tracker API.

use reqwest::Url;

use crate::Error;

/// The user agent sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("budgeteur-client/", env!("CARGO_PKG_VERSION"));

/// Where the API lives and how the client identifies itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// The URL that resource paths such as `/account` are appended to,
    /// e.g. "http://localhost:8000".
    pub base_url: String,

    /// The `User-Agent` header value.
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a config for the API at `base_url` with the default user agent.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// The parsed base URL.
    ///
    /// # Errors
    /// Returns [Error::InvalidBaseUrl] if the URL does not parse or is not
    /// an http(s) URL.
    pub fn base_url(&self) -> Result<Url, Error> {
        let url = Url::parse(&self.base_url)
            .inspect_err(|error| tracing::error!("could not parse {}: {error}", self.base_url))
            .map_err(|_| Error::InvalidBaseUrl(self.base_url.clone()))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(Error::InvalidBaseUrl(self.base_url.clone())),
        }
    }
}
