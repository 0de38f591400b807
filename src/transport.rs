//! The request transport that every server interaction goes through.
//!
//! A [Request] is built per call and handed to a [Transport], which performs
//! exactly one HTTP round trip and resolves exactly once. Only transport-level
//! failures are errors: any response the server sends back, whatever its
//! status code, resolves to its parsed JSON body.

use std::fmt::Display;

use async_trait::async_trait;
use reqwest::{Url, multipart};
use serde_json::Value;

use crate::{ClientConfig, Error, logging::redact_fields};

/// The HTTP methods used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read a list or a single resource.
    Get,
    /// Create a resource.
    Put,
    /// Delete a resource.
    Delete,
    /// Perform a user action such as logging in.
    Post,
}

impl Method {
    /// The method name as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Post => "POST",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// An ordered, flat mapping of field names to scalar values.
///
/// Values are stored as the text they are sent as. Inserting a name that is
/// already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(String, String)>);

impl Fields {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name` with `value` and return the mapping, for chaining.
    pub fn with(mut self, name: &str, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    /// Set `name` to `value`.
    pub fn insert(&mut self, name: &str, value: impl Display) {
        let value = value.to_string();

        match self.0.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((name.to_owned(), value)),
        }
    }

    /// The value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over the fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// The number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (key, value) in iter {
            let key: String = key.into();
            let value: String = value.into();
            fields.insert(&key, value);
        }
        fields
    }
}

/// A single request to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// The path of the resource, relative to the API base URL.
    pub url: String,
    /// The HTTP method.
    pub method: Method,
    /// Query parameters for [Method::Get], body fields otherwise.
    pub data: Option<Fields>,
}

impl Request {
    /// Create a request without data.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            data: None,
        }
    }

    /// Attach `data` to the request.
    pub fn with_data(mut self, data: Fields) -> Self {
        self.data = Some(data);
        self
    }

    /// The path and query string the request is sent to.
    ///
    /// For [Method::Get] the data is appended after a `?` as `key=value` pairs
    /// joined by `&`. Keys and values are not percent-encoded. The `?` is always
    /// present, even without data. Other methods send their data in the body,
    /// so their target is the bare URL.
    pub fn target(&self) -> String {
        if self.method != Method::Get {
            return self.url.clone();
        }

        let query = self
            .data
            .iter()
            .flat_map(|data| data.iter())
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{query}", self.url)
    }

    /// The multipart body for mutating requests with data, one text part per
    /// field.
    fn body(&self) -> Option<multipart::Form> {
        if self.method == Method::Get {
            return None;
        }

        self.data.as_ref().map(|data| {
            data.iter().fold(multipart::Form::new(), |form, (key, value)| {
                form.text(key.to_owned(), value.to_owned())
            })
        })
    }
}

/// Performs one HTTP round trip per [Request].
///
/// Implementations must not retry, time out or de-duplicate requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and resolve with the parsed JSON body.
    ///
    /// # Errors
    /// Returns [Error::Transport] only when no response could be obtained.
    /// A body that is not JSON resolves to [Value::Null].
    async fn send(&self, request: Request) -> Result<Value, Error>;
}

/// A [Transport] backed by [reqwest].
///
/// Cookies set by the server are stored and replayed, so a session started by
/// logging in is kept for later requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for the API described by `config`.
    ///
    /// # Errors
    /// Returns [Error::InvalidBaseUrl] if the base URL does not parse, or
    /// [Error::HttpClient] if the underlying client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let base_url = config.base_url()?;
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .build()
            .map_err(|error| Error::HttpClient(error.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn url_for(&self, request: &Request) -> String {
        format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            request.target()
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Value, Error> {
        let url = self.url_for(&request);
        tracing::debug!(
            "{} {url} {}",
            request.method.as_str(),
            request.data.as_ref().map(redact_fields).unwrap_or_default()
        );

        let mut builder = self.client.request(request.method.into(), &url);
        if let Some(form) = request.body() {
            builder = builder.multipart(form);
        }

        let response = builder.send().await.map_err(|error| {
            tracing::error!("{} {url} failed: {error}", request.method.as_str());
            Error::Transport {
                status: error.status().map(|status| status.as_u16()).unwrap_or(0),
            }
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|error| {
            tracing::error!("could not read the response body from {url}: {error}");
            Error::Transport { status }
        })?;

        match serde_json::from_slice(&body) {
            Ok(value) => Ok(value),
            Err(error) => {
                tracing::warn!("response from {url} (status {status}) is not JSON: {error}");
                Ok(Value::Null)
            }
        }
    }
}
