//! The `{success, data, error}` wrapper around every server response.

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::Error;

/// A decoded server response.
///
/// Check [Envelope::success] before trusting [Envelope::data].
/// [Envelope::error] is only meaningful when `success` is `false`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope<T> {
    /// Whether the server carried out the request.
    pub success: bool,

    /// The payload. User endpoints send it under `user`.
    #[serde(alias = "user")]
    pub data: Option<T>,

    /// The server's description of what went wrong.
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// The error to show the user for a failed response, or `fallback` when the
    /// server did not supply one.
    pub fn error_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.error
            .as_deref()
            .filter(|error| !error.is_empty())
            .unwrap_or(fallback)
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decode the JSON body returned by a [Transport](crate::Transport).
    ///
    /// # Errors
    /// Returns [Error::EmptyResponse] for a `null` body and
    /// [Error::InvalidResponse] if the body does not have the expected shape.
    pub fn decode(body: Value) -> Result<Self, Error> {
        if body.is_null() {
            return Err(Error::EmptyResponse);
        }

        serde_json::from_value(body).map_err(|error| {
            tracing::error!("could not decode server response: {error}");
            Error::InvalidResponse(error.to_string())
        })
    }
}
