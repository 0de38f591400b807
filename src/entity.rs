//! The generic resource client behind accounts and transactions.

use std::{fmt, marker::PhantomData, sync::Arc};

use serde::{
    Deserialize, Deserializer,
    de::{self, DeserializeOwned},
};
use serde_json::Value;

use crate::{Envelope, Error, Fields, Method, Request, Transport};

/// A client for one server resource, e.g. `/account`.
///
/// `T` is the entity the resource lists. All operations return the server's
/// [Envelope] unless the transport itself fails; no validation of the
/// submitted data happens on the client.
pub struct Resource<T> {
    path: String,
    transport: Arc<dyn Transport>,
    entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            transport: self.transport.clone(),
            entity: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource").field("path", &self.path).finish()
    }
}

impl<T: DeserializeOwned> Resource<T> {
    /// Create a client for the resource at `path`.
    pub fn new(path: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            path: path.to_owned(),
            transport,
            entity: PhantomData,
        }
    }

    /// The resource root, e.g. `/account`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// List the entities matching `filter`, which is sent as query parameters.
    ///
    /// # Errors
    /// Returns an error if the transport fails or the response cannot be
    /// decoded.
    pub async fn list(&self, filter: Fields) -> Result<Envelope<Vec<T>>, Error> {
        self.send(Request::new(Method::Get, self.path.as_str()).with_data(filter))
            .await
    }

    /// Create an entity from `data`. The server assigns the identifier.
    ///
    /// # Errors
    /// Returns an error if the transport fails or the response cannot be
    /// decoded.
    pub async fn create(&self, data: Fields) -> Result<Envelope<Value>, Error> {
        self.send(Request::new(Method::Put, self.path.as_str()).with_data(data))
            .await
    }

    /// Remove the entity identified by `data`.
    ///
    /// # Errors
    /// Returns an error if the transport fails or the response cannot be
    /// decoded.
    pub async fn remove(&self, data: Fields) -> Result<Envelope<Value>, Error> {
        self.send(Request::new(Method::Delete, self.path.as_str()).with_data(data))
            .await
    }

    pub(crate) async fn send<U: DeserializeOwned>(
        &self,
        request: Request,
    ) -> Result<Envelope<U>, Error> {
        let body = self.transport.send(request).await?;

        Envelope::decode(body)
    }
}

/// Deserialize an identifier that the server may send as a number or a string.
pub(crate) fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(serde_json::Number),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(number) => number.to_string(),
        RawId::Text(text) => text,
    })
}

/// Deserialize an amount that the server may send as a number or as the text
/// it was submitted as, e.g. `"500"`.
pub(crate) fn sum_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSum {
        Number(f64),
        Text(String),
    }

    match RawSum::deserialize(deserializer)? {
        RawSum::Number(number) => Ok(number),
        RawSum::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid sum {text:?}"))),
    }
}
