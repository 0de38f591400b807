//! Accounts and the `/account` resource.

use std::sync::Arc;

use serde::Deserialize;

use crate::{
    Envelope, Error, Method, Request, Resource, Transport,
    entity::{id_from_number_or_string, sum_from_number_or_string},
};

/// The resource root for accounts.
pub const ACCOUNT_PATH: &str = "/account";

/// The identifier of an account, as sent by the server.
pub type AccountId = String;

/// A bank account or wallet and how much money is in it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Account {
    /// The ID of the account.
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
    /// The balance.
    #[serde(deserialize_with = "sum_from_number_or_string")]
    pub sum: f64,
}

impl Resource<Account> {
    /// A client for the `/account` resource.
    pub fn accounts(transport: Arc<dyn Transport>) -> Self {
        Self::new(ACCOUNT_PATH, transport)
    }

    /// Fetch a single account by `id`.
    ///
    /// An empty `id` requests the resource root; what the server returns in
    /// that case is up to the server.
    ///
    /// # Errors
    /// Returns an error if the transport fails or the response cannot be
    /// decoded.
    pub async fn get(&self, id: &str) -> Result<Envelope<Account>, Error> {
        self.send(Request::new(Method::Get, format!("{}/{id}", self.path())))
            .await
    }
}
