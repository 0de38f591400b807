//! Incomes, expenses and the `/transaction` resource.

use std::sync::Arc;

use serde::Deserialize;

use crate::{
    AccountId, Resource, Transport,
    entity::{id_from_number_or_string, sum_from_number_or_string},
};

/// The resource root for transactions.
pub const TRANSACTION_PATH: &str = "/transaction";

/// The identifier of a transaction, as sent by the server.
pub type TransactionId = String;

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    #[serde(alias = "INCOME")]
    Income,
    /// Money spent.
    #[serde(alias = "EXPENSE")]
    Expense,
}

impl TransactionType {
    /// The value sent in the `type` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

/// An income or expense recorded against an account.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: TransactionId,
    /// The account the transaction belongs to.
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub account_id: AccountId,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// What the money was for.
    pub name: String,
    /// The amount of money.
    #[serde(deserialize_with = "sum_from_number_or_string")]
    pub sum: f64,
    /// When the transaction was recorded, e.g. "2019-03-10 03:20:41".
    pub created_at: String,
}

impl Resource<Transaction> {
    /// A client for the `/transaction` resource.
    pub fn transactions(transport: Arc<dyn Transport>) -> Self {
        Self::new(TRANSACTION_PATH, transport)
    }
}
