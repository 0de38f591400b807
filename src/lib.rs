//! Budgeteur client is the client-side UI layer for a personal finance tracker.
//!
//! It renders the accounts sidebar, the transactions page for one account and
//! the modal forms for registering, logging in, creating accounts and creating
//! transactions. Every server interaction goes through a single [Transport]
//! and the JSON [Envelope] the server wraps its responses in.
//!
//! Components mutate a retained [dom::Element] tree and talk to the rest of the
//! application through injected collaborators: [App], [Session] and [Dialogs].

#![warn(missing_docs)]

pub mod account;
pub mod app;
mod app_state;
pub mod config;
pub mod dom;
pub mod entity;
mod envelope;
pub mod forms;
pub mod html;
mod logging;
pub mod pages;
pub mod transaction;
pub mod transport;
pub mod user;
pub mod widgets;

#[cfg(test)]
mod test_utils;

pub use account::{Account, AccountId};
pub use app::{App, AppCommand, AppHandle, Dialogs, Modal, ModalId, Page, PageOptions, UserState};
pub use app_state::AppState;
pub use config::ClientConfig;
pub use entity::Resource;
pub use envelope::Envelope;
pub use transaction::{Transaction, TransactionType};
pub use transport::{Fields, HttpTransport, Method, Request, Transport};
pub use user::{Session, User, UserSession};

/// The errors that may occur in the client.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request never produced a usable HTTP response, e.g. the connection
    /// was refused or the body could not be read.
    ///
    /// `status` is zero when no HTTP status is known.
    #[error("Request failed. Status: {status}")]
    Transport {
        /// The HTTP status of the failed request, or zero.
        status: u16,
    },

    /// The server answered, but the body was not JSON.
    #[error("the server response was empty or not valid JSON")]
    EmptyResponse,

    /// The server answered with JSON that does not match the expected envelope
    /// or entity shape.
    ///
    /// Callers should pass in the original decoding error as a string.
    #[error("could not decode the server response: {0}")]
    InvalidResponse(String),

    /// A widget, page or form was constructed without its root element.
    #[error("the element for {0} does not exist")]
    MissingElement(&'static str),

    /// The configured API base URL could not be parsed.
    #[error("invalid API base URL \"{0}\"")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be built.
    #[error("could not build the HTTP client: {0}")]
    HttpClient(String),
}
