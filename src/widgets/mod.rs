//! Persistent components bound to a part of the page.
//!
//! A widget is constructed once with its root element and kept for the life of
//! the application. Hosts forward clicks inside the root to `click` and call
//! `update` whenever the app asks for the widgets to refresh.

mod accounts;
mod transactions;
mod user;

pub use accounts::AccountsWidget;
pub use transactions::TransactionsWidget;
pub use user::UserWidget;
