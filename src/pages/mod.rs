//! Views that replace the main content area when the user navigates.

mod transactions;

pub use transactions::TransactionsPage;
