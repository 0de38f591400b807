use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    Account, App, Dialogs, Error, Fields, PageOptions, Resource, Transaction,
    app::failure_alert,
    dom::Element,
    html::{ACCOUNT_TITLE_PLACEHOLDER, transaction_rows},
};

const TITLE_CLASS: &str = "content-title";
const CONTENT_CLASS: &str = "content";
const REMOVE_ACCOUNT_CLASS: &str = "remove-account";
const REMOVE_TRANSACTION_CLASS: &str = "transaction__remove";

const CONFIRM_REMOVE_ACCOUNT: &str = "Вы действительно хотите удалить счёт?";
const CONFIRM_REMOVE_TRANSACTION: &str = "Вы действительно хотите удалить эту транзакцию?";
const REMOVE_ACCOUNT_FAILED: &str = "Не удалось удалить счёт";
const REMOVE_TRANSACTION_FAILED: &str = "Не удалось удалить транзакцию";

/// The incomes and expenses of one account.
///
/// The page is either empty or bound to the account it last rendered. Nothing
/// is cached: every [TransactionsPage::update] fetches the account and its
/// transactions again.
pub struct TransactionsPage {
    element: Element,
    accounts: Resource<Account>,
    transactions: Resource<Transaction>,
    app: Arc<dyn App>,
    dialogs: Arc<dyn Dialogs>,
    last_options: Mutex<Option<PageOptions>>,
}

impl TransactionsPage {
    /// Bind the page to `element`. The page starts out empty.
    ///
    /// # Errors
    /// Returns [Error::MissingElement] if `element` is `None`.
    pub fn new(
        element: Option<Element>,
        accounts: Resource<Account>,
        transactions: Resource<Transaction>,
        app: Arc<dyn App>,
        dialogs: Arc<dyn Dialogs>,
    ) -> Result<Self, Error> {
        let element = element.ok_or(Error::MissingElement("TransactionsPage"))?;

        Ok(Self {
            element,
            accounts,
            transactions,
            app,
            dialogs,
            last_options: Mutex::new(None),
        })
    }

    /// The root element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// The options the page was last rendered with, or `None` if it is empty.
    pub fn last_options(&self) -> Option<PageOptions> {
        self.options().clone()
    }

    fn options(&self) -> MutexGuard<'_, Option<PageOptions>> {
        self.last_options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Render the page again with the options it was last rendered with.
    pub async fn update(&self) {
        let options = self.last_options();
        self.render(options).await;
    }

    /// Bind the page to `options` and render the account's name and
    /// transactions.
    ///
    /// `None` leaves the page untouched. Failed requests leave whatever was
    /// already rendered in place.
    pub async fn render(&self, options: Option<PageOptions>) {
        let Some(options) = options else {
            return;
        };
        *self.options() = Some(options.clone());

        let account = match self.accounts.get(&options.account_id).await {
            Ok(response) if response.success => response.data,
            Ok(response) => {
                tracing::debug!(
                    "could not get account {}: {:?}",
                    options.account_id,
                    response.error
                );
                return;
            }
            Err(error) => {
                tracing::debug!("could not get account {}: {error}", options.account_id);
                return;
            }
        };
        let Some(account) = account else {
            tracing::debug!("account {} response had no data", options.account_id);
            return;
        };
        self.render_title(&account.name);

        let filter = Fields::new().with("account_id", &options.account_id);
        match self.transactions.list(filter).await {
            Ok(response) if response.success => {
                self.render_transactions(response.data.as_deref().unwrap_or_default());
            }
            Ok(response) => {
                tracing::debug!(
                    "could not list transactions for account {}: {:?}",
                    options.account_id,
                    response.error
                );
            }
            Err(error) => {
                tracing::debug!(
                    "could not list transactions for account {}: {error}",
                    options.account_id
                );
            }
        }
    }

    /// Empty the page without touching the server.
    pub fn clear(&self) {
        self.render_transactions(&[]);
        self.render_title(ACCOUNT_TITLE_PLACEHOLDER);
        *self.options() = None;
    }

    /// Write `name` into `.content-title`.
    pub fn render_title(&self, name: &str) {
        match self.element.query(TITLE_CLASS) {
            Some(title) => title.set_text_content(name),
            None => tracing::error!("could not find the .{TITLE_CLASS} element"),
        }
    }

    /// Replace the contents of `.content` with one row per transaction.
    pub fn render_transactions(&self, transactions: &[Transaction]) {
        match self.element.query(CONTENT_CLASS) {
            Some(content) => content.set_inner_html(transaction_rows(transactions)),
            None => tracing::error!("could not find the .{CONTENT_CLASS} element"),
        }
    }

    /// Ask for confirmation and delete the account the page is bound to.
    ///
    /// Does nothing when the page is empty. On success the page is cleared and
    /// the widgets and forms are refreshed.
    pub async fn remove_account(&self) {
        let Some(options) = self.last_options() else {
            return;
        };
        if !self.dialogs.confirm(CONFIRM_REMOVE_ACCOUNT) {
            return;
        }

        let data = Fields::new().with("id", &options.account_id);
        match self.accounts.remove(data).await {
            Ok(response) if response.success => {
                tracing::info!("removed account {}", options.account_id);
                self.clear();
                self.app.update_widgets();
                self.app.update_forms();
            }
            Ok(response) => {
                tracing::error!(
                    "could not remove account {}: {:?}",
                    options.account_id,
                    response.error
                );
                self.dialogs.alert(response.error_or(REMOVE_ACCOUNT_FAILED));
            }
            Err(error) => {
                tracing::error!("could not remove account {}: {error}", options.account_id);
                self.dialogs
                    .alert(failure_alert(&error, REMOVE_ACCOUNT_FAILED));
            }
        }
    }

    /// Ask for confirmation and delete the transaction `id`. On success the
    /// whole app is refreshed.
    pub async fn remove_transaction(&self, id: &str) {
        if !self.dialogs.confirm(CONFIRM_REMOVE_TRANSACTION) {
            return;
        }

        match self.transactions.remove(Fields::new().with("id", id)).await {
            Ok(response) if response.success => {
                tracing::info!("removed transaction {id}");
                self.app.update();
            }
            Ok(response) => {
                tracing::error!("could not remove transaction {id}: {:?}", response.error);
                self.dialogs
                    .alert(response.error_or(REMOVE_TRANSACTION_FAILED));
            }
            Err(error) => {
                tracing::error!("could not remove transaction {id}: {error}");
                self.dialogs
                    .alert(failure_alert(&error, REMOVE_TRANSACTION_FAILED));
            }
        }
    }

    /// Handle a click on `target`, which should be inside the page.
    pub async fn click(&self, target: &Element) {
        if self
            .element
            .closest(target, REMOVE_ACCOUNT_CLASS)
            .is_some()
        {
            self.remove_account().await;
            return;
        }

        let Some(button) = self.element.closest(target, REMOVE_TRANSACTION_CLASS) else {
            return;
        };
        match button.data("id") {
            Some(id) => self.remove_transaction(&id).await,
            None => tracing::error!("remove button has no data-id: {button:?}"),
        }
    }
}
