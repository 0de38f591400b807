use std::sync::Arc;

use crate::{
    Account, App, Dialogs, Error, Fields, ModalId, Page, PageOptions, Resource, Session,
    dom::Element, html::account_item,
};

const ACCOUNT_CLASS: &str = "account";
const CREATE_ACCOUNT_CLASS: &str = "create-account";
const ACTIVE_CLASS: &str = "active";

/// Shown when listing accounts fails and the server gave no reason.
pub const LOAD_ACCOUNTS_FAILED: &str = "Не удалось загрузить счета.";

/// The list of the user's accounts in the sidebar.
pub struct AccountsWidget {
    element: Element,
    accounts: Resource<Account>,
    session: Arc<dyn Session>,
    app: Arc<dyn App>,
    dialogs: Arc<dyn Dialogs>,
}

impl AccountsWidget {
    /// Bind the widget to `element`.
    ///
    /// The widget does not fetch anything until [AccountsWidget::update] is
    /// called.
    ///
    /// # Errors
    /// Returns [Error::MissingElement] if `element` is `None`.
    pub fn new(
        element: Option<Element>,
        accounts: Resource<Account>,
        session: Arc<dyn Session>,
        app: Arc<dyn App>,
        dialogs: Arc<dyn Dialogs>,
    ) -> Result<Self, Error> {
        let element = element.ok_or(Error::MissingElement("AccountsWidget"))?;

        Ok(Self {
            element,
            accounts,
            session,
            app,
            dialogs,
        })
    }

    /// The root element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Reload the signed-in user's accounts and redraw the list.
    ///
    /// Guests see no change and no request is made.
    pub async fn update(&self) {
        let Some(user) = self.session.current() else {
            return;
        };

        match self.accounts.list(Fields::from(&user)).await {
            Ok(response) if response.success => {
                self.clear();
                self.render_items(response.data.as_deref().unwrap_or_default());
            }
            Ok(response) => {
                tracing::error!("could not list accounts: {:?}", response.error);
                self.dialogs.alert(response.error_or(LOAD_ACCOUNTS_FAILED));
            }
            Err(error) => {
                tracing::error!("could not list accounts: {error}");
                self.dialogs.alert(&error.to_string());
            }
        }
    }

    /// Remove every rendered account.
    pub fn clear(&self) {
        self.element.remove_all(ACCOUNT_CLASS);
    }

    /// Append one sidebar entry per account, in order.
    pub fn render_items(&self, accounts: &[Account]) {
        for account in accounts {
            self.element.append_html(account_item(account));
        }
    }

    /// Handle a click on `target`, which should be inside the widget.
    pub fn click(&self, target: &Element) {
        if self
            .element
            .closest(target, CREATE_ACCOUNT_CLASS)
            .is_some()
        {
            self.app.modal(ModalId::CreateAccount).open();
            return;
        }

        if let Some(account) = self.element.closest(target, ACCOUNT_CLASS) {
            self.on_select_account(&account);
        }
    }

    /// Mark `account` as the selected account and show its transactions.
    pub fn on_select_account(&self, account: &Element) {
        for active in self.element.query_all(ACTIVE_CLASS) {
            active.remove_class(ACTIVE_CLASS);
        }
        account.add_class(ACTIVE_CLASS);

        let Some(account_id) = account.data("id") else {
            tracing::error!("selected account has no data-id: {account:?}");
            return;
        };

        self.app
            .show_page(Page::Transactions, PageOptions { account_id });
    }
}
