use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    Account, App, Dialogs, Error, Fields, ModalId, Resource, Session, Transaction,
    TransactionType,
    app::{NETWORK_ERROR, failure_alert},
    dom::Element,
    forms::AsyncForm,
    html::account_options,
};

const ACCOUNTS_SELECT_CLASS: &str = "accounts-select";

/// Shown when the server rejects a new transaction without saying why.
pub const CREATE_TRANSACTION_FAILED: &str = "Ошибка транзакции";

/// The form in the `newIncome` or `newExpense` modal.
pub struct CreateTransactionForm {
    element: Element,
    kind: TransactionType,
    accounts: Resource<Account>,
    transactions: Resource<Transaction>,
    session: Arc<dyn Session>,
    app: Arc<dyn App>,
    dialogs: Arc<dyn Dialogs>,
}

impl CreateTransactionForm {
    /// Bind a form for transactions of `kind` to `element`.
    ///
    /// The account choices are empty until
    /// [CreateTransactionForm::render_accounts_list] is called.
    ///
    /// # Errors
    /// Returns [Error::MissingElement] if `element` is `None`.
    pub fn new(
        element: Option<Element>,
        kind: TransactionType,
        accounts: Resource<Account>,
        transactions: Resource<Transaction>,
        session: Arc<dyn Session>,
        app: Arc<dyn App>,
        dialogs: Arc<dyn Dialogs>,
    ) -> Result<Self, Error> {
        let element = element.ok_or(Error::MissingElement("CreateTransactionForm"))?;

        Ok(Self {
            element,
            kind,
            accounts,
            transactions,
            session,
            app,
            dialogs,
        })
    }

    /// Whether the form creates incomes or expenses.
    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    fn modal_id(&self) -> ModalId {
        match self.kind {
            TransactionType::Income => ModalId::NewIncome,
            TransactionType::Expense => ModalId::NewExpense,
        }
    }

    /// Reload the user's accounts into the `.accounts-select` dropdown.
    pub async fn render_accounts_list(&self) {
        let filter = self
            .session
            .current()
            .map(|user| Fields::from(&user))
            .unwrap_or_default();

        let response = match self.accounts.list(filter).await {
            Ok(response) => response,
            Err(error @ Error::Transport { .. }) => {
                tracing::error!("could not list accounts: {error}");
                self.dialogs.alert(NETWORK_ERROR);
                return;
            }
            Err(error) => {
                tracing::error!("could not list accounts: {error}");
                return;
            }
        };

        let Some(accounts) = response.data.filter(|_| response.success) else {
            tracing::debug!("not refreshing account choices: {:?}", response.error);
            return;
        };

        match self.element.query(ACCOUNTS_SELECT_CLASS) {
            Some(select) => select.set_inner_html(account_options(&accounts)),
            None => tracing::error!("could not find the .{ACCOUNTS_SELECT_CLASS} element"),
        }
    }
}

#[async_trait]
impl AsyncForm for CreateTransactionForm {
    fn element(&self) -> &Element {
        &self.element
    }

    /// Create the transaction. On success the app is refreshed, the form reset
    /// and its modal closed.
    ///
    /// The form's kind fills in `type` when the markup does not carry it.
    async fn on_submit(&self, mut data: Fields) {
        if data.get("type").is_none() {
            data.insert("type", self.kind.as_str());
        }

        match self.transactions.create(data).await {
            Ok(response) if response.success => {
                self.app.update();
                self.element.reset();
                self.app.modal(self.modal_id()).close();
            }
            Ok(response) => {
                tracing::error!("could not create transaction: {:?}", response.error);
                self.dialogs
                    .alert(response.error_or(CREATE_TRANSACTION_FAILED));
            }
            Err(error) => {
                tracing::error!("could not create transaction: {error}");
                self.dialogs
                    .alert(failure_alert(&error, CREATE_TRANSACTION_FAILED));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;

    use crate::{
        AppCommand, AppState, Method, ModalId, Resource, TransactionType, UserSession,
        app::NETWORK_ERROR,
        dom::Element,
        forms::{
            AsyncForm, CreateTransactionForm, create_transaction::CREATE_TRANSACTION_FAILED,
        },
        test_utils::{FakeTransport, ScriptedDialogs, drain, test_app, test_user},
    };

    const FORM: &str = r#"<form class="form" id="new-income-form">
        <input type="text" name="name" class="form-control" value="Зарплата">
        <input type="number" name="sum" class="form-control" value="1000">
        <select name="account_id" class="form-control accounts-select"></select>
    </form>"#;

    struct Fixture {
        form: CreateTransactionForm,
        transport: Arc<FakeTransport>,
        state: Arc<AppState>,
        dialogs: Arc<ScriptedDialogs>,
        commands: UnboundedReceiver<AppCommand>,
    }

    fn fixture(kind: TransactionType) -> Fixture {
        let transport = Arc::new(FakeTransport::new());
        let (state, app, commands) = test_app();
        let dialogs = Arc::new(ScriptedDialogs::declining());
        let form = CreateTransactionForm::new(
            Element::parse(FORM),
            kind,
            Resource::accounts(transport.clone()),
            Resource::transactions(transport.clone()),
            Arc::new(UserSession::new(transport.clone(), state.clone())),
            Arc::new(app),
            dialogs.clone(),
        )
        .unwrap();

        Fixture {
            form,
            transport,
            state,
            dialogs,
            commands,
        }
    }

    fn accounts_response() -> serde_json::Value {
        json!({"success": true, "data": [
            {"id": 7, "name": "Main", "sum": 500},
            {"id": 8, "name": "Savings", "sum": 0}
        ]})
    }

    #[tokio::test]
    async fn renders_account_options_for_user() {
        let fixture = fixture(TransactionType::Income);
        fixture.state.set_current_user(test_user());
        fixture
            .transport
            .respond(Method::Get, "/account", accounts_response());

        fixture.form.render_accounts_list().await;

        let select = fixture.form.element().query("accounts-select").unwrap();
        assert_eq!(
            select.inner_html(),
            r#"<option value="7">Main</option><option value="8">Savings</option>"#
        );
        assert_eq!(
            fixture.transport.requests()[0].target(),
            "/account?id=1&name=Alice&email=alice@example.com"
        );
    }

    #[tokio::test]
    async fn guest_lists_accounts_without_filter() {
        let fixture = fixture(TransactionType::Income);
        fixture
            .transport
            .respond(Method::Get, "/account", accounts_response());

        fixture.form.render_accounts_list().await;

        assert_eq!(fixture.transport.requests()[0].target(), "/account?");
    }

    #[tokio::test]
    async fn failed_listing_keeps_existing_options() {
        let fixture = fixture(TransactionType::Income);
        fixture
            .transport
            .respond(Method::Get, "/account", accounts_response());
        fixture.form.render_accounts_list().await;
        fixture
            .transport
            .respond(Method::Get, "/account", json!({"success": false}));

        fixture.form.render_accounts_list().await;

        let select = fixture.form.element().query("accounts-select").unwrap();
        assert_eq!(select.children().len(), 2);
        assert!(fixture.dialogs.alerts().is_empty());
    }

    #[tokio::test]
    async fn unreadable_listing_is_only_logged() {
        let fixture = fixture(TransactionType::Income);
        fixture
            .transport
            .respond(Method::Get, "/account", serde_json::Value::Null);

        fixture.form.render_accounts_list().await;

        assert!(fixture.dialogs.alerts().is_empty());
    }

    #[tokio::test]
    async fn listing_network_failure_alerts() {
        let fixture = fixture(TransactionType::Income);

        fixture.form.render_accounts_list().await;

        assert_eq!(fixture.dialogs.alerts(), vec![NETWORK_ERROR]);
    }

    #[tokio::test]
    async fn submitting_expense_creates_transaction_and_closes_modal() {
        let mut fixture = fixture(TransactionType::Expense);
        fixture.state.open_modal(ModalId::NewExpense);
        fixture
            .transport
            .respond(Method::Get, "/account", accounts_response());
        fixture
            .transport
            .respond(Method::Put, "/transaction", json!({"success": true}));
        fixture.form.render_accounts_list().await;

        fixture.form.submit().await;

        let create = fixture.transport.requests().pop().unwrap();
        assert_eq!(create.method, Method::Put);
        assert_eq!(
            create.data.unwrap().iter().collect::<Vec<_>>(),
            vec![
                ("name", "Зарплата"),
                ("sum", "1000"),
                ("account_id", "7"),
                ("type", "expense")
            ]
        );
        assert!(!fixture.state.is_modal_open(ModalId::NewExpense));
        assert_eq!(drain(&mut fixture.commands), vec![AppCommand::Update]);
        assert!(fixture.form.element().query("form-control").unwrap().attribute("value").is_none());
    }

    #[tokio::test]
    async fn rejection_alerts_fallback_and_keeps_modal_open() {
        let fixture = fixture(TransactionType::Income);
        fixture.state.open_modal(ModalId::NewIncome);
        fixture
            .transport
            .respond(Method::Put, "/transaction", json!({"success": false, "error": ""}));

        fixture.form.submit().await;

        assert_eq!(fixture.dialogs.alerts(), vec![CREATE_TRANSACTION_FAILED]);
        assert!(fixture.state.is_modal_open(ModalId::NewIncome));
    }
}
