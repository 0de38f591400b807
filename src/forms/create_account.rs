use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    Account, App, Dialogs, Error, Fields, ModalId, Resource, app::failure_alert, dom::Element,
    forms::AsyncForm,
};

/// Shown when the server rejects a new account without saying why.
pub const CREATE_ACCOUNT_FAILED: &str = "Не получилось создать счёт";

/// The form in the `createAccount` modal.
pub struct CreateAccountForm {
    element: Element,
    accounts: Resource<Account>,
    app: Arc<dyn App>,
    dialogs: Arc<dyn Dialogs>,
}

impl CreateAccountForm {
    /// Bind the form to `element`.
    ///
    /// # Errors
    /// Returns [Error::MissingElement] if `element` is `None`.
    pub fn new(
        element: Option<Element>,
        accounts: Resource<Account>,
        app: Arc<dyn App>,
        dialogs: Arc<dyn Dialogs>,
    ) -> Result<Self, Error> {
        let element = element.ok_or(Error::MissingElement("CreateAccountForm"))?;

        Ok(Self {
            element,
            accounts,
            app,
            dialogs,
        })
    }
}

#[async_trait]
impl AsyncForm for CreateAccountForm {
    fn element(&self) -> &Element {
        &self.element
    }

    /// Create an account. On success the modal is closed, the app refreshed
    /// and the form reset.
    async fn on_submit(&self, data: Fields) {
        match self.accounts.create(data).await {
            Ok(response) if response.success => {
                self.app.modal(ModalId::CreateAccount).close();
                self.app.update();
                self.element.reset();
            }
            Ok(response) => {
                tracing::error!("could not create account: {:?}", response.error);
                self.dialogs.alert(response.error_or(CREATE_ACCOUNT_FAILED));
            }
            Err(error) => {
                tracing::error!("could not create account: {error}");
                self.dialogs
                    .alert(failure_alert(&error, CREATE_ACCOUNT_FAILED));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{Value, json};

    use crate::{
        AppCommand, Method, ModalId, Resource,
        app::NETWORK_ERROR,
        dom::Element,
        forms::{AsyncForm, CreateAccountForm, create_account::CREATE_ACCOUNT_FAILED},
        test_utils::{FakeTransport, ScriptedDialogs, drain, test_app},
    };

    const FORM: &str = r#"<form class="form" id="new-account-form">
        <input type="text" name="name" class="form-control" placeholder="Название счёта" value="Main">
    </form>"#;

    #[tokio::test]
    async fn success_closes_modal_refreshes_and_resets() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(Method::Put, "/account", json!({"success": true, "data": {"id": 7}}));
        let (state, app, mut commands) = test_app();
        state.open_modal(ModalId::CreateAccount);
        let dialogs = Arc::new(ScriptedDialogs::declining());
        let form = CreateAccountForm::new(
            Element::parse(FORM),
            Resource::accounts(transport.clone()),
            Arc::new(app),
            dialogs.clone(),
        )
        .unwrap();

        form.submit().await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Put);
        assert_eq!(requests[0].data.as_ref().unwrap().get("name"), Some("Main"));
        assert!(!state.is_modal_open(ModalId::CreateAccount));
        assert_eq!(drain(&mut commands), vec![AppCommand::Update]);
        assert_eq!(form.element().query("form-control").unwrap().attribute("value"), None);
        assert!(dialogs.alerts().is_empty());
    }

    #[tokio::test]
    async fn rejection_alerts_server_error_or_fallback() {
        let transport = Arc::new(FakeTransport::new());
        let (state, app, mut commands) = test_app();
        state.open_modal(ModalId::CreateAccount);
        let dialogs = Arc::new(ScriptedDialogs::declining());
        let form = CreateAccountForm::new(
            Element::parse(FORM),
            Resource::accounts(transport.clone()),
            Arc::new(app),
            dialogs.clone(),
        )
        .unwrap();

        transport.respond(
            Method::Put,
            "/account",
            json!({"success": false, "error": "Счёт с таким названием уже есть"}),
        );
        form.submit().await;
        transport.respond(Method::Put, "/account", json!({"success": false}));
        form.submit().await;

        assert_eq!(
            dialogs.alerts(),
            vec!["Счёт с таким названием уже есть", CREATE_ACCOUNT_FAILED]
        );
        assert!(state.is_modal_open(ModalId::CreateAccount));
        assert!(drain(&mut commands).is_empty());
        assert_eq!(
            form.element().query("form-control").unwrap().attribute("value").as_deref(),
            Some("Main")
        );
    }

    #[tokio::test]
    async fn unreadable_response_alerts_fallback() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(Method::Put, "/account", Value::Null);
        let (_, app, _commands) = test_app();
        let dialogs = Arc::new(ScriptedDialogs::declining());
        let form = CreateAccountForm::new(
            Element::parse(FORM),
            Resource::accounts(transport),
            Arc::new(app),
            dialogs.clone(),
        )
        .unwrap();

        form.submit().await;

        assert_eq!(dialogs.alerts(), vec![CREATE_ACCOUNT_FAILED]);
    }

    #[tokio::test]
    async fn network_failure_alerts() {
        let transport = Arc::new(FakeTransport::new());
        let (_, app, _commands) = test_app();
        let dialogs = Arc::new(ScriptedDialogs::declining());
        let form = CreateAccountForm::new(
            Element::parse(FORM),
            Resource::accounts(transport),
            Arc::new(app),
            dialogs.clone(),
        )
        .unwrap();

        form.submit().await;

        assert_eq!(dialogs.alerts(), vec![NETWORK_ERROR]);
    }
}
