use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    App, Dialogs, Error, Fields, ModalId, Session,
    dom::Element,
    forms::{AsyncForm, finish_sign_in},
};

/// Shown when logging in fails and the server gave no reason.
pub const LOG_IN_FAILED: &str = "Неверный логин или пароль";

/// The form in the `login` modal.
pub struct LogInForm {
    element: Element,
    session: Arc<dyn Session>,
    app: Arc<dyn App>,
    dialogs: Arc<dyn Dialogs>,
}

impl LogInForm {
    /// Bind the form to `element`.
    ///
    /// # Errors
    /// Returns [Error::MissingElement] if `element` is `None`.
    pub fn new(
        element: Option<Element>,
        session: Arc<dyn Session>,
        app: Arc<dyn App>,
        dialogs: Arc<dyn Dialogs>,
    ) -> Result<Self, Error> {
        let element = element.ok_or(Error::MissingElement("LogInForm"))?;

        Ok(Self {
            element,
            session,
            app,
            dialogs,
        })
    }
}

#[async_trait]
impl AsyncForm for LogInForm {
    fn element(&self) -> &Element {
        &self.element
    }

    async fn on_submit(&self, data: Fields) {
        let result = self.session.log_in(data).await;

        finish_sign_in(
            &self.element,
            ModalId::LogIn,
            LOG_IN_FAILED,
            result,
            self.app.as_ref(),
            self.dialogs.as_ref(),
        );
    }
}
