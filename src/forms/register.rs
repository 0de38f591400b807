use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    App, Dialogs, Error, Fields, ModalId, Session,
    dom::Element,
    forms::{AsyncForm, finish_sign_in},
};

/// Shown when registration fails and the server gave no reason.
pub const REGISTER_FAILED: &str = "Произошла ошибка при регистрации";

/// The form in the `register` modal.
pub struct RegisterForm {
    element: Element,
    session: Arc<dyn Session>,
    app: Arc<dyn App>,
    dialogs: Arc<dyn Dialogs>,
}

impl RegisterForm {
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
        let element = element.ok_or(Error::MissingElement("RegisterForm"))?;

        Ok(Self {
            element,
            session,
            app,
            dialogs,
        })
    }
}

#[async_trait]
impl AsyncForm for RegisterForm {
    fn element(&self) -> &Element {
        &self.element
    }

    async fn on_submit(&self, data: Fields) {
        let result = self.session.register(data).await;

        finish_sign_in(
            &self.element,
            ModalId::Register,
            REGISTER_FAILED,
            result,
            self.app.as_ref(),
            self.dialogs.as_ref(),
        );
    }
}
