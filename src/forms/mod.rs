//! Modal forms that collect their fields and submit them to the server.
//!
//! Hosts call [AsyncForm::submit] when the form element is submitted. The
//! form gathers the values of its named controls into [Fields] and hands them
//! to [AsyncForm::on_submit], which performs the request and reports the
//! outcome through the app and dialogs.

mod create_account;
mod create_transaction;
mod log_in;
mod register;

use async_trait::async_trait;

use crate::{
    App, Dialogs, Envelope, Error, Fields, ModalId, User, UserState, app::failure_alert,
    dom::Element,
};

pub use create_account::CreateAccountForm;
pub use create_transaction::CreateTransactionForm;
pub use log_in::LogInForm;
pub use register::RegisterForm;

/// Input types that never contribute a value.
const IGNORED_INPUT_TYPES: [&str; 5] = ["submit", "button", "reset", "file", "image"];

/// A form whose submission is handled asynchronously.
#[async_trait]
pub trait AsyncForm: Send + Sync {
    /// The form element.
    fn element(&self) -> &Element;

    /// Handle the submitted `data`.
    async fn on_submit(&self, data: Fields);

    /// Collect the form's fields and submit them.
    async fn submit(&self) {
        let data = form_fields(self.element());
        self.on_submit(data).await;
    }
}

/// Apply the outcome of registering or logging in from the form `element`
/// shown in the modal `modal`.
///
/// A signed-in user resets the form, switches the app to its signed-in layout
/// and closes the modal. Anything else is reported with an alert.
fn finish_sign_in(
    element: &Element,
    modal: ModalId,
    fallback: &str,
    result: Result<Envelope<User>, Error>,
    app: &dyn App,
    dialogs: &dyn Dialogs,
) {
    match result {
        Ok(response) if response.success => {
            element.reset();
            app.set_state(UserState::Logged);
            app.modal(modal).close();
        }
        Ok(response) => {
            tracing::error!("could not sign in: {:?}", response.error);
            dialogs.alert(response.error_or(fallback));
        }
        Err(error) => {
            tracing::error!("could not sign in: {error}");
            dialogs.alert(failure_alert(&error, fallback));
        }
    }
}

/// The values of the named controls under `form`, in document order.
///
/// Disabled controls are skipped, checkboxes and radio buttons only count when
/// checked, and a select without a selected option submits its first option.
pub fn form_fields(form: &Element) -> Fields {
    let mut fields = Fields::new();

    for control in form.descendants() {
        let Some(name) = control.attribute("name") else {
            continue;
        };
        if name.is_empty() || control.attribute("disabled").is_some() {
            continue;
        }

        let value = match control.tag().as_str() {
            "input" => input_value(&control),
            "select" => select_value(&control),
            "textarea" => Some(control.text_content()),
            _ => None,
        };

        if let Some(value) = value {
            fields.insert(&name, value);
        }
    }

    fields
}

fn input_value(input: &Element) -> Option<String> {
    let input_type = input
        .attribute("type")
        .unwrap_or_default()
        .to_ascii_lowercase();

    match input_type.as_str() {
        "checkbox" | "radio" => input
            .attribute("checked")
            .map(|_| input.attribute("value").unwrap_or_else(|| "on".to_owned())),
        kind if IGNORED_INPUT_TYPES.contains(&kind) => None,
        _ => Some(input.attribute("value").unwrap_or_default()),
    }
}

fn select_value(select: &Element) -> Option<String> {
    let options: Vec<Element> = select
        .descendants()
        .into_iter()
        .filter(|element| element.tag() == "option")
        .collect();

    let option = options
        .iter()
        .find(|option| option.attribute("selected").is_some())
        .or_else(|| options.first())?;

    Some(
        option
            .attribute("value")
            .unwrap_or_else(|| option.text_content()),
    )
}
