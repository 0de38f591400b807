use std::sync::Arc;

use crate::{App, Error, ModalId, dom::Element};

const CREATE_INCOME_CLASS: &str = "create-income-button";
const CREATE_EXPENSE_CLASS: &str = "create-expense-button";

/// The "new income" and "new expense" buttons.
pub struct TransactionsWidget {
    element: Element,
    app: Arc<dyn App>,
}

impl TransactionsWidget {
    /// Bind the widget to `element`.
    ///
    /// A missing income or expense button is logged but not fatal; clicks on
    /// the other button keep working.
    ///
    /// # Errors
    /// Returns [Error::MissingElement] if `element` is `None`.
    pub fn new(element: Option<Element>, app: Arc<dyn App>) -> Result<Self, Error> {
        let element = element.ok_or(Error::MissingElement("TransactionsWidget"))?;

        for class in [CREATE_INCOME_CLASS, CREATE_EXPENSE_CLASS] {
            if element.query(class).is_none() {
                tracing::error!("could not find the .{class} button");
            }
        }

        Ok(Self { element, app })
    }

    /// The root element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Handle a click on `target`, which should be inside the widget.
    pub fn click(&self, target: &Element) {
        let modal = if self.element.closest(target, CREATE_INCOME_CLASS).is_some() {
            ModalId::NewIncome
        } else if self.element.closest(target, CREATE_EXPENSE_CLASS).is_some() {
            ModalId::NewExpense
        } else {
            return;
        };

        self.app.modal(modal).open();
    }
}
