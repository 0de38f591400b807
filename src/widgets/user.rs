use std::sync::Arc;

use crate::{Error, Session, dom::Element};

const USER_NAME_CLASS: &str = "user-name";

/// Shows the signed-in user's name.
pub struct UserWidget {
    element: Element,
    session: Arc<dyn Session>,
}

impl UserWidget {
    /// Bind the widget to `element`.
    ///
    /// # Errors
    /// Returns [Error::MissingElement] if `element` is `None`.
    pub fn new(element: Option<Element>, session: Arc<dyn Session>) -> Result<Self, Error> {
        let element = element.ok_or(Error::MissingElement("UserWidget"))?;

        Ok(Self { element, session })
    }

    /// The root element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Write the current user's name into `.user-name`, or clear it for guests.
    pub fn update(&self) {
        let Some(user_name) = self.element.query(USER_NAME_CLASS) else {
            tracing::error!("could not find the .{USER_NAME_CLASS} element");
            return;
        };

        match self.session.current() {
            Some(user) => user_name.set_text_content(&user.name),
            None => user_name.set_text_content(""),
        }
    }
}
