//! The collaborators components are given instead of reaching for globals.
//!
//! [App] is how a component asks the rest of the application to refresh,
//! switch pages or open a modal. [AppHandle] is the provided implementation:
//! modal state is kept in the [AppState] and everything else is forwarded to
//! the host as an [AppCommand].
//!
//! [Dialogs] covers the blocking alert and confirmation prompts.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{AccountId, AppState, Error};

/// The alert shown when a request never reached the server.
pub const NETWORK_ERROR: &str = "Ошибка сети";

/// The alert for a request that failed with `error`: [NETWORK_ERROR] when the
/// server could not be reached, `fallback` when its answer could not be read.
pub(crate) fn failure_alert<'a>(error: &Error, fallback: &'a str) -> &'a str {
    match error {
        Error::Transport { .. } => NETWORK_ERROR,
        _ => fallback,
    }
}

/// The modal windows components open and close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModalId {
    /// The form for creating an account.
    CreateAccount,
    /// The form for adding an income.
    NewIncome,
    /// The form for adding an expense.
    NewExpense,
    /// The registration form.
    Register,
    /// The log in form.
    LogIn,
}

impl ModalId {
    /// The name the markup refers to the modal by.
    pub fn as_str(self) -> &'static str {
        match self {
            ModalId::CreateAccount => "createAccount",
            ModalId::NewIncome => "newIncome",
            ModalId::NewExpense => "newExpense",
            ModalId::Register => "register",
            ModalId::LogIn => "login",
        }
    }
}

/// Whether the app shows its signed-in or guest layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserState {
    /// Nobody is signed in.
    #[default]
    Unlogged,
    /// A user is signed in.
    Logged,
}

impl UserState {
    /// The name of the layout state, e.g. `"user-logged"`.
    pub fn as_str(self) -> &'static str {
        match self {
            UserState::Unlogged => "user-unlogged",
            UserState::Logged => "user-logged",
        }
    }
}

/// The pages the app can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// The incomes and expenses of one account.
    Transactions,
}

/// What a page is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    /// The account whose transactions are shown.
    pub account_id: AccountId,
}

/// A request from a component to the rest of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Refresh every widget, page and form.
    Update,
    /// Refresh the widgets.
    UpdateWidgets,
    /// Refresh the forms.
    UpdateForms,
    /// Switch between the signed-in and guest layouts.
    SetState(UserState),
    /// Show `page` bound to `options`.
    ShowPage(Page, PageOptions),
}

/// A handle for opening and closing one modal window.
#[derive(Debug, Clone)]
pub struct Modal {
    id: ModalId,
    state: Arc<AppState>,
}

impl Modal {
    /// Create a handle for the modal `id` whose open state lives in `state`.
    pub fn new(id: ModalId, state: Arc<AppState>) -> Self {
        Self { id, state }
    }

    /// Which modal this handle controls.
    pub fn id(&self) -> ModalId {
        self.id
    }

    /// Show the modal.
    pub fn open(&self) {
        tracing::debug!("opening modal {}", self.id.as_str());
        self.state.open_modal(self.id);
    }

    /// Hide the modal.
    pub fn close(&self) {
        tracing::debug!("closing modal {}", self.id.as_str());
        self.state.close_modal(self.id);
    }
}

/// The application as seen by widgets, pages and forms.
pub trait App: Send + Sync {
    /// A handle for the modal `id`.
    fn modal(&self, id: ModalId) -> Modal;

    /// Refresh every widget, page and form.
    fn update(&self);

    /// Refresh the widgets.
    fn update_widgets(&self);

    /// Refresh the forms.
    fn update_forms(&self);

    /// Switch the layout to `state`.
    fn set_state(&self, state: UserState);

    /// Show `page` bound to `options`.
    fn show_page(&self, page: Page, options: PageOptions);
}

/// Blocking prompts shown to the user.
pub trait Dialogs: Send + Sync {
    /// Show `message` and wait for the user to dismiss it.
    fn alert(&self, message: &str);

    /// Ask the user to confirm `message`. Returns `true` if they agreed.
    fn confirm(&self, message: &str) -> bool;
}

/// The provided [App]: modal state goes to the [AppState], everything else is
/// sent to the host over an unbounded channel.
#[derive(Debug, Clone)]
pub struct AppHandle {
    state: Arc<AppState>,
    commands: UnboundedSender<AppCommand>,
}

impl AppHandle {
    /// Create a handle over `state` and the receiver the host reads commands
    /// from.
    pub fn new(state: Arc<AppState>) -> (Self, UnboundedReceiver<AppCommand>) {
        let (commands, receiver) = mpsc::unbounded_channel();

        (Self { state, commands }, receiver)
    }

    /// The shared application state.
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    fn send(&self, command: AppCommand) {
        tracing::debug!("sending {command:?}");
        if let Err(error) = self.commands.send(command) {
            tracing::warn!("nobody is listening for app commands, dropped {:?}", error.0);
        }
    }
}

impl App for AppHandle {
    fn modal(&self, id: ModalId) -> Modal {
        Modal::new(id, self.state.clone())
    }

    fn update(&self) {
        self.send(AppCommand::Update);
    }

    fn update_widgets(&self) {
        self.send(AppCommand::UpdateWidgets);
    }

    fn update_forms(&self) {
        self.send(AppCommand::UpdateForms);
    }

    fn set_state(&self, state: UserState) {
        self.state.set_user_state(state);
        self.send(AppCommand::SetState(state));
    }

    fn show_page(&self, page: Page, options: PageOptions) {
        self.send(AppCommand::ShowPage(page, options));
    }
}
