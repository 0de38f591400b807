//! Implements a struct that holds the process-wide state of the client.

use std::{
    collections::BTreeSet,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{ModalId, User, UserState};

/// The state shared by every component: who is signed in, whether the app is
/// in its signed-in or guest layout, and which modals are open.
#[derive(Debug, Default)]
pub struct AppState {
    current_user: Mutex<Option<User>>,
    user_state: Mutex<UserState>,
    open_modals: Mutex<BTreeSet<ModalId>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AppState {
    /// Create the state for a guest with no open modals.
    pub fn new() -> Self {
        Self::default()
    }

    /// The signed-in user.
    pub fn current_user(&self) -> Option<User> {
        lock(&self.current_user).clone()
    }

    /// Remember `user` as signed in.
    pub fn set_current_user(&self, user: User) {
        *lock(&self.current_user) = Some(user);
    }

    /// Forget the signed-in user.
    pub fn unset_current_user(&self) {
        *lock(&self.current_user) = None;
    }

    /// The current layout.
    pub fn user_state(&self) -> UserState {
        *lock(&self.user_state)
    }

    /// Switch the layout.
    pub fn set_user_state(&self, state: UserState) {
        *lock(&self.user_state) = state;
    }

    /// Mark the modal `id` as open.
    pub fn open_modal(&self, id: ModalId) {
        lock(&self.open_modals).insert(id);
    }

    /// Mark the modal `id` as closed.
    pub fn close_modal(&self, id: ModalId) {
        lock(&self.open_modals).remove(&id);
    }

    /// Whether the modal `id` is open.
    pub fn is_modal_open(&self, id: ModalId) -> bool {
        lock(&self.open_modals).contains(&id)
    }
}
