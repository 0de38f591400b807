#![allow(missing_docs)]

pub(crate) mod html;

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Notify, mpsc::UnboundedReceiver};

use crate::{
    AppCommand, AppHandle, AppState, Dialogs, Error, Method, Request, Transport, User,
};

pub(crate) use html::{assert_valid_html, parse_fragment};

/// A [Transport] that answers from a table of canned responses keyed by
/// method and URL, and records every request it receives.
///
/// Unrouted requests fail with a transport error.
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), Result<Value, Error>>>,
    requests: Mutex<Vec<Request>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, method: Method, url: &str, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, url.to_owned()), Ok(body));
    }

    pub(crate) fn fail(&self, method: Method, url: &str, error: Error) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, url.to_owned()), Err(error));
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: Request) -> Result<Value, Error> {
        self.requests.lock().unwrap().push(request.clone());

        self.routes
            .lock()
            .unwrap()
            .get(&(request.method, request.url.clone()))
            .cloned()
            .unwrap_or(Err(Error::Transport { status: 0 }))
    }
}

/// Wraps a [FakeTransport] and holds back the first request until
/// [GatedTransport::open] is called.
pub(crate) struct GatedTransport {
    inner: FakeTransport,
    gate: Notify,
    gated: AtomicBool,
}

impl GatedTransport {
    pub(crate) fn new(inner: FakeTransport) -> Self {
        Self {
            inner,
            gate: Notify::new(),
            gated: AtomicBool::new(true),
        }
    }

    pub(crate) fn open(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn send(&self, request: Request) -> Result<Value, Error> {
        if self.gated.swap(false, Ordering::SeqCst) {
            self.gate.notified().await;
        }

        self.inner.send(request).await
    }
}

/// [Dialogs] that answer every confirmation the same way and remember what
/// was shown.
#[derive(Default)]
pub(crate) struct ScriptedDialogs {
    accept: bool,
    alerts: Mutex<Vec<String>>,
    confirmations: Mutex<Vec<String>>,
}

impl ScriptedDialogs {
    pub(crate) fn accepting() -> Self {
        Self {
            accept: true,
            ..Default::default()
        }
    }

    pub(crate) fn declining() -> Self {
        Self::default()
    }

    pub(crate) fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub(crate) fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().unwrap().clone()
    }
}

impl Dialogs for ScriptedDialogs {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_owned());
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirmations.lock().unwrap().push(message.to_owned());
        self.accept
    }
}

pub(crate) fn test_user() -> User {
    User {
        id: "1".to_owned(),
        name: "Alice".to_owned(),
        email: Some("alice@example.com".to_owned()),
    }
}

/// An [AppHandle] over fresh state, with the receiving end of its command
/// channel.
pub(crate) fn test_app() -> (Arc<AppState>, AppHandle, UnboundedReceiver<AppCommand>) {
    let state = Arc::new(AppState::new());
    let (app, commands) = AppHandle::new(state.clone());

    (state, app, commands)
}

/// Drain every command sent so far.
pub(crate) fn drain(commands: &mut UnboundedReceiver<AppCommand>) -> Vec<AppCommand> {
    let mut got = Vec::new();
    while let Ok(command) = commands.try_recv() {
        got.push(command);
    }
    got
}
