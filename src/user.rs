//! The signed-in user and the `/user` endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    AppState, Envelope, Error, Fields, Method, Request, Transport,
    entity::id_from_number_or_string,
};

/// The endpoint for the current session's user.
pub const CURRENT_USER_PATH: &str = "/user/current";
/// The endpoint for creating a user.
pub const REGISTER_PATH: &str = "/user/register";
/// The endpoint for logging in.
pub const LOG_IN_PATH: &str = "/user/login";
/// The endpoint for logging out.
pub const LOG_OUT_PATH: &str = "/user/logout";

/// A user of the application.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    /// The user's ID.
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    /// The name shown in the sidebar.
    pub name: String,
    /// The address the user registered with.
    #[serde(default)]
    pub email: Option<String>,
}

impl From<&User> for Fields {
    fn from(user: &User) -> Self {
        let mut fields = Fields::new().with("id", &user.id).with("name", &user.name);
        if let Some(email) = &user.email {
            fields.insert("email", email);
        }
        fields
    }
}

/// Who is signed in, and how to sign in.
#[async_trait]
pub trait Session: Send + Sync {
    /// The signed-in user, or `None` for guests.
    fn current(&self) -> Option<User>;

    /// Create a user from the registration form `data`.
    ///
    /// A successful registration signs the new user in.
    ///
    /// # Errors
    /// Returns an error if the transport fails or the response cannot be
    /// decoded.
    async fn register(&self, data: Fields) -> Result<Envelope<User>, Error>;

    /// Sign in with the credentials in `data`.
    ///
    /// # Errors
    /// Returns an error if the transport fails or the response cannot be
    /// decoded.
    async fn log_in(&self, data: Fields) -> Result<Envelope<User>, Error>;
}

/// A [Session] backed by the `/user` endpoints, keeping the signed-in user in
/// the [AppState].
#[derive(Clone)]
pub struct UserSession {
    transport: Arc<dyn Transport>,
    state: Arc<AppState>,
}

impl UserSession {
    /// Create a session that talks to the server through `transport`.
    pub fn new(transport: Arc<dyn Transport>, state: Arc<AppState>) -> Self {
        Self { transport, state }
    }

    /// Ask the server who is signed in and update the application state to
    /// match.
    ///
    /// # Errors
    /// Returns an error if the transport fails or the response cannot be
    /// decoded. The stored user is left untouched in that case.
    pub async fn fetch(&self) -> Result<Envelope<User>, Error> {
        let body = self
            .transport
            .send(Request::new(Method::Get, CURRENT_USER_PATH))
            .await?;
        let response = Envelope::<User>::decode(body)?;

        match (&response.success, &response.data) {
            (true, Some(user)) => self.state.set_current_user(user.clone()),
            _ => self.state.unset_current_user(),
        }

        Ok(response)
    }

    /// Sign the current user out.
    ///
    /// # Errors
    /// Returns an error if the transport fails or the response cannot be
    /// decoded.
    pub async fn log_out(&self) -> Result<Envelope<Value>, Error> {
        let body = self
            .transport
            .send(Request::new(Method::Post, LOG_OUT_PATH))
            .await?;
        let response = Envelope::<Value>::decode(body)?;

        if response.success {
            self.state.unset_current_user();
        }

        Ok(response)
    }

    async fn authenticate(&self, path: &str, data: Fields) -> Result<Envelope<User>, Error> {
        let body = self
            .transport
            .send(Request::new(Method::Post, path).with_data(data))
            .await?;
        let response = Envelope::<User>::decode(body)?;

        if let (true, Some(user)) = (response.success, &response.data) {
            tracing::info!("signed in as user {}", user.id);
            self.state.set_current_user(user.clone());
        }

        Ok(response)
    }
}

#[async_trait]
impl Session for UserSession {
    fn current(&self) -> Option<User> {
        self.state.current_user()
    }

    async fn register(&self, data: Fields) -> Result<Envelope<User>, Error> {
        self.authenticate(REGISTER_PATH, data).await
    }

    async fn log_in(&self, data: Fields) -> Result<Envelope<User>, Error> {
        self.authenticate(LOG_IN_PATH, data).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::{
        AppState, Error, Fields, Method, Session, UserSession,
        test_utils::{FakeTransport, test_user},
        user::{CURRENT_USER_PATH, LOG_IN_PATH, LOG_OUT_PATH, REGISTER_PATH},
    };

    fn session() -> (Arc<FakeTransport>, Arc<AppState>, UserSession) {
        let transport = Arc::new(FakeTransport::new());
        let state = Arc::new(AppState::new());
        let session = UserSession::new(transport.clone(), state.clone());

        (transport, state, session)
    }

    #[test]
    fn user_fields_include_every_known_property() {
        let fields = Fields::from(&test_user());

        assert_eq!(
            fields.iter().collect::<Vec<_>>(),
            vec![("id", "1"), ("name", "Alice"), ("email", "alice@example.com")]
        );
    }

    #[tokio::test]
    async fn successful_register_signs_in() {
        let (transport, _, session) = session();
        transport.respond(
            Method::Post,
            REGISTER_PATH,
            json!({"success": true, "user": {"id": 1, "name": "Alice", "email": "alice@example.com"}}),
        );

        let got = session
            .register(Fields::new().with("name", "Alice").with("password", "secret"))
            .await
            .unwrap();

        assert!(got.success);
        assert_eq!(session.current(), Some(test_user()));
        assert_eq!(transport.requests()[0].method, Method::Post);
    }

    #[tokio::test]
    async fn failed_log_in_keeps_guest() {
        let (transport, _, session) = session();
        transport.respond(
            Method::Post,
            LOG_IN_PATH,
            json!({"success": false, "error": "bad password"}),
        );

        let got = session.log_in(Fields::new()).await.unwrap();

        assert!(!got.success);
        assert_eq!(session.current(), None);
    }

    #[tokio::test]
    async fn fetch_without_session_signs_out() {
        let (transport, state, session) = session();
        state.set_current_user(test_user());
        transport.respond(Method::Get, CURRENT_USER_PATH, json!({"success": false}));

        session.fetch().await.unwrap();

        assert_eq!(session.current(), None);
    }

    #[tokio::test]
    async fn fetch_transport_error_keeps_user() {
        let (transport, state, session) = session();
        state.set_current_user(test_user());
        transport.fail(Method::Get, CURRENT_USER_PATH, Error::Transport { status: 0 });

        let got = session.fetch().await;

        assert_eq!(got, Err(Error::Transport { status: 0 }));
        assert_eq!(session.current(), Some(test_user()));
    }

    #[tokio::test]
    async fn log_out_clears_user() {
        let (transport, state, session) = session();
        state.set_current_user(test_user());
        transport.respond(Method::Post, LOG_OUT_PATH, json!({"success": true}));

        session.log_out().await.unwrap();

        assert_eq!(session.current(), None);
    }
}
