//! Who is signed in, and how the storefront asks for a sign-in.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cafeverse_api::AuthSession;
use cafeverse_core::Actor;

use crate::error::StoreError;
use crate::store::KeyValueStore;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Why the login flow was requested; each carries the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginReason {
    AddToCart,
    ManageCart,
    Checkout,
    ViewOrders,
    AdminDashboard,
    SessionExpired,
}

impl LoginReason {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            LoginReason::AddToCart => "Please log in to add items to your cart.",
            LoginReason::ManageCart => "Please log in to manage your cart.",
            LoginReason::Checkout => "Please log in to complete your order.",
            LoginReason::ViewOrders => "Please log in to view your orders.",
            LoginReason::AdminDashboard => "Please log in to access admin dashboard.",
            LoginReason::SessionExpired => "Session expired. Please log in again.",
        }
    }
}

/// The signed-in actor, as seen by the cart and checkout.
pub trait AuthContext: fmt::Debug + Send + Sync {
    fn current_actor(&self) -> Option<Actor>;

    /// Token for the `Authorization` header, when signed in.
    fn token(&self) -> Option<String>;

    /// Asks the UI to route to the login flow.
    fn request_login(&self, reason: LoginReason);
}

#[derive(Clone)]
struct Session {
    token: String,
    actor: Actor,
}

/// Session persisted under the `token` and `user` keys.
///
/// Login requests are recorded rather than acted on; the UI drains them with
/// [`SessionAuth::take_login_request`].
pub struct SessionAuth {
    kv: Arc<dyn KeyValueStore>,
    session: Mutex<Option<Session>>,
    login_request: Mutex<Option<LoginReason>>,
}

impl SessionAuth {
    /// Restores whatever session was saved. Missing or unreadable entries
    /// mean signed out.
    #[must_use]
    pub fn restore(kv: Arc<dyn KeyValueStore>) -> Self {
        let session = match read_session(kv.as_ref()) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "saved session unreadable, starting signed out");
                None
            }
        };
        Self {
            kv,
            session: Mutex::new(session),
            login_request: Mutex::new(None),
        }
    }

    /// Stores a fresh session from login or signup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session cannot be persisted; the
    /// in-memory session is still replaced.
    pub fn sign_in(&self, session: AuthSession) -> Result<(), StoreError> {
        let user_json = serde_json::to_string(&session.user)?;
        tracing::info!(user_id = session.user.id, "session started");
        *lock(&self.session) = Some(Session {
            token: session.token.clone(),
            actor: session.user,
        });
        *lock(&self.login_request) = None;
        self.kv.set(TOKEN_KEY, &session.token)?;
        self.kv.set(USER_KEY, &user_json)
    }

    /// Forgets the session in memory and on disk.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the saved entries cannot be removed.
    pub fn sign_out(&self) -> Result<(), StoreError> {
        *lock(&self.session) = None;
        tracing::info!("session ended");
        self.kv.remove(TOKEN_KEY)?;
        self.kv.remove(USER_KEY)
    }

    /// The pending login request, if any, clearing it.
    pub fn take_login_request(&self) -> Option<LoginReason> {
        lock(&self.login_request).take()
    }
}

impl AuthContext for SessionAuth {
    fn current_actor(&self) -> Option<Actor> {
        lock(&self.session).as_ref().map(|s| s.actor.clone())
    }

    fn token(&self) -> Option<String> {
        lock(&self.session).as_ref().map(|s| s.token.clone())
    }

    fn request_login(&self, reason: LoginReason) {
        tracing::info!(?reason, "login requested");
        *lock(&self.login_request) = Some(reason);
    }
}

impl fmt::Debug for SessionAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = lock(&self.session);
        f.debug_struct("SessionAuth")
            .field("actor", &session.as_ref().map(|s| &s.actor))
            .field("token", &session.as_ref().map(|_| "[redacted]"))
            .field("login_request", &*lock(&self.login_request))
            .finish_non_exhaustive()
    }
}

fn read_session(kv: &dyn KeyValueStore) -> Result<Option<Session>, StoreError> {
    let (Some(token), Some(user)) = (kv.get(TOKEN_KEY)?, kv.get(USER_KEY)?) else {
        return Ok(None);
    };
    if token.trim().is_empty() {
        return Ok(None);
    }
    let actor: Actor = serde_json::from_str(&user)?;
    Ok(Some(Session { token, actor }))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKeyValueStore;

    fn session(token: &str) -> AuthSession {
        serde_json::from_value(serde_json::json!({
            "token": token,
            "User": { "id": 5, "username": "ada", "email": "ada@example.com" }
        }))
        .unwrap()
    }

    #[test]
    fn starts_signed_out_on_empty_store() {
        let auth = SessionAuth::restore(Arc::new(MemoryKeyValueStore::new()));
        assert!(auth.current_actor().is_none());
        assert!(auth.token().is_none());
    }

    #[test]
    fn sign_in_persists_and_restores() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        SessionAuth::restore(kv.clone()).sign_in(session("tok-1")).unwrap();

        let restored = SessionAuth::restore(kv);
        assert_eq!(restored.token().as_deref(), Some("tok-1"));
        assert_eq!(restored.current_actor().unwrap().display_name(), "ada");
    }

    #[test]
    fn sign_out_clears_both_keys() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let auth = SessionAuth::restore(kv.clone());
        auth.sign_in(session("tok-1")).unwrap();
        auth.sign_out().unwrap();

        assert!(auth.current_actor().is_none());
        assert_eq!(kv.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(kv.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn corrupt_user_entry_means_signed_out() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        kv.set(TOKEN_KEY, "tok").unwrap();
        kv.set(USER_KEY, "{not json").unwrap();
        assert!(SessionAuth::restore(kv).current_actor().is_none());
    }

    #[test]
    fn login_requests_are_recorded_once() {
        let auth = SessionAuth::restore(Arc::new(MemoryKeyValueStore::new()));
        auth.request_login(LoginReason::AddToCart);
        assert_eq!(auth.take_login_request(), Some(LoginReason::AddToCart));
        assert_eq!(auth.take_login_request(), None);
    }

    #[test]
    fn debug_output_hides_the_token() {
        let auth = SessionAuth::restore(Arc::new(MemoryKeyValueStore::new()));
        auth.sign_in(session("super-secret")).unwrap();
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[redacted]"));
    }
}
