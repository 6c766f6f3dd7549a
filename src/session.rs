use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::supabase::SupabaseClient;

/// Held only in memory; the remote auth service owns the durable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub access_token: String,
}

/// Remote auth operations, injected so tests can run without the service.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `Ok(None)` means the token is invalid or expired; `Err` is a transport
    /// or service failure.
    async fn get_user(&self, access_token: &str) -> Result<Option<Session>>;
    async fn send_magic_link(&self, email: &str) -> Result<()>;
    async fn sign_out(&self, access_token: &str) -> Result<()>;
}

/// Single process-wide owner of the current session. All auth changes flow
/// through here and are published on a watch channel; dropping a receiver is
/// the unsubscribe.
pub struct SessionController {
    auth: Arc<dyn AuthApi>,
    supabase: Arc<SupabaseClient>,
    tx: watch::Sender<Option<Session>>,
}

impl SessionController {
    pub fn new(auth: Arc<dyn AuthApi>, supabase: Arc<SupabaseClient>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { auth, supabase, tx }
    }

    /// Initial session fetch. Any failure degrades to "no session" so the UI
    /// lands on the login view instead of blocking.
    pub async fn restore(&self, stored_token: Option<String>) {
        let Some(token) = stored_token else {
            self.publish(None);
            return;
        };
        match self.auth.get_user(&token).await {
            Ok(Some(session)) => {
                info!(user_id = %session.user_id, "session restored");
                self.publish(Some(session));
            }
            Ok(None) => {
                info!("stored token no longer valid");
                self.publish(None);
            }
            Err(e) => {
                warn!(error = %e, "session fetch failed; continuing unauthenticated");
                self.publish(None);
            }
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Requests a one-time sign-in link; the session only materializes once
    /// the user follows it and `complete_sign_in` runs with the issued token.
    pub async fn sign_in_with_magic_link(&self, email: &str) -> Result<()> {
        self.auth.send_magic_link(email).await
    }

    pub async fn complete_sign_in(&self, access_token: String) -> Result<Option<Session>> {
        let session = self.auth.get_user(&access_token).await?;
        self.publish(session.clone());
        Ok(session)
    }

    /// Clears the local session even when the remote call fails.
    pub async fn sign_out(&self) -> Result<()> {
        let current = self.current();
        self.publish(None);
        if let Some(session) = current {
            self.auth.sign_out(&session.access_token).await?;
        }
        Ok(())
    }

    fn publish(&self, session: Option<Session>) {
        self.supabase
            .set_access_token(session.as_ref().map(|s| s.access_token.clone()));
        self.tx.send_replace(session);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    Inventory,
    ShoppingList,
    Preferences,
    Login,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(View),
}

/// Route guard: protected views require a session; the login view bounces
/// authenticated users back to the default view.
pub fn guard(view: View, session: Option<&Session>) -> Access {
    match (view, session) {
        (View::Login, Some(_)) => Access::Redirect(View::Overview),
        (View::Login, None) => Access::Allow,
        (_, Some(_)) => Access::Allow,
        (_, None) => Access::Redirect(View::Login),
    }
}


#[cfg(test)]
mod tests {
    use super::test_auth::{FailingAuth, NullAuth, StaticAuth};
    use super::*;

    fn session() -> Session {
        Session {
            user_id: Uuid::new_v4(),
            email: Some("user@example.com".into()),
            access_token: "jwt".into(),
        }
    }

    fn controller(auth: Arc<dyn AuthApi>) -> SessionController {
        let supabase = Arc::new(SupabaseClient::new("http://localhost:54321", "anon"));
        SessionController::new(auth, supabase)
    }

    #[test]
    fn protected_views_redirect_to_login_without_session() {
        for view in [View::Overview, View::Inventory, View::ShoppingList, View::Preferences] {
            assert_eq!(guard(view, None), Access::Redirect(View::Login));
        }
    }

    #[test]
    fn login_redirects_to_overview_when_authenticated() {
        let s = session();
        assert_eq!(guard(View::Login, Some(&s)), Access::Redirect(View::Overview));
        assert_eq!(guard(View::Login, None), Access::Allow);
        assert_eq!(guard(View::Inventory, Some(&s)), Access::Allow);
    }

    #[tokio::test]
    async fn restore_without_stored_token_yields_no_session() {
        let c = controller(Arc::new(NullAuth));
        c.restore(None).await;
        assert!(c.current().is_none());
    }

    #[tokio::test]
    async fn restore_fails_open_when_auth_service_is_down() {
        let c = controller(Arc::new(FailingAuth));
        c.restore(Some("stale-jwt".into())).await;
        assert!(c.current().is_none());
        assert_eq!(guard(View::Overview, c.current().as_ref()), Access::Redirect(View::Login));
    }

    #[tokio::test]
    async fn restore_publishes_session_to_subscribers() {
        let s = session();
        let c = controller(Arc::new(StaticAuth(s.clone())));
        let rx = c.subscribe();
        c.restore(Some(s.access_token.clone())).await;
        assert_eq!(c.current(), Some(s.clone()));
        assert_eq!(*rx.borrow(), Some(s));
    }

    #[tokio::test]
    async fn sign_out_clears_session_even_when_remote_call_fails() {
        let s = session();
        let c = controller(Arc::new(StaticAuth(s.clone())));
        c.restore(Some(s.access_token.clone())).await;
        assert!(c.current().is_some());

        // swap in a failing backend by building a new controller holding state
        let failing = controller(Arc::new(FailingAuth));
        failing.tx.send_replace(Some(s));
        let res = failing.sign_out().await;
        assert!(res.is_err());
        assert!(failing.current().is_none());
    }
}
