use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use crate::dto::auth_dto::{SignInPayload, SignUpPayload};
use crate::error::{Error, Result};
use crate::identity::{Session, SignUp};
use crate::services::auth_service::AuthService;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEventKind {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub kind: SessionEventKind,
    pub session: Option<Session>,
}

/// Client-side session holder. Keeps the current session and announces every
/// change on a broadcast channel.
pub struct AuthClient {
    auth: AuthService,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl AuthClient {
    pub fn new(auth: AuthService) -> Self {
        Self::build(auth, None)
    }

    /// Starts from a session persisted by an earlier run.
    pub fn with_session(auth: AuthService, session: Session) -> Self {
        Self::build(auth, Some(session))
    }

    fn build(auth: AuthService, session: Option<Session>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            auth,
            session: RwLock::new(session),
            events,
        }
    }

    pub async fn get_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Re-announces the current session to subscribers.
    pub async fn announce(&self) {
        let session = self.get_session().await;
        self.emit(SessionEventKind::InitialSession, session);
    }

    pub async fn sign_up(&self, payload: &SignUpPayload) -> Result<SignUp> {
        let signup = self.auth.sign_up(payload).await?;
        if let Some(session) = signup.session.clone() {
            self.store(SessionEventKind::SignedIn, Some(session)).await;
        }
        Ok(signup)
    }

    pub async fn sign_in(&self, payload: &SignInPayload) -> Result<Session> {
        let session = self.auth.sign_in(payload).await?;
        self.store(SessionEventKind::SignedIn, Some(session.clone()))
            .await;
        Ok(session)
    }

    pub async fn sign_out(&self) -> Result<()> {
        if let Some(session) = self.get_session().await {
            self.auth.sign_out(&session.access_token).await?;
        }
        self.store(SessionEventKind::SignedOut, None).await;
        Ok(())
    }

    pub async fn refresh(&self) -> Result<Session> {
        let current = self
            .get_session()
            .await
            .ok_or_else(|| Error::Unauthorized("Not signed in".into()))?;
        let session = self.auth.refresh(&current.refresh_token).await?;
        self.store(SessionEventKind::TokenRefreshed, Some(session.clone()))
            .await;
        Ok(session)
    }

    async fn store(&self, kind: SessionEventKind, session: Option<Session>) {
        *self.session.write().await = session.clone();
        self.emit(kind, session);
    }

    fn emit(&self, kind: SessionEventKind, session: Option<Session>) {
        // No subscribers is fine.
        let _ = self.events.send(SessionEvent { kind, session });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::eq;
    use uuid::Uuid;

    use super::*;
    use crate::gateway::MemoryStore;
    use crate::identity::{AuthUser, MockIdentityProvider, SignupMetadata};

    fn session(token: &str) -> Session {
        Session {
            access_token: token.to_string(),
            refresh_token: format!("{}-refresh", token),
            expires_in: 3600,
            expires_at: None,
            user: AuthUser {
                id: Uuid::new_v4(),
                email: Some("a@b.co".into()),
                user_metadata: SignupMetadata::default(),
            },
        }
    }

    fn client(mock: MockIdentityProvider) -> AuthClient {
        AuthClient::new(AuthService::new(Arc::new(mock), Arc::new(MemoryStore::new())))
    }

    fn sign_in_payload() -> SignInPayload {
        SignInPayload {
            email: "a@b.co".into(),
            password: "secret1".into(),
        }
    }

    #[tokio::test]
    async fn sign_in_stores_session_and_emits() {
        let mut mock = MockIdentityProvider::new();
        mock.expect_sign_in()
            .with(eq("a@b.co"), eq("secret1"))
            .times(1)
            .returning(|_, _| Ok(session("tok")));
        let client = client(mock);
        let mut events = client.subscribe();

        client.sign_in(&sign_in_payload()).await.unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.kind, SessionEventKind::SignedIn);
        assert_eq!(event.session.unwrap().access_token, "tok");
        assert!(client.get_session().await.is_some());
    }

    #[tokio::test]
    async fn failed_sign_in_emits_nothing() {
        let mut mock = MockIdentityProvider::new();
        mock.expect_sign_in()
            .returning(|_, _| Err(Error::Identity("Invalid login credentials".into())));
        let client = client(mock);
        let mut events = client.subscribe();

        let err = client.sign_in(&sign_in_payload()).await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid login credentials");
        assert!(events.try_recv().is_err());
        assert!(client.get_session().await.is_none());
    }

    #[tokio::test]
    async fn sign_out_revokes_with_current_token() {
        let mut mock = MockIdentityProvider::new();
        mock.expect_sign_out()
            .with(eq("tok"))
            .times(1)
            .returning(|_| Ok(()));
        let auth = AuthService::new(Arc::new(mock), Arc::new(MemoryStore::new()));
        let client = AuthClient::with_session(auth, session("tok"));
        let mut events = client.subscribe();

        client.sign_out().await.unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.kind, SessionEventKind::SignedOut);
        assert!(event.session.is_none());
        assert!(client.get_session().await.is_none());
    }

    #[tokio::test]
    async fn refresh_without_session_is_unauthorized() {
        let client = client(MockIdentityProvider::new());
        assert!(matches!(client.refresh().await, Err(Error::Unauthorized(_))));
    }
}
