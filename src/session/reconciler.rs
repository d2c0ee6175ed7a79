//! Single-writer session state for the signed-in user.
//!
//! `SessionReconciler` owns a `watch` channel carrying [`AuthState`]. A
//! listener task follows the [`AuthClient`]'s session events and keeps the
//! profile in step with the identity. Consumers only read.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast::error::RecvError, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::client::{AuthClient, SessionEvent};
use super::reconcile::{reconcile_profile, PROFILE_NOT_FOUND};
use super::state::AuthState;
use crate::dto::auth_dto::{SignInPayload, SignUpPayload};
use crate::gateway::RecordStore;
use crate::identity::{AuthUser, Session};
use crate::models::profile::Role;

/// Result handed to callers of the session operations. The error is already a
/// user-facing message.
pub type Outcome<T> = std::result::Result<T, String>;

/// Outstanding work behind the `loading` flag: operations still running and
/// session events an operation triggered that the listener has not applied.
#[derive(Debug, Default)]
struct Busy {
    operations: AtomicUsize,
    awaited_events: AtomicUsize,
}

impl Busy {
    fn any(&self) -> bool {
        self.operations.load(Ordering::SeqCst) > 0 || self.awaited_events.load(Ordering::SeqCst) > 0
    }
}

fn decrement(counter: &AtomicUsize) {
    let _ = counter.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
}

/// Publishes into the state channel unless the reconciler has been stopped.
/// `loading` is always derived from [`Busy`] inside the channel lock.
#[derive(Clone)]
struct Publisher {
    state: Arc<watch::Sender<AuthState>>,
    mounted: CancellationToken,
    busy: Arc<Busy>,
}

impl Publisher {
    fn publish(&self, mut next: AuthState) {
        if self.mounted.is_cancelled() {
            tracing::debug!("reconciler stopped, dropping state update");
            return;
        }
        let busy = &self.busy;
        self.state.send_modify(|s| {
            next.loading = busy.any();
            *s = next;
        });
    }

    fn modify(&self, f: impl FnOnce(&mut AuthState) -> bool) {
        if self.mounted.is_cancelled() {
            return;
        }
        self.state.send_if_modified(f);
    }

    fn sync_loading(&self) {
        let busy = &self.busy;
        self.modify(|s| {
            let loading = busy.any();
            let changed = s.loading != loading;
            s.loading = loading;
            changed
        });
    }

    fn set_error(&self, message: &str) {
        self.modify(|s| {
            s.error = Some(message.to_string());
            true
        });
    }

    fn loading(&self) -> LoadingGuard {
        self.busy.operations.fetch_add(1, Ordering::SeqCst);
        self.sync_loading();
        LoadingGuard {
            publisher: self.clone(),
        }
    }

    /// Registers a session event the caller is about to trigger. Must be taken
    /// before the client call so the listener cannot settle it first.
    fn await_event(&self) -> EventTicket {
        self.busy.awaited_events.fetch_add(1, Ordering::SeqCst);
        self.sync_loading();
        EventTicket {
            publisher: self.clone(),
            armed: true,
        }
    }

    fn settle_event(&self) {
        decrement(&self.busy.awaited_events);
    }

    fn forget_awaited_events(&self) {
        self.busy.awaited_events.store(0, Ordering::SeqCst);
    }
}

/// Keeps `loading` raised for its lifetime and lowers it on every exit path
/// once nothing else is outstanding.
struct LoadingGuard {
    publisher: Publisher,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        decrement(&self.publisher.busy.operations);
        self.publisher.sync_loading();
    }
}

/// An awaited session event. Kept when the client call emitted the event,
/// released on drop otherwise.
struct EventTicket {
    publisher: Publisher,
    armed: bool,
}

impl EventTicket {
    fn keep(mut self) {
        self.armed = false;
    }
}

impl Drop for EventTicket {
    fn drop(&mut self) {
        if self.armed {
            self.publisher.settle_event();
            self.publisher.sync_loading();
        }
    }
}

pub struct SessionReconciler {
    client: Arc<AuthClient>,
    publisher: Publisher,
    listener: Option<JoinHandle<()>>,
}

impl SessionReconciler {
    /// Subscribes to session events, then bootstraps from the current session
    /// in a background task. Must be called inside a tokio runtime.
    pub fn start(client: Arc<AuthClient>, store: Arc<dyn RecordStore>) -> Self {
        let (tx, _rx) = watch::channel(AuthState::initial());
        let publisher = Publisher {
            state: Arc::new(tx),
            mounted: CancellationToken::new(),
            busy: Arc::new(Busy::default()),
        };
        let booting = publisher.loading();
        let events = client.subscribe();
        let listener = tokio::spawn(run_listener(
            client.clone(),
            store,
            publisher.clone(),
            events,
            booting,
        ));

        Self {
            client,
            publisher,
            listener: Some(listener),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.publisher.state.subscribe()
    }

    pub fn current(&self) -> AuthState {
        self.publisher.state.borrow().clone()
    }

    /// Returns once the identity exists. When the provider opens a session
    /// right away, `loading` stays raised until its profile is reconciled.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: Role,
    ) -> Outcome<AuthUser> {
        let _loading = self.publisher.loading();
        let ticket = self.publisher.await_event();
        let payload = SignUpPayload {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
            role: role.to_string(),
        };
        match self.client.sign_up(&payload).await {
            Ok(signup) => {
                if signup.session.is_some() {
                    ticket.keep();
                }
                Ok(signup.user)
            }
            Err(e) => Err(self.fail("sign-up", e)),
        }
    }

    /// Returns as soon as the provider accepts the credentials. The profile is
    /// loaded by the listener afterwards; until then the state reads as
    /// loading with no profile.
    pub async fn sign_in(&self, email: &str, password: &str) -> Outcome<AuthUser> {
        let _loading = self.publisher.loading();
        let ticket = self.publisher.await_event();
        let payload = SignInPayload {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.client.sign_in(&payload).await {
            Ok(session) => {
                ticket.keep();
                Ok(session.user)
            }
            Err(e) => Err(self.fail("sign-in", e)),
        }
    }

    /// State is cleared by the listener when the sign-out event arrives.
    pub async fn sign_out(&self) -> Outcome<()> {
        let _loading = self.publisher.loading();
        let ticket = self.publisher.await_event();
        match self.client.sign_out().await {
            Ok(()) => {
                ticket.keep();
                Ok(())
            }
            Err(e) => Err(self.fail("sign-out", e)),
        }
    }

    /// Swaps the refresh token for a new session. The listener re-reads the
    /// profile on the resulting event.
    pub async fn refresh(&self) -> Outcome<Session> {
        let _loading = self.publisher.loading();
        let ticket = self.publisher.await_event();
        match self.client.refresh().await {
            Ok(session) => {
                ticket.keep();
                Ok(session)
            }
            Err(e) => Err(self.fail("refresh", e)),
        }
    }

    pub fn clear_error(&self) {
        self.publisher.modify(|s| s.error.take().is_some());
    }

    /// Detaches from session events. Updates still in flight are discarded.
    pub async fn stop(mut self) {
        self.publisher.mounted.cancel();
        if let Some(listener) = self.listener.take() {
            let _ = listener.await;
        }
    }

    fn fail(&self, operation: &str, e: crate::error::Error) -> String {
        let message = e.user_message();
        tracing::warn!(operation, error = %e, "session operation failed");
        self.publisher.set_error(&message);
        message
    }
}

impl Drop for SessionReconciler {
    fn drop(&mut self) {
        self.publisher.mounted.cancel();
    }
}

async fn run_listener(
    client: Arc<AuthClient>,
    store: Arc<dyn RecordStore>,
    publisher: Publisher,
    mut events: tokio::sync::broadcast::Receiver<SessionEvent>,
    booting: LoadingGuard,
) {
    tokio::select! {
        _ = publisher.mounted.cancelled() => return,
        _ = bootstrap(&client, store.as_ref(), &publisher) => {}
    }
    drop(booting);

    loop {
        let next = tokio::select! {
            _ = publisher.mounted.cancelled() => break,
            next = events.recv() => next,
        };
        match next {
            Ok(event) => {
                tracing::debug!(kind = ?event.kind, "session event");
                apply_session(event.session, store.as_ref(), &publisher).await;
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "session events lagged, resyncing");
                publisher.forget_awaited_events();
                let current = client.get_session().await;
                apply_session(current, store.as_ref(), &publisher).await;
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn bootstrap(client: &AuthClient, store: &dyn RecordStore, publisher: &Publisher) {
    let Some(session) = client.get_session().await else {
        publisher.publish(AuthState::signed_out());
        return;
    };

    let user = session.user;
    match store.get_profile(user.id).await {
        Ok(Some(profile)) => publisher.publish(AuthState::ready(user, profile)),
        Ok(None) => publisher.publish(AuthState::blocked(user, PROFILE_NOT_FOUND)),
        Err(e) => {
            tracing::error!(user_id = %user.id, error = %e, "profile fetch failed during bootstrap");
            publisher.publish(AuthState::blocked(user, e.user_message()));
        }
    }
}

async fn apply_session(session: Option<Session>, store: &dyn RecordStore, publisher: &Publisher) {
    let Some(session) = session else {
        publisher.settle_event();
        publisher.publish(AuthState::signed_out());
        return;
    };

    let _loading = publisher.loading();
    let user = session.user;
    let next = match reconcile_profile(store, &user).await {
        Ok(profile) => AuthState::ready(user, profile),
        Err(err) => {
            tracing::warn!(user_id = %user.id, error = %err, "profile reconciliation failed");
            AuthState::blocked(user, err.user_message())
        }
    };
    publisher.settle_event();
    publisher.publish(next);
}
