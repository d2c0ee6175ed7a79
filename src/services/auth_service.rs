use std::sync::Arc;

use validator::Validate;

use crate::dto::auth_dto::{SignInPayload, SignUpPayload};
use crate::error::{Error, Result};
use crate::gateway::RecordStore;
use crate::identity::{AuthUser, IdentityProvider, Session, SignUp, SignupMetadata};
use crate::session::reconcile::{reconcile_profile, ReconcileError};
use crate::session::viewer::Viewer;

#[derive(Clone)]
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn RecordStore>,
}

impl AuthService {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn RecordStore>) -> Self {
        Self { identity, store }
    }

    /// Creates the identity with name and role as metadata, then tries to
    /// create the profile right away. A failed profile write does not fail the
    /// sign-up: the next session reconciliation creates it from the metadata.
    pub async fn sign_up(&self, payload: &SignUpPayload) -> Result<SignUp> {
        payload.validate()?;
        let metadata = SignupMetadata {
            full_name: Some(payload.full_name.trim().to_string()),
            role: Some(payload.role.trim().to_ascii_lowercase()),
        };
        let signup = self
            .identity
            .sign_up(payload.email.trim(), &payload.password, metadata)
            .await?;
        tracing::info!(user_id = %signup.user.id, "identity created");

        match signup.user.profile_from_metadata() {
            Some(profile) => {
                if let Err(e) = self.store.upsert_profile(profile).await {
                    tracing::warn!(
                        user_id = %signup.user.id,
                        error = %e,
                        "profile creation after sign-up failed; reconciliation will retry on next session"
                    );
                }
            }
            None => tracing::warn!(user_id = %signup.user.id, "sign-up metadata incomplete"),
        }

        Ok(signup)
    }

    pub async fn sign_in(&self, payload: &SignInPayload) -> Result<Session> {
        payload.validate()?;
        self.identity
            .sign_in(payload.email.trim(), &payload.password)
            .await
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        self.identity.sign_out(access_token).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<Session> {
        self.identity.refresh(refresh_token).await
    }

    /// Ensures the profile exists and picks the role-scoped viewer.
    pub async fn resolve_viewer(&self, user: &AuthUser) -> Result<Viewer> {
        match reconcile_profile(self.store.as_ref(), user).await {
            Ok(profile) => Ok(Viewer::from(profile)),
            Err(ReconcileError::Fetch(e)) => Err(e),
            Err(err) => Err(Error::Forbidden(err.user_message())),
        }
    }
}
