use serde::Serialize;

use super::viewer::Viewer;
use crate::identity::AuthUser;
use crate::models::profile::Profile;

/// Snapshot published to every consumer of the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub profile: Option<Profile>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    pub fn initial() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn ready(user: AuthUser, profile: Profile) -> Self {
        Self {
            user: Some(user),
            profile: Some(profile),
            loading: false,
            error: None,
        }
    }

    /// Signed in but without a usable profile.
    pub fn blocked(user: AuthUser, error: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            profile: None,
            loading: false,
            error: Some(error.into()),
        }
    }

    pub fn viewer(&self) -> Option<Viewer> {
        self.profile.clone().map(Viewer::from)
    }
}
