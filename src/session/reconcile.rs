use crate::error::Error;
use crate::gateway::RecordStore;
use crate::identity::AuthUser;
use crate::models::profile::Profile;

pub const PROFILE_NOT_FOUND: &str = "Profile not found";
pub const CONTACT_SUPPORT: &str =
    "Your account profile could not be set up. Please contact support.";

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("failed to load profile: {0}")]
    Fetch(#[source] Error),

    #[error("signup metadata has no usable name and role")]
    MissingMetadata,

    #[error("failed to create profile: {0}")]
    CreateFailed(#[source] Error),
}

impl ReconcileError {
    pub fn user_message(&self) -> String {
        match self {
            ReconcileError::Fetch(e) => e.user_message(),
            ReconcileError::MissingMetadata | ReconcileError::CreateFailed(_) => {
                CONTACT_SUPPORT.to_string()
            }
        }
    }
}

/// Makes sure `user` has a profile row, creating it from the signup metadata
/// when absent. Creation is an upsert keyed by the identity id, so two
/// concurrent calls both end up with the same row. Failures are terminal for
/// this attempt; nothing here retries.
pub async fn reconcile_profile(
    store: &dyn RecordStore,
    user: &AuthUser,
) -> Result<Profile, ReconcileError> {
    if let Some(profile) = store.get_profile(user.id).await.map_err(ReconcileError::Fetch)? {
        return Ok(profile);
    }

    let Some(new_profile) = user.profile_from_metadata() else {
        tracing::warn!(user_id = %user.id, "no profile and no usable signup metadata");
        return Err(ReconcileError::MissingMetadata);
    };

    match store.upsert_profile(new_profile).await {
        Ok(profile) => {
            tracing::info!(user_id = %user.id, role = %profile.role, "profile created from signup metadata");
            Ok(profile)
        }
        Err(e) => {
            tracing::error!(user_id = %user.id, error = %e, "profile creation failed");
            Err(ReconcileError::CreateFailed(e))
        }
    }
}
