use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::profile::{NewProfile, Role};

/// Display name and role captured at sign-up and stored with the identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignupMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: SignupMetadata,
}

impl AuthUser {
    /// Profile row derivable from the signup metadata, if it carries both a
    /// non-blank name and a known role.
    pub fn profile_from_metadata(&self) -> Option<NewProfile> {
        let full_name = self
            .user_metadata
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())?;
        let role: Role = self.user_metadata.role.as_deref()?.parse().ok()?;
        Some(NewProfile {
            id: self.id,
            email: self.email.clone().unwrap_or_default(),
            role,
            full_name: full_name.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

/// Result of a sign-up. `session` is absent when the provider requires the
/// address to be confirmed before the first sign-in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignUp {
    pub user: AuthUser,
    pub session: Option<Session>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> Result<SignUp>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    async fn sign_out(&self, access_token: &str) -> Result<()>;

    async fn refresh(&self, refresh_token: &str) -> Result<Session>;

    async fn get_user(&self, access_token: &str) -> Result<AuthUser>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(full_name: Option<&str>, role: Option<&str>) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: Some("grace@example.com".into()),
            user_metadata: SignupMetadata {
                full_name: full_name.map(Into::into),
                role: role.map(Into::into),
            },
        }
    }

    #[test]
    fn metadata_with_name_and_role_yields_profile() {
        let u = user(Some(" Grace Hopper "), Some("admin"));
        let profile = u.profile_from_metadata().unwrap();
        assert_eq!(profile.id, u.id);
        assert_eq!(profile.full_name, "Grace Hopper");
        assert_eq!(profile.role, Role::Admin);
    }

    #[test]
    fn insufficient_metadata_yields_nothing() {
        assert!(user(None, Some("student")).profile_from_metadata().is_none());
        assert!(user(Some("Grace"), None).profile_from_metadata().is_none());
        assert!(user(Some("  "), Some("student")).profile_from_metadata().is_none());
        assert!(user(Some("Grace"), Some("owner")).profile_from_metadata().is_none());
    }

    #[test]
    fn provider_user_json_parses() {
        let raw = r#"{
            "id": "2f0b7c1e-4a5d-4a8e-9f6f-0c1d2e3f4a5b",
            "aud": "authenticated",
            "email": "grace@example.com",
            "user_metadata": {"full_name": "Grace", "role": "student"}
        }"#;
        let u: AuthUser = serde_json::from_str(raw).unwrap();
        assert_eq!(u.user_metadata.role.as_deref(), Some("student"));
    }
}
