use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::provider::{AuthUser, IdentityProvider, Session, SignUp, SignupMetadata};
use crate::error::{Error, Result};
use crate::utils::{crypto, jwt, token};

const ACCESS_TOKEN_TTL_SECS: i64 = 3600;
const REFRESH_TOKEN_LENGTH: usize = 40;

struct Account {
    user: AuthUser,
    password_hash: String,
}

#[derive(Default)]
struct Accounts {
    by_email: HashMap<String, Account>,
    refresh_tokens: HashMap<String, Uuid>,
}

/// In-process identity provider issuing HS256 access tokens in the same shape
/// as the hosted provider. Used by the test suite and for local runs.
pub struct MemoryIdentity {
    jwt_secret: String,
    accounts: RwLock<Accounts>,
}

impl MemoryIdentity {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            accounts: RwLock::new(Accounts::default()),
        }
    }

    fn issue_session(&self, accounts: &mut Accounts, user: &AuthUser) -> Result<Session> {
        let access_token = jwt::encode_access_token(user, &self.jwt_secret, ACCESS_TOKEN_TTL_SECS)?;
        let refresh_token = token::generate_access_token(REFRESH_TOKEN_LENGTH);
        accounts
            .refresh_tokens
            .insert(refresh_token.clone(), user.id);
        Ok(Session {
            access_token,
            refresh_token,
            expires_in: ACCESS_TOKEN_TTL_SECS,
            expires_at: Some(Utc::now().timestamp() + ACCESS_TOKEN_TTL_SECS),
            user: user.clone(),
        })
    }

    fn find_by_id<'a>(accounts: &'a Accounts, id: Uuid) -> Option<&'a Account> {
        accounts.by_email.values().find(|a| a.user.id == id)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> Result<SignUp> {
        let email = normalize_email(email);
        let password_hash = crypto::hash_password(password)?;

        let mut accounts = self.accounts.write().await;
        if accounts.by_email.contains_key(&email) {
            return Err(Error::Identity("User already registered".into()));
        }
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: Some(email.clone()),
            user_metadata: metadata,
        };
        accounts.by_email.insert(
            email,
            Account {
                user: user.clone(),
                password_hash,
            },
        );
        let session = self.issue_session(&mut accounts, &user)?;
        Ok(SignUp {
            user,
            session: Some(session),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let mut accounts = self.accounts.write().await;
        let user = match accounts.by_email.get(&normalize_email(email)) {
            Some(account) if crypto::verify_password(password, &account.password_hash) => {
                account.user.clone()
            }
            _ => return Err(Error::Identity("Invalid login credentials".into())),
        };
        self.issue_session(&mut accounts, &user)
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let claims = jwt::decode_access_token(access_token, &self.jwt_secret)?;
        let user = claims.to_user()?;
        let mut accounts = self.accounts.write().await;
        accounts.refresh_tokens.retain(|_, owner| *owner != user.id);
        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session> {
        let mut accounts = self.accounts.write().await;
        let Some(owner) = accounts.refresh_tokens.remove(refresh_token) else {
            return Err(Error::Identity("Invalid Refresh Token".into()));
        };
        let user = Self::find_by_id(&accounts, owner)
            .map(|a| a.user.clone())
            .ok_or_else(|| Error::Identity("User not found".into()))?;
        self.issue_session(&mut accounts, &user)
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser> {
        let claims = jwt::decode_access_token(access_token, &self.jwt_secret)?;
        let id = claims.to_user()?.id;
        let accounts = self.accounts.read().await;
        Self::find_by_id(&accounts, id)
            .map(|a| a.user.clone())
            .ok_or_else(|| Error::Unauthorized("User not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> SignupMetadata {
        SignupMetadata {
            full_name: Some("Linus".into()),
            role: Some("student".into()),
        }
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let idp = MemoryIdentity::new("secret");
        let signup = idp
            .sign_up("Linus@Example.com", "penguin1", metadata())
            .await
            .unwrap();
        assert!(signup.session.is_some());

        let session = idp.sign_in("linus@example.com", "penguin1").await.unwrap();
        assert_eq!(session.user.id, signup.user.id);
        let me = idp.get_user(&session.access_token).await.unwrap();
        assert_eq!(me.user_metadata, metadata());
    }

    #[tokio::test]
    async fn duplicate_email_and_bad_password_are_rejected() {
        let idp = MemoryIdentity::new("secret");
        idp.sign_up("a@b.co", "secret1", metadata()).await.unwrap();
        assert!(matches!(
            idp.sign_up("a@b.co", "secret2", metadata()).await,
            Err(Error::Identity(_))
        ));
        assert!(matches!(
            idp.sign_in("a@b.co", "wrong").await,
            Err(Error::Identity(_))
        ));
    }

    #[tokio::test]
    async fn sign_out_revokes_refresh_tokens() {
        let idp = MemoryIdentity::new("secret");
        let session = idp
            .sign_up("a@b.co", "secret1", metadata())
            .await
            .unwrap()
            .session
            .unwrap();
        let refreshed = idp.refresh(&session.refresh_token).await.unwrap();
        assert!(idp.refresh(&session.refresh_token).await.is_err());

        idp.sign_out(&refreshed.access_token).await.unwrap();
        assert!(idp.refresh(&refreshed.refresh_token).await.is_err());
    }
}
