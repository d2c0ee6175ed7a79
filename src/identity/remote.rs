use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::provider::{AuthUser, IdentityProvider, Session, SignUp, SignupMetadata};
use crate::error::{Error, Result};

/// Client for the backend's hosted auth REST API.
#[derive(Clone)]
pub struct RemoteIdentity {
    client: Client,
    base: Url,
    anon_key: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    WithSession(Session),
    UserOnly(AuthUser),
}

#[derive(Debug, Default, Deserialize)]
struct ProviderError {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ProviderError {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

impl RemoteIdentity {
    pub fn new(backend_url: &str, anon_key: impl Into<String>, client: Client) -> Result<Self> {
        let mut base = Url::parse(backend_url)
            .map_err(|e| Error::Config(format!("Invalid BACKEND_URL {}: {}", backend_url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client,
            base,
            anon_key: anon_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::Internal(format!("bad auth endpoint {}: {}", path, e)))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = req.header("apikey", &self.anon_key).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderError>(&body)
            .ok()
            .and_then(ProviderError::into_message)
            .unwrap_or_else(|| format!("Authentication service returned {}", status));
        tracing::warn!(status = %status, message = %message, "identity provider rejected request");
        Err(Error::Identity(message))
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentity {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> Result<SignUp> {
        let req = self
            .client
            .post(self.endpoint("auth/v1/signup")?)
            .json(&json!({ "email": email, "password": password, "data": metadata }));
        let signup = match self.send::<SignUpResponse>(req).await? {
            SignUpResponse::WithSession(session) => SignUp {
                user: session.user.clone(),
                session: Some(session),
            },
            SignUpResponse::UserOnly(user) => SignUp {
                user,
                session: None,
            },
        };
        Ok(signup)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let req = self
            .client
            .post(url)
            .json(&json!({ "email": email, "password": password }));
        self.send(req).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let req = self
            .client
            .post(self.endpoint("auth/v1/logout")?)
            .bearer_auth(access_token)
            .header("apikey", &self.anon_key);
        let resp = req.send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Error::Identity(format!(
                "Sign out failed with status {}",
                resp.status()
            )))
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "refresh_token");
        let req = self
            .client
            .post(url)
            .json(&json!({ "refresh_token": refresh_token }));
        self.send(req).await
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser> {
        let req = self
            .client
            .get(self.endpoint("auth/v1/user")?)
            .bearer_auth(access_token);
        self.send(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_base_path() {
        let id = RemoteIdentity::new("https://abc.example.co/base", "anon", Client::new()).unwrap();
        assert_eq!(
            id.endpoint("auth/v1/signup").unwrap().as_str(),
            "https://abc.example.co/base/auth/v1/signup"
        );

        let id = RemoteIdentity::new("https://abc.example.co", "anon", Client::new()).unwrap();
        assert_eq!(
            id.endpoint("auth/v1/user").unwrap().as_str(),
            "https://abc.example.co/auth/v1/user"
        );
    }

    #[test]
    fn bad_backend_url_is_a_config_error() {
        assert!(matches!(
            RemoteIdentity::new("not a url", "anon", Client::new()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn provider_error_prefers_description() {
        let err: ProviderError = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(err.into_message().as_deref(), Some("Invalid login credentials"));
    }

    #[test]
    fn signup_response_with_or_without_session() {
        let user = r#"{"id":"2f0b7c1e-4a5d-4a8e-9f6f-0c1d2e3f4a5b","email":"a@b.co","user_metadata":{}}"#;
        let parsed: SignUpResponse = serde_json::from_str(user).unwrap();
        assert!(matches!(parsed, SignUpResponse::UserOnly(_)));

        let with_session = format!(
            r#"{{"access_token":"t","refresh_token":"r","expires_in":3600,"token_type":"bearer","user":{}}}"#,
            user
        );
        let parsed: SignUpResponse = serde_json::from_str(&with_session).unwrap();
        assert!(matches!(parsed, SignUpResponse::WithSession(_)));
    }
}
