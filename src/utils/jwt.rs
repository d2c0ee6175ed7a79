use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::identity::{AuthUser, SignupMetadata};

/// Claims carried by the backend's access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub user_metadata: SignupMetadata,
}

impl Claims {
    pub fn to_user(&self) -> Result<AuthUser> {
        let id = Uuid::parse_str(&self.sub)
            .map_err(|_| Error::Unauthorized("invalid_subject".into()))?;
        Ok(AuthUser {
            id,
            email: self.email.clone(),
            user_metadata: self.user_metadata.clone(),
        })
    }
}

pub fn encode_access_token(user: &AuthUser, secret: &str, ttl_secs: i64) -> Result<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        exp: (now + ttl_secs) as usize,
        iat: now as usize,
        email: user.email.clone(),
        role: Some("authenticated".to_string()),
        user_metadata: user.user_metadata.clone(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("token encoding failed: {}", e)))
}

pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    // Backend tokens carry an audience the verifier does not pin.
    validation.validate_aud = false;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| Error::Unauthorized("invalid_token".into()))
}
