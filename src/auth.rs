//! Password-based identity provider.
//!
//! The SDK never keeps a logged-in user around; [`IdentityProvider`] hands
//! out a [`UserSession`] and callers pass it to the portfolio operations.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};

use crate::error::{MarketError, Result};
use crate::models::UserSession;
use crate::store::rest::send;

/// Sign-in, sign-up and sign-out against an external identity service.
pub trait IdentityProvider {
    fn sign_in(&self, email: &str, password: &str) -> Result<UserSession>;

    /// Register a new account.
    ///
    /// Providers that require e-mail confirmation return a session without
    /// an access token.
    fn sign_up(&self, email: &str, password: &str) -> Result<UserSession>;

    fn sign_out(&self, session: &UserSession) -> Result<()>;
}

/// Identity provider for a Supabase-style auth endpoint (`{url}/auth/v1`).
pub struct SupabaseAuth {
    base_url: String,
    api_key: String,
    client: Client,
}

impl SupabaseAuth {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        if base_url.trim().is_empty() || api_key.trim().is_empty() {
            return Err(MarketError::InvalidArgument(
                "auth URL and API key are required".into(),
            ));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    /// Build from `SUPABASE_URL` / `SUPABASE_KEY`.
    pub fn from_env() -> Result<Self> {
        let (url, key) = crate::config::supabase_from_env()?;
        Self::new(&url, &key, crate::config::HTTP_TIMEOUT)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn post_credentials(&self, path: &str, email: &str, password: &str) -> Result<Value> {
        validate_credentials(email, password)?;
        let req = self
            .client
            .post(self.endpoint(path))
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }));
        Ok(send(req, "auth")?.json()?)
    }
}

impl IdentityProvider for SupabaseAuth {
    fn sign_in(&self, email: &str, password: &str) -> Result<UserSession> {
        let body = self.post_credentials("token?grant_type=password", email, password)?;
        let session = session_from_response(&body)?;
        tracing::info!(user_id = %session.user_id, "signed in");
        Ok(session)
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<UserSession> {
        let body = self.post_credentials("signup", email, password)?;
        let session = session_from_response(&body)?;
        tracing::info!(user_id = %session.user_id, "signed up");
        Ok(session)
    }

    fn sign_out(&self, session: &UserSession) -> Result<()> {
        let Some(token) = session.access_token.as_deref() else {
            return Ok(());
        };
        let req = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(token);
        send(req, "auth")?;
        tracing::info!(user_id = %session.user_id, "signed out");
        Ok(())
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if !email.contains('@') {
        return Err(MarketError::InvalidArgument(format!(
            "not an e-mail address: {}",
            email
        )));
    }
    if password.is_empty() {
        return Err(MarketError::InvalidArgument("password must not be empty".into()));
    }
    Ok(())
}

/// Extract the session from a token or sign-up response.
///
/// Token responses nest the user under `user`; sign-up responses without
/// auto-confirmation are the bare user object.
pub fn session_from_response(body: &Value) -> Result<UserSession> {
    let user = body.get("user").filter(|u| u.is_object()).unwrap_or(body);
    let user_id = user
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| MarketError::UpstreamUnavailable("auth response without user id".into()))?;
    let email = user.get("email").and_then(Value::as_str).unwrap_or_default();
    let token = body
        .get("access_token")
        .or_else(|| body.get("session").and_then(|s| s.get("access_token")))
        .and_then(Value::as_str);

    let mut session = UserSession::new(user_id, email);
    if let Some(token) = token {
        session = session.with_access_token(token);
    }
    Ok(session)
}
