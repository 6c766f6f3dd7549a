use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::session::{AuthApi, Session};

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,
    email: Option<String>,
}

/// GoTrue endpoints used by the session controller.
pub struct GoTrue {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl GoTrue {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            anon_key: anon_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }
}

#[async_trait]
impl AuthApi for GoTrue {
    async fn get_user(&self, access_token: &str) -> Result<Option<Session>> {
        let resp = self
            .http
            .get(self.url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = resp.status();
        // 401/403 is a stale or revoked token, not a failure.
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Ok(None);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Service {
                status: status.as_u16(),
                message,
            });
        }
        let user: UserResponse = resp.json().await?;
        Ok(Some(Session {
            user_id: user.id,
            email: user.email,
            access_token: access_token.to_string(),
        }))
    }

    async fn send_magic_link(&self, email: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.url("otp"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "create_user": true }))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Service {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Service {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}
