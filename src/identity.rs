// ABOUTME: Delegated authentication: verifies provider-issued access tokens
// ABOUTME: The hosted provider asks the auth service who owns the token; demo mode has no provider

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifiedIdentity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_access_token(&self, access_token: &str) -> Result<VerifiedIdentity>;
}

pub struct HostedIdentityProvider {
    client: reqwest::Client,
    project_url: String,
    anon_key: String,
}

impl HostedIdentityProvider {
    pub fn new(project_url: &str, anon_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            project_url: project_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Option<Self> {
        let project_url = config.project_url()?;
        let anon_key = config.supabase_anon_key.as_deref()?;
        Some(Self::new(project_url, anon_key))
    }
}

#[async_trait]
impl IdentityProvider for HostedIdentityProvider {
    async fn verify_access_token(&self, access_token: &str) -> Result<VerifiedIdentity> {
        if access_token.trim().is_empty() {
            return Err(AppError::Unauthorized("Empty access token".to_string()));
        }

        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.project_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AppError::Unauthorized(
                "Access token rejected by identity provider".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Identity provider returned {}",
                status
            )));
        }

        let identity: VerifiedIdentity = response.json().await?;
        tracing::debug!("Identity provider verified user {}", identity.id);
        Ok(identity)
    }
}

/// Used when no hosted project is configured.
pub struct UnconfiguredIdentityProvider;

#[async_trait]
impl IdentityProvider for UnconfiguredIdentityProvider {
    async fn verify_access_token(&self, _access_token: &str) -> Result<VerifiedIdentity> {
        Err(AppError::NotConfigured(
            "Identity provider is not configured".to_string(),
        ))
    }
}
