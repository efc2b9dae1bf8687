// ABOUTME: Application configuration loaded from environment variables and .env files
// ABOUTME: Decides whether the hosted database/auth/storage project is usable or demo mode applies

use serde::Deserialize;

const PLACEHOLDER_URL: &str = "https://placeholder.supabase.co";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Relational database. Falls back to an in-memory SQLite database in demo mode.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Hosted auth/storage project, e.g. https://abc.supabase.co
    #[serde(default)]
    pub supabase_url: Option<String>,

    #[serde(default)]
    pub supabase_anon_key: Option<String>,

    #[serde(default)]
    pub supabase_service_role_key: Option<String>,

    #[serde(default)]
    pub secure_cookies: bool,

    #[serde(default = "default_session_max_age")]
    pub session_max_age_secs: i64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_max_age() -> i64 {
    24 * 60 * 60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            supabase_url: None,
            supabase_anon_key: None,
            supabase_service_role_key: None,
            secure_cookies: false,
            session_max_age_secs: default_session_max_age(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = ::config::Config::builder()
            .add_source(::config::Environment::default().try_parsing(true))
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        Ok(app_config)
    }

    /// The hosted project is usable only with a real project URL and a plausible anon key.
    pub fn has_valid_project(&self) -> bool {
        let url = self.supabase_url.as_deref().unwrap_or(PLACEHOLDER_URL);
        let key = self.supabase_anon_key.as_deref().unwrap_or("");

        url != PLACEHOLDER_URL && url.contains("supabase.co") && key.len() > 20
    }

    pub fn is_demo_mode(&self) -> bool {
        !self.has_valid_project()
    }

    pub fn project_url(&self) -> Option<&str> {
        if self.has_valid_project() {
            self.supabase_url.as_deref().map(|url| url.trim_end_matches('/'))
        } else {
            None
        }
    }

    /// Service role key when present, anon key otherwise.
    pub fn storage_key(&self) -> Option<&str> {
        self.supabase_service_role_key
            .as_deref()
            .or(self.supabase_anon_key.as_deref())
    }

    pub fn database_url_or_demo(&self) -> &str {
        self.database_url.as_deref().unwrap_or("sqlite::memory:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> AppConfig {
        AppConfig {
            database_url: Some("postgres://localhost/paylink".to_string()),
            supabase_url: Some("https://abcdefgh.supabase.co/".to_string()),
            supabase_anon_key: Some("a".repeat(40)),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_defaults_are_demo_mode() {
        let config = AppConfig::default();
        assert!(config.is_demo_mode());
        assert!(!config.has_valid_project());
        assert_eq!(config.database_url_or_demo(), "sqlite::memory:");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_valid_project() {
        let config = configured();
        assert!(config.has_valid_project());
        assert!(!config.is_demo_mode());
        assert_eq!(config.project_url(), Some("https://abcdefgh.supabase.co"));
    }

    #[test]
    fn test_short_key_is_not_configured() {
        let config = AppConfig {
            supabase_anon_key: Some("short".to_string()),
            ..configured()
        };
        assert!(!config.has_valid_project());
        assert!(config.project_url().is_none());
    }

    #[test]
    fn test_placeholder_url_is_not_configured() {
        let config = AppConfig {
            supabase_url: Some(PLACEHOLDER_URL.to_string()),
            ..configured()
        };
        assert!(config.is_demo_mode());
    }

    #[test]
    fn test_storage_key_prefers_service_role() {
        let mut config = configured();
        assert_eq!(config.storage_key(), config.supabase_anon_key.as_deref());

        config.supabase_service_role_key = Some("service".to_string());
        assert_eq!(config.storage_key(), Some("service"));
    }
}
