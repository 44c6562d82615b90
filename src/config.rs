//! Load and validate runtime configuration.
//!
//! Non-secret settings come from an optional YAML file; the API secret and
//! account id always come from the environment (after `.env`).

use serde::Deserialize;
use std::{fs, path::Path};
use tracing::info;

use crate::error::PageError;

pub const SECRET_VAR: &str = "PUBLIC_SECRET";
pub const ACCOUNT_VAR: &str = "PORTFOLIO_ID";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiCfg {
    pub base_url: String,
    pub token_validity_minutes: u32,
    pub request_timeout_sec: u64,
}

impl Default for ApiCfg {
    fn default() -> Self {
        Self {
            base_url: "https://api.public.com".to_string(),
            token_validity_minutes: 120,
            request_timeout_sec: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputCfg {
    pub path: String,
    pub favicon: String,
}

impl Default for OutputCfg {
    fn default() -> Self {
        Self {
            path: "index.html".to_string(),
            favicon: "mdd.PNG".to_string(),
        }
    }
}

/// Secret + account id. Never printed.
#[derive(Clone, Default)]
pub struct Credentials {
    secret: String,
    account_id: String,
}

impl Credentials {
    pub fn new(secret: Option<String>, account_id: Option<String>) -> Result<Self, PageError> {
        let secret = secret
            .filter(|s| !s.trim().is_empty())
            .ok_or(PageError::MissingSecret)?;
        let account_id = account_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(PageError::MissingAccountId)?;
        Ok(Self { secret, account_id })
    }

    pub fn from_env() -> Result<Self, PageError> {
        Self::new(
            std::env::var(SECRET_VAR).ok(),
            std::env::var(ACCOUNT_VAR).ok(),
        )
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("secret", &"<redacted>")
            .field("account_id", &crate::utils::mask_secret(&self.account_id))
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiCfg,
    pub output: OutputCfg,
    #[serde(skip)]
    pub credentials: Credentials,
}

impl AppConfig {
    /// Read YAML settings if the file exists, defaults otherwise.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path)?;
        Self::from_yaml(&s)
    }

    pub fn from_yaml(s: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_yaml::from_str(s)?;
        if cfg.api.token_validity_minutes == 0 {
            return Err(PageError::InvalidValidity(0).into());
        }
        Ok(cfg)
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg = AppConfig::from_yaml("output:\n  path: site/index.html\n").unwrap();
        assert_eq!(cfg.output.path, "site/index.html");
        assert_eq!(cfg.output.favicon, "mdd.PNG");
        assert_eq!(cfg.api.base_url, "https://api.public.com");
        assert_eq!(cfg.api.token_validity_minutes, 120);
        assert_eq!(cfg.api.request_timeout_sec, 30);
    }

    #[test]
    fn zero_validity_rejected() {
        let err = AppConfig::from_yaml("api:\n  token_validity_minutes: 0\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PageError>(),
            Some(PageError::InvalidValidity(0))
        ));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = AppConfig::load("/nonexistent/dir/config.yaml").unwrap();
        assert_eq!(cfg.output.path, "index.html");
    }

    #[test]
    fn empty_secret_is_config_error() {
        assert!(matches!(
            Credentials::new(None, Some("acct".into())),
            Err(PageError::MissingSecret)
        ));
        assert!(matches!(
            Credentials::new(Some("   ".into()), Some("acct".into())),
            Err(PageError::MissingSecret)
        ));
        assert!(matches!(
            Credentials::new(Some("s".into()), Some("".into())),
            Err(PageError::MissingAccountId)
        ));
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let c = Credentials::new(Some("topsecret".into()), Some("5OPEN123".into())).unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("topsecret"));
        assert_eq!(c.account_id(), "5OPEN123");
    }
}
