//! Runtime configuration.
//!
//! A single read-only snapshot is built at startup from an optional TOML
//! file layered under `STANDEE__*` environment variables, then passed to the
//! pipeline builder.

use crate::pipeline::BackendKind;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// File stem used when `STANDEE_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "config/standee";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StandeeConfig {
    pub templates: TemplateConfig,
    pub listings: ListingsConfig,
    pub responses: ResponsesConfig,
    pub render: RenderConfig,
    pub remote: RemoteConfig,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub dir: PathBuf,
    pub name: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("templates"),
            name: "tablestandee.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingsConfig {
    pub path: PathBuf,
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/listings.json"),
        }
    }
}

/// Where quiz responses for analytics reports are read from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResponsesConfig {
    pub path: PathBuf,
}

impl Default for ResponsesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/responses.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Backends in the order they are tried.
    pub backends: Vec<BackendKind>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backends: BackendKind::DEFAULT_ORDER.to_vec(),
        }
    }
}

/// Settings for the remote conversion service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Bearer token. The remote backend reports itself unconfigured without it.
    pub api_key: Option<String>,
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub job_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.cloudconvert.com/v2".to_string(),
            poll_interval_ms: 2000,
            job_timeout_secs: 60,
            request_timeout_secs: 30,
        }
    }
}

impl RemoteConfig {
    /// The API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Outbound mail server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS (usually port 465). When false, STARTTLS is required.
    pub use_ssl: bool,
    /// Sender address, also used as the login name.
    pub email: String,
    pub password: Option<String>,
    /// Operator audit address copied on every outbound message.
    pub bcc: String,
    pub timeout_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtpout.secureserver.net".to_string(),
            port: 465,
            use_ssl: true,
            email: String::new(),
            password: None,
            bcc: String::new(),
            timeout_secs: 30,
        }
    }
}

impl SmtpConfig {
    /// Every missing setting, in a fixed order. Empty when the transport can
    /// be built.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.host.trim().is_empty() {
            issues.push("smtp.host not set".to_string());
        }
        if self.port == 0 {
            issues.push("smtp.port not set".to_string());
        }
        if self.email.trim().is_empty() {
            issues.push("smtp.email not set".to_string());
        }
        if self.password().is_none() {
            issues.push("smtp.password not set".to_string());
        }
        if self.bcc.trim().is_empty() {
            issues.push("smtp.bcc not set".to_string());
        }
        issues
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl StandeeConfig {
    /// Loads the file named by `STANDEE_CONFIG` (or [`DEFAULT_CONFIG_FILE`])
    /// if it exists, then layers environment variables on top.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var("STANDEE_CONFIG")
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&file)
    }

    /// Loads the optional file `file` (a path or stem), then layers
    /// environment variables on top.
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let builder = ::config::Config::builder()
            .add_source(::config::File::with_name(file).required(false))
            .add_source(
                ::config::Environment::with_prefix("STANDEE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("render.backends")
                    .try_parsing(true),
            );

        let config: StandeeConfig = builder.build()?.try_deserialize()?;
        log::debug!("Loaded configuration from '{}' and environment", file);
        Ok(config)
    }

    /// Parses a TOML document. Unset keys keep their defaults.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config = ::config::Config::builder()
            .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = StandeeConfig::default();
        assert_eq!(config.templates.name, "tablestandee.html");
        assert_eq!(config.responses.path, PathBuf::from("data/responses.json"));
        assert_eq!(config.remote.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.remote.job_timeout(), Duration::from_secs(60));
        assert_eq!(config.smtp.port, 465);
        assert!(config.smtp.use_ssl);
        assert_eq!(
            config.render.backends,
            vec![
                BackendKind::Remote,
                BackendKind::Local,
                BackendKind::Vector,
                BackendKind::Markup
            ]
        );
    }

    #[test]
    fn toml_overrides_only_given_keys() {
        let config = StandeeConfig::from_toml(
            r#"
            [render]
            backends = ["vector", "markup"]

            [smtp]
            host = "mail.example.com"
            port = 587
            use_ssl = false
            "#,
        )
        .unwrap();

        assert_eq!(config.render.backends, vec![BackendKind::Vector, BackendKind::Markup]);
        assert_eq!(config.smtp.host, "mail.example.com");
        assert_eq!(config.smtp.port, 587);
        assert!(!config.smtp.use_ssl);
        assert_eq!(config.smtp.timeout_secs, 30);
        assert_eq!(config.remote.base_url, "https://api.cloudconvert.com/v2");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let result = StandeeConfig::from_toml("[render]\nbackends = [\"wkhtmltopdf\"]\n");
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn smtp_issues_lists_every_missing_setting() {
        let smtp = SmtpConfig {
            host: String::new(),
            port: 0,
            ..SmtpConfig::default()
        };
        assert_eq!(
            smtp.issues(),
            vec![
                "smtp.host not set",
                "smtp.port not set",
                "smtp.email not set",
                "smtp.password not set",
                "smtp.bcc not set",
            ]
        );

        let complete = SmtpConfig {
            email: "ops@example.com".into(),
            password: Some("secret".into()),
            bcc: "audit@example.com".into(),
            ..SmtpConfig::default()
        };
        assert!(complete.issues().is_empty());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let remote = RemoteConfig {
            api_key: Some("   ".into()),
            ..RemoteConfig::default()
        };
        assert_eq!(remote.api_key(), None);
    }
}
