use config::{Config, ConfigError, Environment, File, Map};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

pub const DEFAULT_PROVIDER_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub relay: RelayConfig,
    pub cors: CorsConfig,
    pub form: FormConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Email provider endpoint and identifiers.
///
/// The identifiers are optional at boot so the server can come up without
/// them; they are resolved and checked on every relay request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub endpoint: String,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStatus {
    /// Every failure answers 500.
    Collapsed,
    /// Configuration errors answer 500, provider errors 502 and an
    /// unreachable provider 503.
    Classified,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub failure_status: FailureStatus,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// A list in files, a comma-separated string in the environment.
    #[serde(deserialize_with = "list_or_csv")]
    pub allowed_origins: Vec<String>,
}

fn list_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrCsv {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match ListOrCsv::deserialize(deserializer)? {
        ListOrCsv::List(list) => list,
        ListOrCsv::Csv(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// Settings for the client-side form controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub relay_url: String,
    pub feedback_window_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
            relay: RelayConfig::default(),
            cors: CorsConfig::default(),
            form: FormConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PROVIDER_ENDPOINT.to_string(),
            service_id: None,
            template_id: None,
            public_key: None,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            failure_status: FailureStatus::Collapsed,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            relay_url: "http://127.0.0.1:3000/contact".to_string(),
            feedback_window_ms: 5000,
        }
    }
}

impl ProviderConfig {
    pub fn is_configured(&self) -> bool {
        [&self.service_id, &self.template_id, &self.public_key]
            .iter()
            .all(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("config.toml"))
    }

    /// Defaults, then `path` if it exists, then `APP_*` environment variables
    /// (`APP_PROVIDER__SERVICE_ID`, `APP_SERVER__PORT`, ...).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_layered(path, None)
    }

    /// `env` replaces the process environment when given. Values stay
    /// strings until deserialized, so identifiers such as `00123` keep
    /// their exact text.
    fn load_layered(path: &Path, env: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .source(env),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if !is_http_url(&self.provider.endpoint) {
            return Err(ConfigError::Message(format!(
                "Provider endpoint is not an http(s) URL: {}",
                self.provider.endpoint
            )));
        }

        if self.relay.max_body_bytes == 0 {
            return Err(ConfigError::Message(
                "Relay max body size must be greater than 0".to_string(),
            ));
        }

        if !is_http_url(&self.form.relay_url) {
            return Err(ConfigError::Message(format!(
                "Form relay URL is not an http(s) URL: {}",
                self.form.relay_url
            )));
        }

        if self.form.feedback_window_ms == 0 {
            return Err(ConfigError::Message(
                "Feedback window must be greater than 0".to_string(),
            ));
        }

        if !self.provider.is_configured() {
            tracing::warn!(
                "Email provider identifiers are incomplete - contact submissions will fail"
            );
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn is_http_url(raw: &str) -> bool {
    url::Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
