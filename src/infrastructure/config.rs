use crate::domain::error::AsideError;
use crate::domain::query::Datasource;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

const PROFILE_VAR: &str = "ASIDE_PROFILE";

#[derive(Debug, Deserialize, Clone)]
pub struct AsideConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub aside: AsideSettings,
    #[serde(default)]
    pub resources: ResourceSettings,
    /// Raw tokens handed over by the host environment
    #[serde(default)]
    pub env_tokens: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: u64,
    pub chart_id: u32,
    pub datasource_id: u32,
    pub datasource_type: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            host: None,
            username: None,
            password: None,
            timeout_secs: 5,
            chart_id: 6,
            datasource_id: 2,
            datasource_type: "table".to_string(),
        }
    }
}

// Keeps the password out of logs
impl std::fmt::Debug for DashboardSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardSettings")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("chart_id", &self.chart_id)
            .field("datasource_id", &self.datasource_id)
            .field("datasource_type", &self.datasource_type)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DashboardCredentials {
    pub host: String,
    pub username: String,
    pub password: String,
}

impl DashboardSettings {
    /// Host with any trailing slash removed, empty when unset
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or_default().trim_end_matches('/')
    }

    pub fn credentials(&self) -> Result<DashboardCredentials, AsideError> {
        fn required(value: &Option<String>, name: &str) -> Result<String, AsideError> {
            match value.as_deref().map(str::trim) {
                Some(v) if !v.is_empty() => Ok(v.to_string()),
                _ => Err(AsideError::Configuration(format!("dashboard.{name} is not set"))),
            }
        }

        Ok(DashboardCredentials {
            host: required(&self.host, "host")?.trim_end_matches('/').to_string(),
            username: required(&self.username, "username")?,
            password: required(&self.password, "password")?,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn datasource(&self) -> Datasource {
        Datasource {
            id: self.datasource_id,
            kind: self.datasource_type.clone(),
        }
    }
}

/// Live queries the dashboard server, stub only renders its host
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AsideMode {
    #[default]
    Live,
    Stub,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AsideSettings {
    #[serde(default)]
    pub mode: AsideMode,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ResourceSettings {
    pub static_root: PathBuf,
    pub public_url: String,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            static_root: PathBuf::from("static"),
            public_url: "/static".to_string(),
        }
    }
}

/// Settings the host platform passes through its environment tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSettings {
    pub dummy_settings: String,
}

/// Environment overrides arrive lowercased and win over the file's upper-case token
fn env_token<'a>(env_tokens: &'a HashMap<String, String>, name: &str) -> Option<&'a String> {
    env_tokens
        .get(&name.to_ascii_lowercase())
        .or_else(|| env_tokens.get(name))
}

pub fn plugin_settings(env_tokens: &HashMap<String, String>) -> PluginSettings {
    PluginSettings {
        dummy_settings: env_token(env_tokens, "DUMMY_SETTING")
            .cloned()
            .unwrap_or_default(),
    }
}

/// Layered load: `config/aside`, then `config/aside.{ASIDE_PROFILE}`, then `ASIDE__*` env vars
pub fn load_aside_config() -> anyhow::Result<AsideConfig> {
    let profile = std::env::var(PROFILE_VAR).unwrap_or_else(|_| "common".to_string());

    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/aside"))
        .add_source(config::File::with_name(&format!("config/aside.{profile}")).required(false))
        .add_source(
            config::Environment::with_prefix("ASIDE")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    tracing::debug!(profile = %profile, "loaded aside configuration");
    Ok(settings.try_deserialize()?)
}
