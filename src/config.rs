use anyhow::Result;
use serde::Deserialize;

/// Environment variables consulted for the LiveKit server address, first non-empty wins
pub const LIVEKIT_URL_VARS: [&str; 3] = [
    "NEXT_PUBLIC_LIVEKIT_WS_URL",
    "NEXT_PUBLIC_LIVEKIT_URL",
    "LIVEKIT_URL",
];

/// Environment variables consulted for the application base URL
pub const BASE_URL_VARS: [&str; 3] = ["NEXT_PUBLIC_BASE_URL", "APP_BASE_URL", "BASE_URL"];

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_AGENT_NAME: &str = "Prepwise Coach";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub livekit: LiveKitConfig,
    pub app: AppConfig,
    pub agent: AgentConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "prepwise-session".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// LiveKit credentials and server address.
///
/// Every field is optional here: a missing secret is reported by the token
/// service at request time, a missing URL by the session launcher.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LiveKitConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub ws_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Public base URL of the web application
    pub base_url: String,
    /// Where users land after a session ends or a record is missing
    pub home_path: String,
    /// Where unauthenticated users are sent
    pub sign_in_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            home_path: "/".to_string(),
            sign_in_path: "/sign-in".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub name: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_AGENT_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Pre-provisioned sign-in sessions for the in-memory user directory
    pub sessions: Vec<SessionSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSeed {
    pub token: String,
    pub user_id: String,
    pub user_name: String,
}

impl Config {
    /// Load `.env.local` / `.env`, the optional config file, then environment overrides
    pub fn load(path: &str) -> Result<Self> {
        // .env.local wins over .env, matching the web app's convention
        let _ = dotenvy::from_filename_override(".env.local");
        let _ = dotenvy::dotenv();

        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Load the config file and apply overrides from `lookup` instead of the process environment
    pub fn load_with_env<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .set_override_option("livekit.api_key", non_empty(lookup("LIVEKIT_API_KEY")))?
            .set_override_option(
                "livekit.api_secret",
                non_empty(lookup("LIVEKIT_API_SECRET")),
            )?
            .set_override_option("livekit.ws_url", first_defined(&LIVEKIT_URL_VARS, &lookup))?
            .set_override_option("app.base_url", first_defined(&BASE_URL_VARS, &lookup))?
            .set_override_option("agent.name", non_empty(lookup("LIVEKIT_AGENT_NAME")))?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// LiveKit server address handed to the session launcher
    pub fn livekit_url(&self) -> Option<String> {
        non_empty(self.livekit.ws_url.clone())
    }
}

/// Return the value of the first variable in `keys` that is set and non-empty
pub fn first_defined<F>(keys: &[&str], lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter().find_map(|key| non_empty(lookup(key)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_defined_prefers_earlier_keys() {
        let vars = env(&[
            ("NEXT_PUBLIC_LIVEKIT_URL", "wss://second.example"),
            ("LIVEKIT_URL", "wss://third.example"),
        ]);
        let lookup = |k: &str| vars.get(k).cloned();

        assert_eq!(
            first_defined(&LIVEKIT_URL_VARS, &lookup).as_deref(),
            Some("wss://second.example")
        );
    }

    #[test]
    fn test_first_defined_skips_empty_values() {
        let vars = env(&[("NEXT_PUBLIC_LIVEKIT_WS_URL", ""), ("LIVEKIT_URL", "wss://x")]);
        let lookup = |k: &str| vars.get(k).cloned();

        assert_eq!(first_defined(&LIVEKIT_URL_VARS, &lookup).as_deref(), Some("wss://x"));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let cfg = Config::load_with_env("does/not/exist/prepwise", |_| None).unwrap();

        assert_eq!(cfg.service.http.port, 3000);
        assert_eq!(cfg.app.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.agent.name, DEFAULT_AGENT_NAME);
        assert!(cfg.livekit.api_key.is_none());
        assert!(cfg.livekit_url().is_none());
    }
}
