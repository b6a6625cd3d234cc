// Configuration loading: file values plus environment overrides

use anyhow::Result;
use prepwise_session::Config;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
[service]
name = "prepwise-test"

[service.http]
bind = "0.0.0.0"
port = 8088

[livekit]
api_key = "file-key"
ws_url = "wss://file.example"

[app]
home_path = "/dashboard"

[[auth.sessions]]
token = "s-1"
user_id = "user-ada"
user_name = "Ada"
"#;

fn write_config(dir: &TempDir) -> Result<String> {
    let path = dir.path().join("prepwise.toml");
    fs::write(&path, CONFIG)?;
    Ok(dir.path().join("prepwise").to_string_lossy().into_owned())
}

#[test]
fn test_file_values_are_loaded() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir)?;

    let cfg = Config::load_with_env(&path, |_| None)?;

    assert_eq!(cfg.service.name, "prepwise-test");
    assert_eq!(cfg.service.http.port, 8088);
    assert_eq!(cfg.livekit.api_key.as_deref(), Some("file-key"));
    assert!(cfg.livekit.api_secret.is_none());
    assert_eq!(cfg.livekit_url().as_deref(), Some("wss://file.example"));
    assert_eq!(cfg.app.home_path, "/dashboard");
    assert_eq!(cfg.app.sign_in_path, "/sign-in");
    assert_eq!(cfg.auth.sessions.len(), 1);
    assert_eq!(cfg.auth.sessions[0].user_name, "Ada");

    Ok(())
}

#[test]
fn test_environment_overrides_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir)?;

    let env: HashMap<&str, &str> = HashMap::from([
        ("LIVEKIT_API_KEY", "env-key"),
        ("LIVEKIT_API_SECRET", "env-secret"),
        ("LIVEKIT_URL", "wss://fallback.example"),
        ("NEXT_PUBLIC_LIVEKIT_URL", "wss://public.example"),
        ("APP_BASE_URL", "https://prepwise.example"),
        ("LIVEKIT_AGENT_NAME", "Coach Test"),
    ]);

    let cfg = Config::load_with_env(&path, |k| env.get(k).map(|v| v.to_string()))?;

    assert_eq!(cfg.livekit.api_key.as_deref(), Some("env-key"));
    assert_eq!(cfg.livekit.api_secret.as_deref(), Some("env-secret"));
    assert_eq!(cfg.livekit_url().as_deref(), Some("wss://public.example"));
    assert_eq!(cfg.app.base_url, "https://prepwise.example");
    assert_eq!(cfg.agent.name, "Coach Test");

    Ok(())
}
