//! User settings stored as settings.json in the app data directory

use crate::constants::DEFAULT_SERVER_URL;
use crate::strategy::StrategyKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Server
    pub server_url: String,
    pub api_key: String,
    /// Explicit time endpoint; derived from `server_url` when unset.
    pub time_url: Option<String>,

    // Autopilot
    pub autoplay: bool,
    pub strategy: StrategyKind,

    // History
    pub record_games: bool,

    // View
    pub grid_lines: bool,

    // Values taken from the environment, never written back
    #[serde(skip)]
    env: EnvOverrides,
}

/// Environment overrides as (value in the file, value from the environment)
#[derive(Debug, Clone, Default, PartialEq)]
struct EnvOverrides {
    server_url: Option<(String, String)>,
    api_key: Option<(String, String)>,
    time_url: Option<(Option<String>, String)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            server_url: DEFAULT_SERVER_URL.to_string(),
            api_key: String::new(),
            time_url: None,
            autoplay: false,
            strategy: StrategyKind::default(),
            record_games: true,
            grid_lines: false,
            env: EnvOverrides::default(),
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(&self.persisted()) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    /// What goes to disk. Fields still holding an environment value get their
    /// file value back; fields changed since keep the new value.
    fn persisted(&self) -> Settings {
        let mut saved = self.clone();
        if let Some((file, env)) = &self.env.server_url {
            if saved.server_url == *env {
                saved.server_url = file.clone();
            }
        }
        if let Some((file, env)) = &self.env.api_key {
            if saved.api_key == *env {
                saved.api_key = file.clone();
            }
        }
        if let Some((file, env)) = &self.env.time_url {
            if saved.time_url.as_deref() == Some(env.as_str()) {
                saved.time_url = file.clone();
            }
        }
        saved.env = EnvOverrides::default();
        saved
    }

    /// Apply `URL`, `KEY` and `TIME_URL` overrides, the same variables the
    /// reference client container reads. They last for this run only.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("URL").filter(|v| !v.trim().is_empty()) {
            info!(url = %url, "Server URL taken from environment");
            let file = std::mem::replace(&mut self.server_url, url.clone());
            self.env.server_url = Some((file, url));
        }
        if let Some(key) = lookup("KEY").filter(|v| !v.trim().is_empty()) {
            info!("API key taken from environment");
            let file = std::mem::replace(&mut self.api_key, key.clone());
            self.env.api_key = Some((file, key));
        }
        if let Some(time_url) = lookup("TIME_URL").filter(|v| !v.trim().is_empty()) {
            let file = self.time_url.replace(time_url.clone());
            self.env.time_url = Some((file, time_url));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            api_key: "secret".into(),
            autoplay: true,
            strategy: StrategyKind::WallHugger,
            window_w: Some(1200.0),
            ..Settings::default()
        };
        settings.save(dir.path());
        assert_eq!(Settings::load(dir.path()), settings);
    }

    #[test]
    fn missing_or_broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());

        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), r#"{"api_key":"k"}"#).unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.api_key, "k");
        assert_eq!(settings.server_url, DEFAULT_SERVER_URL);
        assert!(settings.record_games);
    }

    #[test]
    fn environment_overrides() {
        let env = |name: &str| match name {
            "URL" => Some("ws://localhost:10101/spe_ed".to_string()),
            "KEY" => Some("abc".to_string()),
            "TIME_URL" => Some("   ".to_string()),
            _ => None,
        };
        let settings = Settings::default().with_env_overrides(env);
        assert_eq!(settings.server_url, "ws://localhost:10101/spe_ed");
        assert_eq!(settings.api_key, "abc");
        assert_eq!(settings.time_url, None);
    }

    #[test]
    fn environment_values_are_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let on_disk = Settings {
            api_key: "from-file".into(),
            ..Settings::default()
        };
        on_disk.save(dir.path());

        let env = |name: &str| match name {
            "URL" => Some("ws://localhost:10101/spe_ed".to_string()),
            "KEY" => Some("from-env".to_string()),
            "TIME_URL" => Some("http://localhost:10101/spe_ed_time".to_string()),
            _ => None,
        };
        let mut settings = Settings::load(dir.path()).with_env_overrides(env);
        assert_eq!(settings.api_key, "from-env");
        settings.autoplay = true;
        settings.save(dir.path());

        let reloaded = Settings::load(dir.path());
        assert_eq!(reloaded.api_key, "from-file");
        assert_eq!(reloaded.server_url, DEFAULT_SERVER_URL);
        assert_eq!(reloaded.time_url, None);
        assert!(reloaded.autoplay);
    }

    #[test]
    fn edits_after_an_override_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let env = |name: &str| (name == "KEY").then(|| "from-env".to_string());
        let mut settings = Settings::default().with_env_overrides(env);
        settings.api_key = "typed-in".into();
        settings.save(dir.path());

        assert_eq!(Settings::load(dir.path()).api_key, "typed-in");
    }
}
