//! Runtime settings
//!
//! Defaults point at a local LM Studio style server. An optional JSON file
//! supplies overrides; the binary's command-line flags override both.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which side the human plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    White,
    Black,
}

impl PlayerColor {
    pub fn to_color(self) -> shakmaty::Color {
        match self {
            PlayerColor::White => shakmaty::Color::White,
            PlayerColor::Black => shakmaty::Color::Black,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the move server, including any API prefix
    pub base_url: String,
    pub human_color: PlayerColor,
    /// Seconds between connectivity probes
    pub probe_interval_secs: u64,
    /// Pacing delay before each remote move, milliseconds
    pub move_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: "http://localhost:1234/v1".to_string(),
            human_color: PlayerColor::White,
            probe_interval_secs: 15,
            move_delay_ms: 600,
        }
    }
}

impl Settings {
    /// Load from a JSON file; a missing or malformed file yields defaults
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Settings::default();
        };
        let Ok(text) = std::fs::read_to_string(path) else {
            warn!("[CONFIG] settings file {} not readable, using defaults", path.display());
            return Settings::default();
        };
        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(
                    "[CONFIG] ignoring malformed settings file {}: {err}",
                    path.display()
                );
                Settings::default()
            }
        }
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }

    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.move_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_a_local_server() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, "http://localhost:1234/v1");
        assert_eq!(settings.human_color, PlayerColor::White);
        assert_eq!(settings.probe_interval(), Duration::from_secs(15));
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"base_url":"http://10.0.0.2:8080/v1"}"#).unwrap();
        assert_eq!(settings.base_url, "http://10.0.0.2:8080/v1");
        assert_eq!(settings.move_delay_ms, 600);
    }

    #[test]
    fn color_parses_lowercase() {
        let settings: Settings = serde_json::from_str(r#"{"human_color":"black"}"#).unwrap();
        assert_eq!(settings.human_color, PlayerColor::Black);
        assert_eq!(settings.human_color.to_color(), shakmaty::Color::Black);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = Settings::load(Some(Path::new("/definitely/not/here.json")));
        assert_eq!(settings, Settings::default());
    }
}
