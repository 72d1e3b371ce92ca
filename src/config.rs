use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub pos_x: Option<f32>,
    pub pos_y: Option<f32>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 760.0,
            pos_x: None,
            pos_y: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub resources_dir: PathBuf,
    pub players: usize,
    pub casters: usize,
    pub workshop_mode: bool,
    pub server_enabled: bool,
    pub server_bind: String,
    pub window: WindowConfig,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            resources_dir: PathBuf::from("Resources"),
            players: 2,
            casters: 2,
            workshop_mode: false,
            server_enabled: true,
            server_bind: "127.0.0.1:38517".to_owned(),
            window: WindowConfig::default(),
        }
    }
}

impl ControlConfig {
    pub fn load_or_create() -> Result<(Self, PathBuf)> {
        let config_dir = dirs::config_dir()
            .context("unable to locate OS config directory")?
            .join("stream-control");
        fs::create_dir_all(&config_dir)
            .with_context(|| format!("failed creating config dir at {}", config_dir.display()))?;

        let config_path = config_dir.join("config.json");
        if !config_path.exists() {
            let default = Self::default();
            default.save(&config_path)?;
            return Ok((default, config_path));
        }

        let text = fs::read_to_string(&config_path)
            .with_context(|| format!("failed reading {}", config_path.display()))?;
        let config = serde_json::from_str::<Self>(&text)
            .with_context(|| format!("invalid json in {}", config_path.display()))?;
        Ok((config, config_path))
    }

    pub fn save(&self, path: &PathBuf) -> Result<()> {
        let payload = serde_json::to_string_pretty(self).context("failed serializing config")?;
        fs::write(path, payload).with_context(|| format!("failed writing {}", path.display()))?;
        Ok(())
    }

    /// Root for scoreboard text output and commentator presets.
    pub fn text_root(&self) -> PathBuf {
        self.resources_dir.join("Texts")
    }

    /// Base characters directory, before any workshop-mode switch.
    pub fn character_root(&self) -> PathBuf {
        self.resources_dir.join("Characters")
    }

    pub fn player_count(&self) -> usize {
        self.players.clamp(1, 4)
    }

    pub fn caster_count(&self) -> usize {
        self.casters.clamp(1, 4)
    }
}

#[cfg(test)]
mod tests {
    use super::ControlConfig;

    #[test]
    fn parses_partial_config_with_defaults() {
        let raw = r#"{
            "players": 4,
            "workshop_mode": true
        }"#;
        let parsed: ControlConfig = serde_json::from_str(raw).expect("config should parse");
        assert_eq!(parsed.players, 4);
        assert!(parsed.workshop_mode);
        assert!(parsed.server_enabled);
        assert_eq!(parsed.server_bind, "127.0.0.1:38517");
        assert_eq!(parsed.window.width, 1100.0);
        assert_eq!(parsed.window.pos_x, None);
        assert_eq!(parsed.resources_dir.to_str(), Some("Resources"));
    }

    #[test]
    fn derived_roots_follow_resources_dir() {
        let mut config = ControlConfig::default();
        config.resources_dir = "/tmp/overlay/Resources".into();
        assert_eq!(
            config.text_root().to_str(),
            Some("/tmp/overlay/Resources/Texts")
        );
        assert_eq!(
            config.character_root().to_str(),
            Some("/tmp/overlay/Resources/Characters")
        );
    }

    #[test]
    fn panel_counts_are_clamped() {
        let mut config = ControlConfig::default();
        config.players = 0;
        config.casters = 99;
        assert_eq!(config.player_count(), 1);
        assert_eq!(config.caster_count(), 4);
    }
}
