pub mod casters_page;
pub mod players_page;
pub mod settings_page;
pub mod theme;
pub mod ui;

use crate::config::ControlConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlTab {
    #[default]
    Players,
    Commentators,
    Settings,
}

impl ControlTab {
    pub fn label(&self) -> &'static str {
        match self {
            ControlTab::Players => "Players",
            ControlTab::Commentators => "Commentators",
            ControlTab::Settings => "Settings",
        }
    }
}

#[derive(Default)]
pub struct PanelsState {
    pub active_tab: ControlTab,
    pub custom_skin: CustomSkinState,
    pub settings: SettingsTabState,
}

/// Dialog state for the custom-skin flow, opened from the synthetic
/// "Custom Skin" entry of a player's skin finder.
#[derive(Default)]
pub struct CustomSkinState {
    pub open_for: Option<usize>,
    pub hex_input: String,
    pub error: Option<String>,
}

#[derive(Default)]
pub struct SettingsTabState {
    pub resources_input: String,
    pub bind_input: String,
    pub players_input: String,
    pub casters_input: String,
    pub workshop_mode: bool,
    pub server_enabled: bool,
    pub status: Option<String>,
    pub server_running: bool,
    pub server_bind_active: Option<String>,
    pub server_error: Option<String>,
}

impl SettingsTabState {
    pub fn sync_from(&mut self, config: &ControlConfig) {
        self.resources_input = config.resources_dir.display().to_string();
        self.bind_input = config.server_bind.clone();
        self.players_input = config.player_count().to_string();
        self.casters_input = config.caster_count().to_string();
        self.workshop_mode = config.workshop_mode;
        self.server_enabled = config.server_enabled;
    }
}
