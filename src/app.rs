use std::path::PathBuf;

use chrono::Utc;
use crossbeam_channel::Receiver;
use eframe::egui;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::{
    caster::CasterPanel,
    character,
    config::ControlConfig,
    finder::FinderState,
    messages::{ControlMessage, PanelMessage},
    notifications::NotificationCenter,
    panels::PanelsState,
    player::{CharSource, PlayerPanel},
    scoreboard::{CasterSlot, PlayerSlot, ScoreboardCommand, ScoreboardSnapshot},
};

pub struct ControlState {
    inbox: Receiver<PanelMessage>,
    pub config: ControlConfig,
    config_path: PathBuf,
    pub players: Vec<PlayerPanel>,
    pub casters: Vec<CasterPanel>,
    pub characters: Vec<String>,
    pub finder: FinderState,
    pub notifications: NotificationCenter,
    pub panels: PanelsState,
    scoreboard_tx: UnboundedSender<ScoreboardCommand>,
    control_tx: Option<UnboundedSender<ControlMessage>>,
}

impl ControlState {
    pub fn new(
        inbox: Receiver<PanelMessage>,
        config: ControlConfig,
        config_path: PathBuf,
        scoreboard_tx: UnboundedSender<ScoreboardCommand>,
        control_tx: Option<UnboundedSender<ControlMessage>>,
    ) -> Self {
        let players = (1..=config.player_count())
            .map(|number| PlayerPanel::new(number, scoreboard_tx.clone()))
            .collect();
        let casters = (1..=config.caster_count()).map(CasterPanel::new).collect();
        let mut panels = PanelsState::default();
        panels.settings.sync_from(&config);
        let characters = character::list_characters(
            &CharSource::new(config.character_root(), config.workshop_mode).fs_root(),
        );
        Self {
            inbox,
            config,
            config_path,
            players,
            casters,
            characters,
            finder: FinderState::default(),
            notifications: NotificationCenter::default(),
            panels,
            scoreboard_tx,
            control_tx,
        }
    }

    pub fn char_source(&self) -> CharSource {
        CharSource::new(self.config.character_root(), self.config.workshop_mode)
    }

    pub fn refresh_characters(&mut self) {
        self.characters = character::list_characters(&self.char_source().fs_root());
    }

    /// Per-frame state pass before drawing: drain worker results, then let
    /// every player panel apply whatever async completions landed.
    pub fn update_state(&mut self, ctx: &egui::Context) {
        while let Ok(message) = self.inbox.try_recv() {
            match message {
                PanelMessage::ScoreboardWritten { path } => self
                    .notifications
                    .info(format!("Scoreboard updated ({})", path.display())),
                PanelMessage::ScoreboardFailed { error } => self
                    .notifications
                    .error(format!("Scoreboard update failed: {error}")),
                PanelMessage::ScoreboardDeferred => self
                    .notifications
                    .info("Scoreboard update queued until all players are ready"),
                PanelMessage::ServerStatus {
                    running,
                    bind,
                    error,
                } => {
                    self.panels.settings.server_running = running;
                    self.panels.settings.server_bind_active = bind;
                    self.panels.settings.server_error = error;
                }
            }
        }

        let src = self.char_source();
        for player in &mut self.players {
            player.poll(&src, ctx);
        }
    }

    pub fn request_scoreboard_write(&mut self) {
        let snapshot = self.snapshot();
        if self
            .scoreboard_tx
            .send(ScoreboardCommand::Write { snapshot })
            .is_err()
        {
            self.notifications.error("Scoreboard writer is not running");
        }
    }

    pub fn snapshot(&self) -> ScoreboardSnapshot {
        ScoreboardSnapshot {
            players: self
                .players
                .iter()
                .map(|player| PlayerSlot {
                    name: player.name.clone(),
                    tag: player.tag.clone(),
                    character: player.character().to_owned(),
                    skin: player.skin().name.clone(),
                    icon_src: player.icon_browser_src().map(str::to_owned),
                    skin_src: player.skin_browser_src().map(str::to_owned),
                })
                .collect(),
            casters: self
                .casters
                .iter()
                .map(|caster| CasterSlot {
                    name: caster.name().to_owned(),
                    twitter: caster.twitter().to_owned(),
                    twitch: caster.twitch().to_owned(),
                    youtube: caster.youtube().to_owned(),
                })
                .collect(),
            updated_at: Utc::now(),
        }
    }

    /// Persists edited settings, resizes the panel lists and hot-applies
    /// the worker configuration.
    pub fn apply_settings(&mut self, next: ControlConfig) {
        self.config = next;
        self.resize_panels();
        self.refresh_characters();
        self.panels.settings.sync_from(&self.config);
        let _ = self.scoreboard_tx.send(ScoreboardCommand::Configure {
            text_root: self.config.text_root(),
        });
        if let Some(tx) = &self.control_tx {
            if tx.send(ControlMessage::Apply(self.config.clone())).is_err() {
                warn!("worker manager is gone; server settings not applied");
            }
        }
        match self.config.save(&self.config_path) {
            Ok(()) => self.notifications.info("Settings saved"),
            Err(err) => self
                .notifications
                .error(format!("Settings save failed: {err:#}")),
        }
    }

    fn resize_panels(&mut self) {
        let player_target = self.config.player_count();
        while self.players.len() > player_target {
            if let Some(removed) = self.players.pop() {
                // a dropped panel must not leave the writer blocked on it
                let _ = self.scoreboard_tx.send(ScoreboardCommand::SetReady {
                    player: removed.number,
                    ready: true,
                });
            }
        }
        while self.players.len() < player_target {
            let number = self.players.len() + 1;
            self.players
                .push(PlayerPanel::new(number, self.scoreboard_tx.clone()));
        }

        let caster_target = self.config.caster_count();
        self.casters.truncate(caster_target);
        while self.casters.len() < caster_target {
            let number = self.casters.len() + 1;
            self.casters.push(CasterPanel::new(number));
        }
    }
}

pub struct ControlApp {
    state: ControlState,
}

impl ControlApp {
    pub fn new(
        inbox: Receiver<PanelMessage>,
        config: ControlConfig,
        config_path: PathBuf,
        scoreboard_tx: UnboundedSender<ScoreboardCommand>,
        control_tx: Option<UnboundedSender<ControlMessage>>,
    ) -> Self {
        Self {
            state: ControlState::new(inbox, config, config_path, scoreboard_tx, control_tx),
        }
    }
}

impl eframe::App for ControlApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.update_state(ctx);
        crate::panels::ui::draw_control(&mut self.state, ctx);
        self.state.notifications.draw(ctx);
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::unbounded_channel;

    use super::ControlState;
    use crate::{config::ControlConfig, messages::PanelMessage};

    fn state() -> (
        ControlState,
        crossbeam_channel::Sender<PanelMessage>,
        tokio::sync::mpsc::UnboundedReceiver<crate::scoreboard::ScoreboardCommand>,
    ) {
        let (inbox_tx, inbox_rx) = crossbeam_channel::unbounded();
        let (scoreboard_tx, scoreboard_rx) = unbounded_channel();
        let dir = std::env::temp_dir().join("stream-control-test-config.json");
        let state = ControlState::new(
            inbox_rx,
            ControlConfig::default(),
            dir,
            scoreboard_tx,
            None,
        );
        (state, inbox_tx, scoreboard_rx)
    }

    #[test]
    fn panels_are_built_from_config_counts() {
        let (state, _inbox, _rx) = state();
        assert_eq!(state.players.len(), 2);
        assert_eq!(state.casters.len(), 2);
        assert_eq!(state.players[0].number, 1);
        assert_eq!(state.players[1].number, 2);
    }

    #[test]
    fn snapshot_collects_resolved_caster_fields() {
        let (mut state, _inbox, _rx) = state();
        state.casters[0].set_name("Alice");
        state.casters[0].set_twitch("alicelive");
        let snapshot = state.snapshot();
        assert_eq!(snapshot.casters[0].name, "Alice");
        assert_eq!(snapshot.casters[0].twitch, "alicelive");
        assert_eq!(snapshot.casters[0].twitter, "-");
        assert_eq!(snapshot.players.len(), 2);
        assert_eq!(snapshot.players[0].skin, "Default");
    }

    #[test]
    fn server_status_lands_in_settings_state() {
        let (mut state, inbox, _rx) = state();
        inbox
            .send(PanelMessage::ServerStatus {
                running: true,
                bind: Some("127.0.0.1:38517".to_owned()),
                error: None,
            })
            .expect("send");
        let ctx = egui::Context::default();
        state.update_state(&ctx);
        assert!(state.panels.settings.server_running);
        assert_eq!(
            state.panels.settings.server_bind_active.as_deref(),
            Some("127.0.0.1:38517")
        );
    }

    #[test]
    fn shrinking_players_releases_their_readiness() {
        let (mut state, _inbox, mut rx) = state();
        let mut next = state.config.clone();
        next.players = 1;
        next.casters = 1;
        state.apply_settings(next);
        assert_eq!(state.players.len(), 1);
        assert_eq!(state.casters.len(), 1);

        let mut released = Vec::new();
        while let Ok(command) = rx.try_recv() {
            if let crate::scoreboard::ScoreboardCommand::SetReady { player, ready } = command {
                released.push((player, ready));
            }
        }
        assert!(released.contains(&(2, true)));
    }
}
