use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc::UnboundedReceiver};
use tracing::{info, warn};

use crate::messages::PanelMessage;

pub const SCOREBOARD_FILE: &str = "ScoreboardInfo.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub name: String,
    pub tag: String,
    pub character: String,
    pub skin: String,
    pub icon_src: Option<String>,
    pub skin_src: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasterSlot {
    pub name: String,
    pub twitter: String,
    pub twitch: String,
    pub youtube: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardSnapshot {
    pub players: Vec<PlayerSlot>,
    pub casters: Vec<CasterSlot>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub enum ScoreboardCommand {
    /// Readiness transition from one player panel. Single writer per
    /// panel; transitions from different panels interleave freely.
    SetReady { player: usize, ready: bool },
    Write { snapshot: ScoreboardSnapshot },
    Configure { text_root: PathBuf },
}

/// Owns the readiness map and the defer-while-busy rule: a write requested
/// while any panel is mid-change is held (newest wins) and flushed on the
/// last ready transition, so the overlay never reads half-updated state.
pub struct ScoreboardWriter {
    text_root: PathBuf,
    ready: HashMap<usize, bool>,
    deferred: Option<ScoreboardSnapshot>,
}

impl ScoreboardWriter {
    pub fn new(text_root: PathBuf) -> Self {
        Self {
            text_root,
            ready: HashMap::new(),
            deferred: None,
        }
    }

    pub fn configure(&mut self, text_root: PathBuf) {
        self.text_root = text_root;
    }

    pub fn all_ready(&self) -> bool {
        self.ready.values().all(|ready| *ready)
    }

    /// Applies a readiness transition; returns the outcome of flushing a
    /// deferred snapshot if this transition unblocked it.
    pub fn set_ready(&mut self, player: usize, ready: bool) -> Option<Result<PathBuf>> {
        self.ready.insert(player, ready);
        if !self.all_ready() {
            return None;
        }
        let snapshot = self.deferred.take()?;
        Some(self.write(&snapshot))
    }

    /// `None` means the write was deferred behind a busy panel.
    pub fn request_write(&mut self, snapshot: ScoreboardSnapshot) -> Option<Result<PathBuf>> {
        if self.all_ready() {
            Some(self.write(&snapshot))
        } else {
            self.deferred = Some(snapshot);
            None
        }
    }

    fn write(&self, snapshot: &ScoreboardSnapshot) -> Result<PathBuf> {
        fs::create_dir_all(&self.text_root).with_context(|| {
            format!("failed creating text dir at {}", self.text_root.display())
        })?;
        let path = self.text_root.join(SCOREBOARD_FILE);
        let payload =
            serde_json::to_string_pretty(snapshot).context("failed serializing scoreboard")?;
        fs::write(&path, payload)
            .with_context(|| format!("failed writing scoreboard at {}", path.display()))?;
        Ok(path)
    }
}

pub fn scoreboard_path(text_root: &Path) -> PathBuf {
    text_root.join(SCOREBOARD_FILE)
}

pub async fn run_scoreboard_writer(
    mut writer: ScoreboardWriter,
    mut commands: UnboundedReceiver<ScoreboardCommand>,
    inbox: Sender<PanelMessage>,
    ping: broadcast::Sender<String>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            ScoreboardCommand::Configure { text_root } => writer.configure(text_root),
            ScoreboardCommand::SetReady { player, ready } => {
                if let Some(outcome) = writer.set_ready(player, ready) {
                    publish_outcome(&inbox, &ping, outcome);
                }
            }
            ScoreboardCommand::Write { snapshot } => match writer.request_write(snapshot) {
                Some(outcome) => publish_outcome(&inbox, &ping, outcome),
                None => {
                    info!("scoreboard write deferred until all panels are ready");
                    let _ = inbox.send(PanelMessage::ScoreboardDeferred);
                }
            },
        }
    }
}

fn publish_outcome(
    inbox: &Sender<PanelMessage>,
    ping: &broadcast::Sender<String>,
    outcome: Result<PathBuf>,
) {
    match outcome {
        Ok(path) => {
            info!(path = %path.display(), "scoreboard written");
            let _ = ping.send("scoreboard".to_owned());
            let _ = inbox.send(PanelMessage::ScoreboardWritten { path });
        }
        Err(err) => {
            warn!(?err, "scoreboard write failed");
            let _ = inbox.send(PanelMessage::ScoreboardFailed {
                error: format!("{err:#}"),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{CasterSlot, PlayerSlot, ScoreboardSnapshot, ScoreboardWriter, SCOREBOARD_FILE};

    fn snapshot(tag: &str) -> ScoreboardSnapshot {
        ScoreboardSnapshot {
            players: vec![PlayerSlot {
                name: "Leaf".to_owned(),
                tag: tag.to_owned(),
                character: "Fox".to_owned(),
                skin: "Default".to_owned(),
                icon_src: Some("Resources/Characters/Fox/Icons/Default.png".to_owned()),
                skin_src: None,
            }],
            casters: vec![CasterSlot {
                name: "Alice".to_owned(),
                twitter: "-".to_owned(),
                twitch: "alicelive".to_owned(),
                youtube: "-".to_owned(),
            }],
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn writes_immediately_when_no_panel_is_busy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut writer = ScoreboardWriter::new(dir.path().to_path_buf());
        let path = writer
            .request_write(snapshot("v1"))
            .expect("should not defer")
            .expect("write should succeed");
        assert!(path.ends_with(SCOREBOARD_FILE));

        let body = std::fs::read_to_string(&path).expect("scoreboard should exist");
        let parsed: serde_json::Value = serde_json::from_str(&body).expect("valid json");
        assert_eq!(parsed["players"][0]["character"], "Fox");
        assert_eq!(parsed["casters"][0]["twitch"], "alicelive");
        assert!(parsed["updated_at"].is_string());
    }

    #[test]
    fn defers_while_any_panel_is_busy_and_flushes_on_last_ready() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut writer = ScoreboardWriter::new(dir.path().to_path_buf());
        writer.set_ready(1, false);
        writer.set_ready(2, false);

        assert!(writer.request_write(snapshot("v1")).is_none());
        assert!(!dir.path().join(SCOREBOARD_FILE).exists());

        assert!(writer.set_ready(1, true).is_none());
        let flushed = writer
            .set_ready(2, true)
            .expect("last ready transition should flush")
            .expect("write should succeed");
        assert!(flushed.exists());
    }

    #[test]
    fn newest_deferred_snapshot_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut writer = ScoreboardWriter::new(dir.path().to_path_buf());
        writer.set_ready(1, false);
        assert!(writer.request_write(snapshot("old")).is_none());
        assert!(writer.request_write(snapshot("new")).is_none());

        writer
            .set_ready(1, true)
            .expect("flush")
            .expect("write should succeed");
        let body =
            std::fs::read_to_string(dir.path().join(SCOREBOARD_FILE)).expect("scoreboard");
        assert!(body.contains("\"new\""));
        assert!(!body.contains("\"old\""));
    }

    #[test]
    fn ready_transitions_without_deferred_write_are_quiet() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut writer = ScoreboardWriter::new(dir.path().to_path_buf());
        assert!(writer.set_ready(1, false).is_none());
        assert!(writer.set_ready(1, true).is_none());
        assert!(!dir.path().join(SCOREBOARD_FILE).exists());
    }

    #[test]
    fn write_failure_is_reported_not_panicked() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file_in_the_way = dir.path().join("blocked");
        std::fs::write(&file_in_the_way, "x").expect("write");
        let mut writer = ScoreboardWriter::new(file_in_the_way);
        let outcome = writer.request_write(snapshot("v1")).expect("not deferred");
        assert!(outcome.is_err());
    }
}
