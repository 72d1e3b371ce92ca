use std::path::PathBuf;

use crate::config::ControlConfig;

/// Worker-side results delivered to the UI inbox once per frame.
#[derive(Debug, Clone)]
pub enum PanelMessage {
    ScoreboardWritten { path: PathBuf },
    ScoreboardFailed { error: String },
    ScoreboardDeferred,
    ServerStatus {
        running: bool,
        bind: Option<String>,
        error: Option<String>,
    },
}

/// Control messages from the UI to the worker manager.
#[derive(Debug, Clone)]
pub enum ControlMessage {
    Apply(ControlConfig),
}
