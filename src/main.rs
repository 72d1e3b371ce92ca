mod app;
mod caster;
mod character;
mod config;
mod finder;
mod messages;
mod notifications;
mod panels;
mod player;
mod recolor;
mod scoreboard;
mod server;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing::info;

use crate::{
    app::ControlApp,
    config::ControlConfig,
    messages::{ControlMessage, PanelMessage},
    scoreboard::{ScoreboardCommand, ScoreboardWriter},
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (config, config_path) = ControlConfig::load_or_create()?;
    info!(config = %config_path.display(), "stream control starting");

    let (inbox_tx, inbox_rx) = crossbeam_channel::unbounded::<PanelMessage>();
    let (scoreboard_tx, scoreboard_rx) = mpsc::unbounded_channel::<ScoreboardCommand>();
    let (control_tx, control_rx) = mpsc::unbounded_channel::<ControlMessage>();
    let (ping_tx, _) = broadcast::channel::<String>(16);

    tokio::spawn(scoreboard::run_scoreboard_writer(
        ScoreboardWriter::new(config.text_root()),
        scoreboard_rx,
        inbox_tx.clone(),
        ping_tx.clone(),
    ));
    tokio::spawn(server::run_worker_manager(
        config.clone(),
        inbox_tx.clone(),
        control_rx,
        ping_tx,
    ));

    let startup_width = config.window.width.clamp(640.0, 4096.0);
    let startup_height = config.window.height.clamp(480.0, 4096.0);
    let mut viewport = egui::ViewportBuilder::default()
        .with_resizable(true)
        .with_inner_size([startup_width, startup_height])
        .with_title("Stream Control");
    if let (Some(x), Some(y)) = (config.window.pos_x, config.window.pos_y) {
        viewport = viewport.with_position(egui::pos2(x, y));
    }

    let native_options = eframe::NativeOptions {
        viewport,
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    eframe::run_native(
        "Stream Control",
        native_options,
        Box::new(move |cc| {
            crate::panels::theme::apply_theme(&cc.egui_ctx);
            Ok(Box::new(ControlApp::new(
                inbox_rx,
                config,
                config_path,
                scoreboard_tx,
                Some(control_tx),
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed starting control window: {err}"))?;

    Ok(())
}
