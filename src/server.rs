use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use crossbeam_channel::Sender;
use tokio::{
    net::TcpListener,
    sync::{broadcast, mpsc::UnboundedReceiver},
    task::JoinHandle,
};
use tracing::{error, info, warn};

use crate::{
    config::ControlConfig,
    messages::{ControlMessage, PanelMessage},
    scoreboard,
};

#[derive(Clone)]
struct ServerShared {
    scoreboard_path: PathBuf,
    ping: broadcast::Sender<String>,
}

pub fn is_valid_bind(value: &str) -> bool {
    value.parse::<SocketAddr>().is_ok()
}

/// Owns the overlay server task. Settings changes arrive as `Apply`
/// messages and restart the server against the new configuration.
pub async fn run_worker_manager(
    mut config: ControlConfig,
    inbox: Sender<PanelMessage>,
    mut control_rx: UnboundedReceiver<ControlMessage>,
    ping: broadcast::Sender<String>,
) {
    let mut server: Option<JoinHandle<()>> = None;
    apply_server_config(&mut server, &config, &inbox, &ping);
    while let Some(message) = control_rx.recv().await {
        match message {
            ControlMessage::Apply(next_config) => {
                config = next_config;
                apply_server_config(&mut server, &config, &inbox, &ping);
            }
        }
    }
    abort_handle(&mut server);
}

fn apply_server_config(
    handle: &mut Option<JoinHandle<()>>,
    config: &ControlConfig,
    inbox: &Sender<PanelMessage>,
    ping: &broadcast::Sender<String>,
) {
    abort_handle(handle);

    if !config.server_enabled {
        info!("overlay server disabled (server_enabled=false)");
        let _ = inbox.send(PanelMessage::ServerStatus {
            running: false,
            bind: None,
            error: None,
        });
        return;
    }

    let bind = config.server_bind.trim();
    if !is_valid_bind(bind) {
        warn!(bind = %bind, "server_bind is invalid; overlay server disabled");
        let _ = inbox.send(PanelMessage::ServerStatus {
            running: false,
            bind: None,
            error: Some(format!("invalid server_bind: {bind}")),
        });
        return;
    }

    let bind = bind.to_owned();
    let scoreboard_path = scoreboard::scoreboard_path(&config.text_root());
    let ping = ping.clone();
    let inbox_status = inbox.clone();
    let bind_status = bind.clone();
    *handle = Some(tokio::spawn(async move {
        if let Err(err) = run_overlay_server(&bind, scoreboard_path, ping).await {
            error!(?err, bind = %bind, "overlay server crashed");
            let _ = inbox_status.send(PanelMessage::ServerStatus {
                running: false,
                bind: Some(bind),
                error: Some(err.to_string()),
            });
        }
    }));
    let _ = inbox.send(PanelMessage::ServerStatus {
        running: true,
        bind: Some(bind_status),
        error: None,
    });
}

fn abort_handle(handle: &mut Option<JoinHandle<()>>) {
    if let Some(task) = handle.take() {
        task.abort();
    }
}

async fn run_overlay_server(
    bind: &str,
    scoreboard_path: PathBuf,
    ping: broadcast::Sender<String>,
) -> Result<()> {
    let shared = ServerShared {
        scoreboard_path,
        ping,
    };
    let app = Router::new()
        .route("/scoreboard", get(serve_scoreboard))
        .route("/updates", get(serve_updates))
        .route("/health", get(|| async { "ok" }))
        .with_state(shared);

    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid server bind address: {bind}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed binding overlay listener on {addr}"))?;

    info!("scoreboard available at http://{addr}/scoreboard");
    info!("update socket listening on ws://{addr}/updates");
    axum::serve(listener, app)
        .await
        .context("axum serve failed")?;
    Ok(())
}

async fn serve_scoreboard(State(shared): State<ServerShared>) -> impl IntoResponse {
    match tokio::fs::read_to_string(&shared.scoreboard_path).await {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn serve_updates(
    ws: WebSocketUpgrade,
    State(shared): State<ServerShared>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_updates(socket, shared.ping.subscribe()))
}

/// Pushes one text ping per successful scoreboard write until the overlay
/// page disconnects.
async fn handle_updates(mut socket: WebSocket, mut ping: broadcast::Receiver<String>) {
    loop {
        tokio::select! {
            next = ping.recv() => match next {
                Ok(tag) => {
                    if socket.send(Message::Text(tag)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "update socket lagged behind scoreboard pings");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(?err, "update socket receive error");
                    break;
                }
            },
        }
    }
}
