//! Rookline Player - console composition root binary.
//!
//! Creates a room (or joins `ROOKLINE_ROOM_ID`), then plays from stdin.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rookline_player::application::services::{LobbyService, Session, SessionDeps};
use rookline_player::infrastructure::http_client::RoomApiAdapter;
use rookline_player::infrastructure::peer::{RtcPeerConnection, UnavailablePeerConnection};
use rookline_player::infrastructure::websocket::WsTransport;
use rookline_player::infrastructure::{BackendConfig, SyncSettings, VoiceSettings};
use rookline_player::ports::outbound::{PeerConnectionPort, RoomApiPort};
use rookline_player::ui::{
    commands::HELP, render_board, render_moves, render_status, ConsoleCommand,
};

const PLAYER_NAME_ENV: &str = "ROOKLINE_PLAYER_NAME";
const ROOM_ID_ENV: &str = "ROOKLINE_ROOM_ID";
const MOVES_SHOWN: usize = 6;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rookline_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Rookline Player");

    let backend = BackendConfig::from_env()?;
    let settings = SyncSettings::from_env();
    let voice = VoiceSettings::from_env();
    tracing::info!("  Backend: {}", backend.http_base());

    let api: Arc<dyn RoomApiPort> = Arc::new(RoomApiAdapter::new(backend.clone()));
    let lobby = LobbyService::new(Arc::clone(&api));

    match lobby.health().await {
        Ok(health) => tracing::info!(status = %health.status, "Backend reachable"),
        Err(e) => tracing::warn!("Health check failed: {}", e),
    }

    let name = std::env::var(PLAYER_NAME_ENV).unwrap_or_else(|_| "Player".to_string());
    let room_id = match std::env::var(ROOM_ID_ENV) {
        Ok(room_id) => room_id,
        Err(_) => {
            let room_id = lobby.create_room().await?;
            println!("Created room {room_id}; share this id with your opponent");
            room_id.to_string()
        }
    };

    let identity = lobby.join_room(&room_id, &name).await?;
    println!(
        "Joined room {} as {} ({})",
        identity.room_id, identity.player_name, identity.color
    );
    let perspective = identity.color;

    let peer: Arc<dyn PeerConnectionPort> = match RtcPeerConnection::connect(voice).await {
        Ok(peer) => Arc::new(peer),
        Err(e) => {
            tracing::warn!("Voice calls disabled: {}", e);
            Arc::new(UnavailablePeerConnection::new(e.to_string()))
        }
    };

    let session = Session::start(
        identity,
        SessionDeps {
            api,
            transport: Arc::new(WsTransport::new()),
            peer,
            backend,
            settings,
        },
    )?;

    let mut views = session.subscribe();
    let render = tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            println!("\n{}", render_board(&view, perspective));
            if let Some(moves) = render_moves(&view, MOVES_SHOWN) {
                println!("{moves}");
            }
            println!("{}", render_status(&view, perspective));
        }
    });

    let online = session.connection();
    let mut connection = session.connection();
    let status = tokio::spawn(async move {
        while let Some(state) = connection.changed().await {
            println!("[connection: {state}]");
        }
    });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let result = match command {
            ConsoleCommand::Move { from, to } => session.move_piece(from, to).await,
            ConsoleCommand::Resign => session.resign().await,
            ConsoleCommand::Undo => session.request_undo().await,
            ConsoleCommand::Rematch => session.request_rematch().await,
            ConsoleCommand::Call if !online.is_connected() => {
                println!("Not connected; try /call again once the channel is back");
                Ok(())
            }
            ConsoleCommand::Call => session.start_call(),
            ConsoleCommand::Help => {
                println!("{HELP}");
                Ok(())
            }
            ConsoleCommand::Quit => break,
        };
        if let Err(e) = result {
            println!("{e}");
        }
    }

    session.leave().await;
    let _ = tokio::join!(render, status);
    tracing::info!("Bye");
    Ok(())
}
