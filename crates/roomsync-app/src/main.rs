mod cli;
mod console;

use std::path::Path;
use std::time::Duration;

use roomsync_config::{RelayConfig, RoomsyncConfig};
use roomsync_session::{
    run_session, MemoryEditor, RoomSession, SessionConfig, WsTransport, WsTransportConfig,
};
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::cli::Command;
use crate::console::EventPrinter;

fn session_config(config: &RoomsyncConfig) -> SessionConfig {
    SessionConfig {
        debounce: Duration::from_millis(u64::from(config.session.debounce_ms)),
        min_room_code_len: config.session.min_room_code_len as usize,
        announce_on_join: config.session.announce_on_join,
        palette: config.palette.to_palette(),
        ..SessionConfig::default()
    }
}

fn transport_config(relay: &RelayConfig) -> WsTransportConfig {
    WsTransportConfig {
        url: relay.url.clone(),
        connect_timeout: Duration::from_secs(u64::from(relay.connect_timeout_secs)),
        reconnect_delay: Duration::from_secs(u64::from(relay.reconnect_delay_secs)),
        max_reconnect_delay: Duration::from_secs(u64::from(relay.max_reconnect_delay_secs)),
        ..WsTransportConfig::default()
    }
}

fn open_session(
    args: &cli::Args,
    config: &RoomsyncConfig,
    transport: &WsTransport,
) -> roomsync_common::Result<RoomSession<MemoryEditor>> {
    let editor = MemoryEditor::new();
    let session = match &args.command {
        Command::Create => {
            RoomSession::create(&args.name, editor, transport, session_config(config))
        }
        Command::Join { code } => {
            RoomSession::join(code, &args.name, editor, transport, session_config(config))?
        }
    };
    Ok(session)
}

/// Forward stdin lines into the session loop from a plain thread, so a
/// blocked read never holds up runtime shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(64);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    // Load config
    let loaded = match &args.config {
        Some(path) => roomsync_config::load_config_from(Path::new(path)),
        None => roomsync_config::load_config(),
    };

    // Initialize logging (stderr, so the console stays readable)
    let log_directive = args.log_level.clone().unwrap_or_else(|| {
        loaded
            .as_ref()
            .map(|c| c.logging.level.directive())
            .unwrap_or("roomsync=info")
            .to_string()
    });
    let directive: Directive = log_directive
        .parse()
        .unwrap_or_else(|_| Directive::from(LevelFilter::INFO));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    tracing::info!("roomsync v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        RoomsyncConfig::default()
    });

    let palette = config.palette.to_palette();
    let transport = WsTransport::new(transport_config(&config.relay));

    let mut session = match open_session(&args, &config, &transport) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "Cannot enter room");
            eprintln!("roomsync: {e}");
            std::process::exit(2);
        }
    };

    println!("room {}", session.room());
    if !session.is_connected() {
        println!("! relay unavailable, editing locally");
    }

    // Print session events as they arrive
    let mut events = session.subscribe();
    let mut printer = EventPrinter::new(palette);
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => println!("{}", printer.render(&event)),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event printer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    tracing::info!("Entering session loop");
    run_session(&mut session, spawn_stdin_reader(), |session, line, now| {
        console::apply(session, console::parse_line(&line), now)
    })
    .await;

    session.close();
    tracing::info!("Shutdown complete");
}
