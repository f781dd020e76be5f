//! roomsync-relay: WebSocket fan-out server for shared editing rooms.
//!
//! Each client names a room in its first frame. Every later text frame is
//! copied to the other members of that room; the relay never inspects
//! room traffic and keeps no history, so late joiners rely on peers to
//! re-announce themselves.

mod connection;
mod protocol;
mod room;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;

use crate::connection::handle_connection;
use crate::room::RoomStore;

#[derive(Parser)]
#[command(name = "roomsync-relay", about = "WebSocket relay for roomsync rooms")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Maximum number of connections per room.
    #[arg(long, default_value_t = 16)]
    max_room_size: usize,
}

/// Accept connections forever, one task per client.
pub(crate) async fn serve(listener: TcpListener, store: RoomStore) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
                continue;
            }
        };
        let store = store.clone();
        tokio::spawn(async move {
            match accept_async(stream).await {
                Ok(ws) => handle_connection(ws, peer, store.clone()).await,
                Err(e) => tracing::warn!(peer = %peer, error = %e, "WS handshake failed"),
            }
            if tracing::enabled!(tracing::Level::DEBUG) {
                let rooms = store.count().await;
                tracing::debug!(rooms, "Connection finished");
            }
        });
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roomsync_relay=info".into()),
        )
        .init();

    let args = Args::parse();
    let max_room_size = args.max_room_size.max(1);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind TCP listener");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, max_room_size, "Relaying rooms");
    serve(listener, RoomStore::new(max_room_size)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_all_interfaces() {
        let args = Args::parse_from(["roomsync-relay"]);
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.port, 8080);
        assert_eq!(args.max_room_size, 16);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "roomsync-relay",
            "--host",
            "127.0.0.1",
            "-p",
            "9001",
            "--max-room-size",
            "4",
        ]);
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 9001);
        assert_eq!(args.max_room_size, 4);
    }
}
