//! Per-room relay connection task with auto-reconnect.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use roomsync_common::RoomId;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use super::relay_protocol::{RelayResponse, RoomHello};
use super::WsTransportConfig;
use crate::protocol::RoomMessage;

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

enum SessionResult {
    Shutdown,
    Disconnected(String),
}

/// Run the relay connection for one room until the session drops its link.
///
/// The last `join` published is replayed after every reconnect so peers
/// that arrived while we were away still learn about us.
pub(crate) async fn run_room_client(
    config: WsTransportConfig,
    room: RoomId,
    mut outbound_rx: mpsc::Receiver<RoomMessage>,
    inbound_tx: mpsc::Sender<RoomMessage>,
) {
    let mut backoff = config.reconnect_delay;
    let mut last_join: Option<RoomMessage> = None;

    loop {
        info!(url = %config.url, room = %room, "Connecting to relay");

        match tokio::time::timeout(config.connect_timeout, connect_async(&config.url)).await {
            Ok(Ok((ws, _))) => {
                backoff = config.reconnect_delay;
                let result =
                    room_session(ws, &room, &mut outbound_rx, &inbound_tx, &mut last_join).await;

                match result {
                    SessionResult::Shutdown => {
                        info!(room = %room, "Relay transport shutting down");
                        return;
                    }
                    SessionResult::Disconnected(reason) => {
                        warn!(room = %room, reason = %reason, "Relay connection lost");
                    }
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to connect to relay");
            }
            Err(_elapsed) => {
                warn!(
                    timeout_secs = config.connect_timeout.as_secs(),
                    "Relay connection timed out"
                );
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(backoff) => {}
            _ = inbound_tx.closed() => return,
        }

        backoff = (backoff * 2).min(config.max_reconnect_delay);
    }
}

/// One connected stint: handshake, replay, then forward until disconnect.
async fn room_session(
    ws: WsStream,
    room: &RoomId,
    outbound_rx: &mut mpsc::Receiver<RoomMessage>,
    inbound_tx: &mpsc::Sender<RoomMessage>,
    last_join: &mut Option<RoomMessage>,
) -> SessionResult {
    let (mut sink, mut stream) = ws.split();

    // 1. Announce the room
    let hello = RoomHello::Hello {
        room: room.as_str().to_string(),
    };
    let Ok(hello) = serde_json::to_string(&hello) else {
        return SessionResult::Disconnected("failed to encode hello".into());
    };
    if sink.send(Message::Text(hello.into())).await.is_err() {
        return SessionResult::Disconnected("failed to send hello".into());
    }

    // 2. Wait for room_ready
    match read_relay_response(&mut stream).await {
        Some(RelayResponse::RoomReady { room, peers }) => {
            info!(room = %room, peers, "Relay room ready");
        }
        Some(RelayResponse::Error { message }) => {
            return SessionResult::Disconnected(format!("relay error: {message}"));
        }
        None => {
            return SessionResult::Disconnected("unexpected relay response".into());
        }
    }

    // 3. Replay our presence
    if let Some(join) = last_join.as_ref() {
        if let Ok(json) = join.to_json() {
            if sink.send(Message::Text(json.into())).await.is_err() {
                return SessionResult::Disconnected("send failed".into());
            }
        }
    }

    // 4. Forwarding loop
    loop {
        tokio::select! {
            msg = outbound_rx.recv() => {
                let Some(msg) = msg else {
                    let _ = sink.send(Message::Close(None)).await;
                    return SessionResult::Shutdown;
                };
                if matches!(msg, RoomMessage::Join(_)) {
                    *last_join = Some(msg.clone());
                }
                match msg.to_json() {
                    Ok(json) => {
                        if sink.send(Message::Text(json.into())).await.is_err() {
                            return SessionResult::Disconnected("send failed".into());
                        }
                    }
                    Err(e) => warn!(error = %e, "Failed to encode room message"),
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match RoomMessage::from_json(&text) {
                        Ok(RoomMessage::Unknown) => {
                            debug!("Ignoring unknown frame type");
                        }
                        Ok(msg) => {
                            if inbound_tx.send(msg).await.is_err() {
                                return SessionResult::Shutdown;
                            }
                        }
                        Err(e) => {
                            debug!(error = %e, "Dropping malformed frame");
                        }
                    },
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return SessionResult::Disconnected("closed by relay".into());
                    }
                    Some(Err(e)) => {
                        return SessionResult::Disconnected(e.to_string());
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Read the relay's handshake reply, waiting up to 10 seconds.
async fn read_relay_response(
    stream: &mut futures_util::stream::SplitStream<WsStream>,
) -> Option<RelayResponse> {
    let frame = tokio::time::timeout(Duration::from_secs(10), stream.next()).await;
    match frame {
        Ok(Some(Ok(Message::Text(text)))) => serde_json::from_str(&text).ok(),
        Ok(_) => None,
        Err(_) => {
            warn!("Relay handshake timeout (10s)");
            None
        }
    }
}
