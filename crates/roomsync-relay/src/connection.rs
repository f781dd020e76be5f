//! Per-connection handler: read the hello, join the room, then fan out.

use std::net::SocketAddr;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::protocol::{RelayResponse, RoomHello};
use crate::room::RoomStore;

/// Handle a single WebSocket connection.
pub async fn handle_connection<S>(ws: S, addr: SocketAddr, store: RoomStore)
where
    S: Stream<Item = Result<Message, WsError>> + Sink<Message, Error = WsError> + Unpin,
{
    let (mut sink, mut stream) = ws.split();

    // 1. Read the hello to learn the room.
    let Some(room) = read_hello(&mut stream, addr).await else {
        return;
    };

    // 2. Create our receive channel and register.
    let (tx, mut rx) = mpsc::channel::<String>(256);
    let (conn, peers) = match store.register(&room, tx).await {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(peer = %addr, room = %room, reason = e, "Rejected client");
            let _ = send_response(
                &mut sink,
                &RelayResponse::Error {
                    message: e.to_string(),
                },
            )
            .await;
            return;
        }
    };

    tracing::info!(peer = %addr, room = %room, peers, "Client joined room");

    // 3. Send room_ready.
    let ready = RelayResponse::RoomReady {
        room: room.clone(),
        peers,
    };
    if send_response(&mut sink, &ready).await.is_err() {
        store.unregister(&room, conn).await;
        return;
    }

    // 4. Forwarding loop.
    loop {
        tokio::select! {
            // Frames from the rest of the room -> this client
            Some(msg) = rx.recv() => {
                if sink.send(Message::Text(msg.into())).await.is_err() {
                    break;
                }
            }

            // Frames from this client -> everyone else in the room
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        let text = text.to_string();
                        for peer in store.others(&room, conn).await {
                            match peer.try_send(text.clone()) {
                                Ok(()) | Err(TrySendError::Closed(_)) => {}
                                Err(TrySendError::Full(_)) => {
                                    tracing::warn!(room = %room, "Peer queue full, dropping frame");
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    // 5. Cleanup.
    let emptied = store.unregister(&room, conn).await;
    tracing::info!(peer = %addr, room = %room, emptied, "Client left room");
}

/// Read and parse the first frame as a [`RoomHello`].
async fn read_hello<S>(stream: &mut S, addr: SocketAddr) -> Option<String>
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    // Wait up to 10 seconds for the hello message.
    let frame = tokio::time::timeout(std::time::Duration::from_secs(10), stream.next()).await;

    match frame {
        Ok(Some(Ok(Message::Text(text)))) => match serde_json::from_str::<RoomHello>(&text) {
            Ok(RoomHello::Hello { room }) => {
                let room = room.trim().to_lowercase();
                if room.is_empty() {
                    tracing::warn!(peer = %addr, "Empty room code in hello");
                    return None;
                }
                Some(room)
            }
            Err(e) => {
                tracing::warn!(peer = %addr, error = %e, "Invalid hello message");
                None
            }
        },
        Ok(Some(Ok(_))) => {
            tracing::warn!(peer = %addr, "Expected text hello, got binary");
            None
        }
        Ok(Some(Err(e))) => {
            tracing::warn!(peer = %addr, error = %e, "WS error during hello");
            None
        }
        Ok(None) => {
            tracing::debug!(peer = %addr, "Connection closed before hello");
            None
        }
        Err(_) => {
            tracing::warn!(peer = %addr, "Hello timeout (10s)");
            None
        }
    }
}

/// Send a RelayResponse as a JSON text frame.
async fn send_response<S>(sink: &mut S, response: &RelayResponse) -> Result<(), WsError>
where
    S: Sink<Message, Error = WsError> + Unpin,
{
    let json = serde_json::to_string(response).map_err(|e| WsError::Io(e.into()))?;
    sink.send(Message::Text(json.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::{TcpListener, TcpStream};
    use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

    type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

    async fn spawn_relay(max_room_size: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(crate::serve(listener, RoomStore::new(max_room_size)));
        format!("ws://{addr}")
    }

    async fn next_text<S>(ws: &mut S) -> String
    where
        S: Stream<Item = Result<Message, WsError>> + Unpin,
    {
        loop {
            match ws.next().await.unwrap().unwrap() {
                Message::Text(text) => return text.to_string(),
                _ => continue,
            }
        }
    }

    async fn hello(url: &str, room: &str) -> (String, Client) {
        let (mut ws, _) = connect_async(url).await.unwrap();
        let frame = format!(r#"{{"type":"hello","room":"{room}"}}"#);
        ws.send(Message::Text(frame.into())).await.unwrap();
        let reply = next_text(&mut ws).await;
        (reply, ws)
    }

    #[tokio::test]
    async fn forwards_to_others_only() {
        let url = spawn_relay(8).await;
        let (ready_a, mut a) = hello(&url, "abcd").await;
        assert_eq!(ready_a, r#"{"type":"room_ready","room":"abcd","peers":0}"#);
        let (ready_b, mut b) = hello(&url, "ABCD").await;
        assert_eq!(ready_b, r#"{"type":"room_ready","room":"abcd","peers":1}"#);

        a.send(Message::Text(r#"{"type":"content"}"#.to_string().into())).await.unwrap();
        assert_eq!(next_text(&mut b).await, r#"{"type":"content"}"#);

        b.send(Message::Text("from b".to_string().into())).await.unwrap();
        assert_eq!(next_text(&mut a).await, "from b");
    }

    #[tokio::test]
    async fn full_room_gets_error() {
        let url = spawn_relay(1).await;
        let (_, _a) = hello(&url, "abcd").await;
        let (reply, _b) = hello(&url, "abcd").await;
        assert_eq!(reply, r#"{"type":"error","message":"room full"}"#);
    }
}
