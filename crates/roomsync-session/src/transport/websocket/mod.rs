//! WebSocket transport backed by a room relay.
//!
//! Each opened room gets its own connection task. The task announces the
//! room to the relay, then forwards JSON text frames both ways and
//! reconnects with exponential backoff until the session drops the link.

mod client;
mod relay_protocol;

use std::time::Duration;

use roomsync_common::{RoomId, SyncError};
use tokio::sync::mpsc;
use tracing::info;

use super::{RoomLink, RoomPublisher, RoomTransport};
use crate::protocol::RoomMessage;

use client::run_room_client;

/// Connection settings for [`WsTransport`].
#[derive(Debug, Clone)]
pub struct WsTransportConfig {
    /// Relay URL (`ws://` or `wss://`). Empty disables the transport.
    pub url: String,
    pub connect_timeout: Duration,
    pub reconnect_delay: Duration,
    pub max_reconnect_delay: Duration,
    /// Capacity of the outbound and inbound queues.
    pub queue_capacity: usize,
}

impl Default for WsTransportConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            connect_timeout: Duration::from_secs(15),
            reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(30),
            queue_capacity: 256,
        }
    }
}

pub struct WsTransport {
    config: WsTransportConfig,
}

impl WsTransport {
    pub fn new(config: WsTransportConfig) -> Self {
        Self { config }
    }
}

impl RoomTransport for WsTransport {
    /// Spawns the connection task on the current tokio runtime.
    ///
    /// Fails with `TransportUnavailable` when no relay URL is configured or
    /// when called outside a runtime.
    fn open(&self, room: &RoomId) -> Result<RoomLink, SyncError> {
        if self.config.url.is_empty() {
            return Err(SyncError::TransportUnavailable(
                "no relay url configured".into(),
            ));
        }
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| SyncError::TransportUnavailable(e.to_string()))?;

        let (outbound_tx, outbound_rx) = mpsc::channel(self.config.queue_capacity);
        let (inbound_tx, inbound_rx) = mpsc::channel(self.config.queue_capacity);

        info!(room = %room, url = %self.config.url, "Opening relay transport");
        handle.spawn(run_room_client(
            self.config.clone(),
            room.clone(),
            outbound_rx,
            inbound_tx,
        ));

        Ok(RoomLink {
            publisher: Box::new(WsPublisher { tx: outbound_tx }),
            inbound: inbound_rx,
        })
    }
}

struct WsPublisher {
    tx: mpsc::Sender<RoomMessage>,
}

impl RoomPublisher for WsPublisher {
    fn publish(&self, message: &RoomMessage) -> Result<(), SyncError> {
        self.tx.try_send(message.clone()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                SyncError::TransportUnavailable("outbound queue full".into())
            }
            mpsc::error::TrySendError::Closed(_) => {
                SyncError::TransportUnavailable("connection task stopped".into())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> RoomId {
        RoomId::parse("abcd", 4).unwrap()
    }

    #[test]
    fn empty_url_is_unavailable() {
        let transport = WsTransport::new(WsTransportConfig::default());
        let err = transport.open(&room()).unwrap_err();
        assert!(matches!(err, SyncError::TransportUnavailable(_)));
    }

    #[test]
    fn no_runtime_is_unavailable() {
        let transport = WsTransport::new(WsTransportConfig {
            url: "ws://127.0.0.1:9".into(),
            ..WsTransportConfig::default()
        });
        let err = transport.open(&room()).unwrap_err();
        assert!(matches!(err, SyncError::TransportUnavailable(_)));
    }

    #[tokio::test]
    async fn open_inside_runtime_returns_link() {
        let transport = WsTransport::new(WsTransportConfig {
            url: "ws://127.0.0.1:9".into(),
            reconnect_delay: Duration::from_secs(60),
            ..WsTransportConfig::default()
        });
        let link = transport.open(&room()).unwrap();
        let msg = RoomMessage::Unknown;
        assert!(link.publisher.publish(&msg).is_ok());
    }
}
