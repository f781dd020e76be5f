//! Single-task event loop for a [`RoomSession`].

use std::future::pending;
use std::ops::ControlFlow;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::controller::RoomSession;
use crate::editor::Editor;
use crate::protocol::RoomMessage;

/// Drive `session` until the host input channel closes or `on_input`
/// returns [`ControlFlow::Break`].
///
/// Inbound room messages, host input and the publish deadline are handled
/// one at a time, so no handler ever observes another half-done. Any edit
/// still waiting for its quiet period is published on the way out.
pub async fn run_session<E, I, F>(
    session: &mut RoomSession<E>,
    mut input: mpsc::Receiver<I>,
    mut on_input: F,
) where
    E: Editor,
    F: FnMut(&mut RoomSession<E>, I, Instant) -> ControlFlow<()>,
{
    let mut inbound = session.take_inbound();
    if inbound.is_none() {
        warn!(room = %session.room(), "No inbound room stream, running local-only");
    }

    loop {
        let deadline = session.next_publish_deadline();

        tokio::select! {
            msg = recv_inbound(&mut inbound) => match msg {
                Some(msg) => session.dispatch(msg),
                None => {
                    warn!(room = %session.room(), "Inbound room stream closed");
                    inbound = None;
                }
            },

            item = input.recv() => match item {
                Some(item) => {
                    if on_input(session, item, Instant::now()).is_break() {
                        debug!("Host requested stop");
                        break;
                    }
                }
                None => break,
            },

            _ = wait_until(deadline) => session.poll_publish(Instant::now()),
        }
    }

    session.flush_pending();
}

async fn recv_inbound(inbound: &mut Option<mpsc::Receiver<RoomMessage>>) -> Option<RoomMessage> {
    match inbound {
        Some(rx) => rx.recv().await,
        None => pending().await,
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => pending().await,
    }
}
