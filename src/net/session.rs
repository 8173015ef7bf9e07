//! Client sessions
//!
//! A session is the outbound half of a client connection as seen by the
//! world: a bounded queue of game messages drained by the connection task.
//! - Non-blocking sends for world code ([`MessageTransport`])
//! - Awaitable sends for async callers
//! - Sent and dropped message counters

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{trace, warn};

use super::transport::MessageTransport;
use crate::error::{Result, WorldError};
use crate::game::guid::ObjectGuid;
use crate::protocol::messages::GameMessage;

/// Unique session identifier
pub type SessionId = u64;

/// A message waiting in a session's outbound queue
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Object the message concerns
    pub guid: ObjectGuid,
    /// The message itself
    pub message: GameMessage,
}

/// A connected client's outbound queue
pub struct Session {
    /// Unique session identifier
    pub id: SessionId,
    /// Outbound message queue
    outbound_tx: mpsc::Sender<OutboundMessage>,
    /// Messages queued successfully
    sent: AtomicU64,
    /// Messages discarded because the queue was full or closed
    dropped: AtomicU64,
}

impl Session {
    /// Create a session around an existing sender
    pub fn new(id: SessionId, outbound_tx: mpsc::Sender<OutboundMessage>) -> Self {
        Self {
            id,
            outbound_tx,
            sent: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Create a session together with the receiving end of its queue
    pub fn channel(id: SessionId, queue_size: usize) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(queue_size.max(1));
        (Self::new(id, tx), rx)
    }

    /// Queue a message, waiting for room if the queue is full
    pub async fn send_async(&self, guid: ObjectGuid, message: GameMessage) -> Result<()> {
        self.outbound_tx
            .send(OutboundMessage { guid, message })
            .await
            .map_err(|_| WorldError::ConnectionClosed(self.id))?;
        self.sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Check if the receiving side is gone
    pub fn is_closed(&self) -> bool {
        self.outbound_tx.is_closed()
    }

    /// Messages queued successfully
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Messages discarded
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl MessageTransport for Session {
    fn send(&self, guid: ObjectGuid, message: GameMessage) {
        let opcode = message.opcode;
        let len = message.payload.len();

        match self.outbound_tx.try_send(OutboundMessage { guid, message }) {
            Ok(()) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                trace!(session_id = self.id, guid = %guid, opcode = %opcode, len = len, "Message queued");
            }
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(session_id = self.id, guid = %guid, opcode = %opcode, "Outbound queue full, message dropped");
            }
            Err(TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(session_id = self.id, guid = %guid, opcode = %opcode, "Session closed, message dropped");
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("sent", &self.sent_count())
            .field("dropped", &self.dropped_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::GameMessageOpcode;
    use bytes::Bytes;

    fn message() -> GameMessage {
        GameMessage::new(GameMessageOpcode::UpdatePosition, Bytes::from_static(&[1, 2, 3, 4]))
    }

    #[test]
    fn test_send_queues_message() {
        let (session, mut rx) = Session::channel(1, 4);
        session.send(ObjectGuid::new(0x8000_0001), message());

        let queued = rx.try_recv().unwrap();
        assert_eq!(queued.guid, ObjectGuid::new(0x8000_0001));
        assert_eq!(queued.message.opcode, GameMessageOpcode::UpdatePosition);
        assert_eq!(session.sent_count(), 1);
    }

    #[test]
    fn test_full_queue_drops() {
        let (session, _rx) = Session::channel(1, 1);
        session.send(ObjectGuid::new(1), message());
        session.send(ObjectGuid::new(2), message());

        assert_eq!(session.sent_count(), 1);
        assert_eq!(session.dropped_count(), 1);
    }

    #[test]
    fn test_closed_session_drops() {
        let (session, rx) = Session::channel(1, 4);
        drop(rx);

        assert!(session.is_closed());
        session.send(ObjectGuid::new(1), message());
        assert_eq!(session.dropped_count(), 1);
    }

    #[test]
    fn test_send_async() {
        let (session, mut rx) = Session::channel(7, 1);
        tokio_test::block_on(session.send_async(ObjectGuid::new(1), message())).unwrap();
        assert!(rx.try_recv().is_ok());

        drop(rx);
        let result = tokio_test::block_on(session.send_async(ObjectGuid::new(1), message()));
        assert!(matches!(result, Err(WorldError::ConnectionClosed(7))));
    }
}
