//! Message transport abstraction
//!
//! World objects never talk to sockets directly. Anything that can deliver
//! a [`GameMessage`] on behalf of an object implements [`MessageTransport`];
//! the drop operation is handed one explicitly.

use std::sync::Arc;

use crate::game::guid::ObjectGuid;
use crate::protocol::messages::GameMessage;

/// Fire-and-forget delivery of game messages
pub trait MessageTransport: Send + Sync {
    /// Queue a message concerning `guid` for delivery
    ///
    /// Delivery failures are the transport's concern and are not reported
    /// back to the caller.
    fn send(&self, guid: ObjectGuid, message: GameMessage);
}

impl<T: MessageTransport + ?Sized> MessageTransport for Arc<T> {
    fn send(&self, guid: ObjectGuid, message: GameMessage) {
        (**self).send(guid, message)
    }
}

impl<T: MessageTransport + ?Sized> MessageTransport for &T {
    fn send(&self, guid: ObjectGuid, message: GameMessage) {
        (**self).send(guid, message)
    }
}
