use audio_pipes_core::{Channel, TransportError};
use std::fmt;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Hub-facing end of a connection's outbound queue
///
/// `try_send` keeps the hub from ever waiting on a slow socket: a full queue
/// fails the send instead.
pub struct OutboundChannel<M> {
    sender: mpsc::Sender<M>,
}

impl<M> OutboundChannel<M> {
    pub fn new(sender: mpsc::Sender<M>) -> Self {
        Self { sender }
    }
}

impl<M> fmt::Debug for OutboundChannel<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundChannel")
            .field("capacity", &self.sender.max_capacity())
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

impl<M: Send> Channel<M> for OutboundChannel<M> {
    fn send(&self, message: M) -> Result<(), TransportError> {
        self.sender.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => TransportError::ChannelFull {
                capacity: self.sender.max_capacity(),
            },
            TrySendError::Closed(_) => TransportError::ChannelClosed,
        })
    }
}
