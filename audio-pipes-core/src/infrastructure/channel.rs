use crate::infrastructure::TransportError;
use std::fmt;

/// Outbound, non-blocking send target owned by the transport layer
///
/// The hub only borrows channels. A send must return immediately; a peer that
/// went away is reported as an error rather than a panic or a wait.
pub trait Channel<M>: Send + Sync + fmt::Debug {
    fn send(&self, message: M) -> Result<(), TransportError>;
}
