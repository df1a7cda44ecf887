/// Failure of a single outbound send
///
/// Never propagated past the send call site: the hub logs it and carries on
/// with the remaining targets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Channel closed")]
    ChannelClosed,

    #[error("Channel full (capacity: {capacity})")]
    ChannelFull { capacity: usize },

    #[error("Send failed: {0}")]
    SendFailed(String),
}
