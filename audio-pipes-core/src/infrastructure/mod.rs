pub mod channel;
pub mod error;

pub use channel::Channel;
pub use error::TransportError;
