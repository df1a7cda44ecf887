mod command_queue;
mod hub_loop;

pub use command_queue::{CommandQueue, QueueError};
pub use hub_loop::HubLoop;
