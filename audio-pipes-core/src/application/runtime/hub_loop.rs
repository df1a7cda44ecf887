use crate::application::runtime::{CommandQueue, QueueError};
use crate::application::{Hub, HubCommand, HubConfig, HubEvent};
use tracing::trace;

/// Hub command loop - processes commands in batches
#[derive(Debug)]
pub struct HubLoop {
    /// Stateful coordinator
    hub: Hub,

    /// Inbound command queue
    inbound: CommandQueue,

    /// Outbound event queue (caller drains this)
    outbound: Vec<HubEvent>,

    /// Max commands to process per poll
    batch_size: usize,
}

impl HubLoop {
    pub fn new(config: &HubConfig) -> Self {
        Self {
            hub: Hub::new(config),
            inbound: CommandQueue::new(config.max_queue_size),
            outbound: Vec::new(),
            batch_size: config.batch_size.max(1),
        }
    }

    /// Submit a command (non-blocking)
    pub fn submit(&mut self, cmd: HubCommand) -> Result<(), QueueError> {
        self.inbound.push(cmd)
    }

    /// Process up to `batch_size` commands
    /// Returns number of commands processed
    pub fn poll(&mut self) -> usize {
        let mut processed = 0;

        while processed < self.batch_size {
            match self.inbound.pop() {
                Some(cmd) => {
                    let event = self.hub.handle_command(cmd);
                    trace!(?event, "Command processed");
                    self.outbound.push(event);
                    processed += 1;
                }
                None => break,
            }
        }

        processed
    }

    /// Drain all emitted events (caller's responsibility)
    pub fn drain_events(&mut self) -> Vec<HubEvent> {
        std::mem::take(&mut self.outbound)
    }

    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    /// Get reference to the hub (for queries)
    pub fn hub(&self) -> &Hub {
        &self.hub
    }
}
