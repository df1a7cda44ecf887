use crate::application::HubCommand;
use std::collections::VecDeque;

/// Bounded FIFO of hub commands
///
/// At most one `CheckDeadlines` is queued at a time: a newer check folds into
/// the pending one and advances its instant, so a slow hub never builds up a
/// backlog of clock ticks.
#[derive(Debug)]
pub struct CommandQueue {
    queue: VecDeque<HubCommand>,
    max_size: usize,
}

impl CommandQueue {
    pub fn new(max_size: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Push a command; fails when full unless it coalesces with a queued check
    pub fn push(&mut self, cmd: HubCommand) -> Result<(), QueueError> {
        if let HubCommand::CheckDeadlines { now } = cmd {
            if let Some(queued) = self.pending_check() {
                if now > *queued {
                    *queued = now;
                }
                return Ok(());
            }
        }

        if self.queue.len() >= self.max_size {
            return Err(QueueError::Full { max: self.max_size });
        }
        self.queue.push_back(cmd);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<HubCommand> {
        self.queue.pop_front()
    }

    fn pending_check(&mut self) -> Option<&mut std::time::Instant> {
        self.queue.iter_mut().find_map(|cmd| match cmd {
            HubCommand::CheckDeadlines { now } => Some(now),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("Queue is full (max size: {max})")]
    Full { max: usize },
}
