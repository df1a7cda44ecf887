use audio_pipes_core::{Channel, TransportError};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory channel that records everything sent through it
pub struct MockChannel<M> {
    sent: Mutex<Vec<M>>,
    failing: AtomicBool,
}

impl<M> MockChannel<M> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        })
    }

    /// Make every following send fail as if the peer went away
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Take all recorded messages
    pub fn take(&self) -> Vec<M> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }

    pub fn len(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl<M: Clone> MockChannel<M> {
    pub fn last(&self) -> Option<M> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl<M> fmt::Debug for MockChannel<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockChannel")
            .field("failing", &self.failing.load(Ordering::SeqCst))
            .finish()
    }
}

impl<M: Send> Channel<M> for MockChannel<M> {
    fn send(&self, message: M) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::ChannelClosed);
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}
