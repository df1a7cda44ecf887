use std::time::Duration;

/// Tuning knobs for the hub and its command loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// How long a source may take to answer `InitiateOffer` with an offer.
    /// `None` waits forever.
    pub offer_timeout: Option<Duration>,

    /// Max commands processed per `HubLoop::poll`
    pub batch_size: usize,

    /// Max commands waiting in the inbound queue
    pub max_queue_size: usize,
}

impl HubConfig {
    pub fn with_offer_timeout(mut self, timeout: Duration) -> Self {
        self.offer_timeout = Some(timeout);
        self
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            offer_timeout: None,
            batch_size: 32,
            max_queue_size: 1024,
        }
    }
}
