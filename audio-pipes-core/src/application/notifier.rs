use crate::domain::{MonitorChannel, MonitorId, MonitorUpdate, Snapshot};
use crate::infrastructure::TransportError;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Pushes snapshots to subscribed monitors
#[derive(Debug, Default)]
pub struct Notifier {
    subscribers: BTreeMap<MonitorId, MonitorChannel>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a monitor and send it the current snapshot right away
    ///
    /// The subscription is kept even if that first send fails.
    pub fn subscribe(
        &mut self,
        id: MonitorId,
        channel: MonitorChannel,
        snapshot: &Snapshot,
    ) -> Result<(), TransportError> {
        let result = channel.send(MonitorUpdate::Snapshot(snapshot.clone()));
        self.subscribers.insert(id, channel);
        debug!(monitor = %id, subscribers = self.subscribers.len(), "Monitor subscribed");
        result
    }

    pub fn unsubscribe(&mut self, id: &MonitorId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    pub fn is_subscribed(&self, id: &MonitorId) -> bool {
        self.subscribers.contains_key(id)
    }

    /// Send a snapshot to one monitor; `None` if it is not subscribed
    pub fn send_to(
        &self,
        id: &MonitorId,
        snapshot: &Snapshot,
    ) -> Option<Result<(), TransportError>> {
        let channel = self.subscribers.get(id)?;
        Some(channel.send(MonitorUpdate::Snapshot(snapshot.clone())))
    }

    /// Send a snapshot to every monitor; returns how many sends succeeded
    pub fn publish(&self, snapshot: &Snapshot) -> usize {
        let mut delivered = 0;
        for (id, channel) in &self.subscribers {
            match channel.send(MonitorUpdate::Snapshot(snapshot.clone())) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(monitor = %id, error = %e, "Failed to publish snapshot"),
            }
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
