use crate::application::RelayOutcome;
use crate::domain::{Capability, EndpointId, MonitorId, TopologyError};

/// Outcome of one processed `HubCommand`
#[derive(Debug, Clone, PartialEq)]
pub enum HubEvent {
    /// Endpoint entered the registry
    EndpointRegistered {
        id: EndpointId,
        replaced: bool,
        topology_reset: bool,
    },

    /// Endpoint announced a capability
    CapabilityAnnounced {
        id: EndpointId,
        capability: Capability,
        changed: bool,
    },

    /// Signaling message routed (or dropped)
    SignalRelayed {
        from: EndpointId,
        kind: &'static str,
        outcome: RelayOutcome,
    },

    /// Endpoint left the registry
    EndpointRemoved { id: EndpointId, topology_reset: bool },

    /// Disconnect of a connection that was already superseded
    DisconnectIgnored { id: EndpointId },

    /// Topology request applied
    TopologyApplied {
        destination: EndpointId,
        sources: Vec<EndpointId>,
        skipped: Vec<EndpointId>,
    },

    /// Topology request aborted after teardown
    TopologyRejected { reason: TopologyError },

    MonitorSubscribed { id: MonitorId, snapshot_delivered: bool },

    MonitorUnsubscribed { id: MonitorId },

    /// Snapshot sent to a single monitor on request
    SnapshotSent { monitor: MonitorId, delivered: bool },

    /// Gain updates are accepted but have no effect
    GainsIgnored { monitor: MonitorId },

    /// Sources missed their offer deadline; topology was torn down
    OfferTimedOut { sources: Vec<EndpointId> },

    /// Nothing overdue
    DeadlinesChecked { pending: usize },

    /// Command failed
    CommandFailed { command: String, reason: String },
}
