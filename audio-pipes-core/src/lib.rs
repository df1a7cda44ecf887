// Domain layer (endpoints, registry, topology, wire messages)
pub mod domain;

// Application layer (coordinator, relay, notifier, runtime)
pub mod application;

// Infrastructure layer (transport seam)
pub mod infrastructure;

pub use application::runtime::{CommandQueue, HubLoop, QueueError};
pub use application::{
    relay, ApplyReport, Hub, HubCommand, HubConfig, HubEvent, Mixer, Notifier, RelayOutcome,
    TeardownReport,
};
pub use domain::{
    Capability, CapabilityUpdate, ConnectionInfo, Endpoint, EndpointChannel, EndpointCommand, EndpointId,
    EndpointMessage, EndpointRef, MonitorChannel, MonitorId, MonitorRequest, MonitorUpdate,
    NodeSummary, Registry, RegistryError, SessionId, SignalingMessage, Snapshot, Topology,
    TopologyError, TopologyRequest, TopologyState,
};
pub use infrastructure::{Channel, TransportError};
