pub mod endpoint;
pub mod ids;
pub mod message;
pub mod registry;
pub mod snapshot;
pub mod topology;

pub use endpoint::{Capability, ConnectionInfo, Endpoint, EndpointChannel, MonitorChannel};
pub use ids::{EndpointId, MonitorId, SessionId};
pub use message::{
    EndpointCommand, EndpointMessage, EndpointRef, MonitorRequest, MonitorUpdate,
    SignalingMessage, TopologyRequest,
};
pub use registry::{CapabilityUpdate, Registry, RegistryError};
pub use snapshot::{NodeSummary, Snapshot};
pub use topology::{Topology, TopologyError, TopologyState};
