use crate::domain::{
    ConnectionInfo, EndpointChannel, EndpointId, EndpointMessage, MonitorChannel, MonitorId,
    MonitorRequest, SessionId,
};
use std::time::Instant;

/// Commands processed by the hub, one at a time
#[derive(Debug, Clone)]
pub enum HubCommand {
    /// A transport connection for an endpoint was opened
    ConnectEndpoint {
        info: ConnectionInfo,
        session: SessionId,
        channel: EndpointChannel,
    },

    /// A frame arrived from an endpoint
    EndpointMessage {
        id: EndpointId,
        message: EndpointMessage,
    },

    /// An endpoint's transport connection closed
    DisconnectEndpoint { id: EndpointId, session: SessionId },

    /// A monitor connected and wants snapshots
    SubscribeMonitor {
        id: MonitorId,
        channel: MonitorChannel,
    },

    UnsubscribeMonitor { id: MonitorId },

    /// A frame arrived from a monitor
    MonitorRequest {
        id: MonitorId,
        request: MonitorRequest,
    },

    /// Tear down the topology if a source missed its offer deadline
    CheckDeadlines { now: Instant },
}

impl HubCommand {
    pub fn name(&self) -> &'static str {
        match self {
            HubCommand::ConnectEndpoint { .. } => "ConnectEndpoint",
            HubCommand::EndpointMessage { .. } => "EndpointMessage",
            HubCommand::DisconnectEndpoint { .. } => "DisconnectEndpoint",
            HubCommand::SubscribeMonitor { .. } => "SubscribeMonitor",
            HubCommand::UnsubscribeMonitor { .. } => "UnsubscribeMonitor",
            HubCommand::MonitorRequest { .. } => "MonitorRequest",
            HubCommand::CheckDeadlines { .. } => "CheckDeadlines",
        }
    }
}
