//! Stateless routing of signaling messages
//!
//! Offers and candidates go to the topology destination, whoever sends them.
//! Answers go to the endpoint named in the answer. Nothing is retried and the
//! sender is never told about a drop.

use crate::domain::{EndpointCommand, EndpointId, Registry, SignalingMessage, Topology};
use crate::infrastructure::TransportError;
use tracing::{debug, warn};

/// Where a signaling message ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    Delivered { to: EndpointId },
    /// Offer or candidate while no destination is set
    NoDestination,
    /// Target is not in the registry
    UnknownTarget { target: EndpointId },
    SendFailed {
        to: EndpointId,
        error: TransportError,
    },
}

impl RelayOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, RelayOutcome::Delivered { .. })
    }
}

pub fn route(
    registry: &Registry,
    topology: &Topology,
    sender: &EndpointId,
    message: SignalingMessage,
) -> RelayOutcome {
    let kind = message.kind();

    let (target, command) = match message {
        SignalingMessage::Offer { sdp } => match topology.destination() {
            Some(destination) => (
                destination.clone(),
                EndpointCommand::Offer {
                    sdp,
                    origin_id: sender.clone(),
                },
            ),
            None => {
                debug!(%sender, kind, "No destination set, dropping");
                return RelayOutcome::NoDestination;
            }
        },
        SignalingMessage::Candidate { candidate } => match topology.destination() {
            Some(destination) => (destination.clone(), EndpointCommand::Candidate { candidate }),
            None => {
                debug!(%sender, kind, "No destination set, dropping");
                return RelayOutcome::NoDestination;
            }
        },
        SignalingMessage::Answer { sdp, target_id } => (
            target_id.clone(),
            EndpointCommand::Answer { sdp, target_id },
        ),
    };

    let Some(endpoint) = registry.get(&target) else {
        debug!(%sender, %target, kind, "Target not registered, dropping");
        return RelayOutcome::UnknownTarget { target };
    };

    match endpoint.send(command) {
        Ok(()) => {
            debug!(%sender, %target, kind, "Relayed");
            RelayOutcome::Delivered { to: target }
        }
        Err(error) => {
            warn!(%sender, %target, kind, %error, "Relay send failed");
            RelayOutcome::SendFailed { to: target, error }
        }
    }
}
