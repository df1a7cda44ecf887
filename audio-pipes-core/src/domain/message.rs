//! Wire messages exchanged with endpoints and monitors
//!
//! Every frame is a JSON object tagged by `type`. Offer, answer and candidate
//! bodies are kept as raw JSON values and relayed without inspection.

use crate::domain::{EndpointId, Snapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frames received from an endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EndpointMessage {
    /// Endpoint can produce audio
    #[serde(rename = "audio_source_available")]
    SourceAvailable {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },

    /// Endpoint can consume audio
    #[serde(rename = "audio_destination_available")]
    DestinationAvailable {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },

    #[serde(rename = "rtc_offer")]
    Offer {
        #[serde(rename = "offer")]
        sdp: Value,
    },

    /// Answer addressed to the endpoint that originated the offer
    #[serde(rename = "rtc_answer")]
    Answer {
        #[serde(rename = "answer")]
        sdp: Value,
        #[serde(rename = "portId")]
        target_id: EndpointId,
    },

    #[serde(rename = "rtc_candidate")]
    Candidate { candidate: Value },
}

impl EndpointMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            EndpointMessage::SourceAvailable { .. } => "audio_source_available",
            EndpointMessage::DestinationAvailable { .. } => "audio_destination_available",
            EndpointMessage::Offer { .. } => "rtc_offer",
            EndpointMessage::Answer { .. } => "rtc_answer",
            EndpointMessage::Candidate { .. } => "rtc_candidate",
        }
    }
}

/// Frames sent to an endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EndpointCommand {
    /// Relayed offer, stamped with the originating endpoint
    #[serde(rename = "rtc_offer")]
    Offer {
        #[serde(rename = "offer")]
        sdp: Value,
        #[serde(rename = "portId")]
        origin_id: EndpointId,
    },

    #[serde(rename = "rtc_answer")]
    Answer {
        #[serde(rename = "answer")]
        sdp: Value,
        #[serde(rename = "portId")]
        target_id: EndpointId,
    },

    #[serde(rename = "rtc_candidate")]
    Candidate { candidate: Value },

    /// Await offers for the given topology
    #[serde(rename = "audio_prepare_receive")]
    PrepareReceive {
        #[serde(rename = "mixer")]
        topology: TopologyRequest,
    },

    /// Create and send an offer
    #[serde(rename = "rtc_init")]
    InitiateOffer,

    /// Drop the current peer session
    #[serde(rename = "reset")]
    Reset,
}

/// Signaling payload routed by the relay
#[derive(Debug, Clone, PartialEq)]
pub enum SignalingMessage {
    Offer { sdp: Value },
    Answer { sdp: Value, target_id: EndpointId },
    Candidate { candidate: Value },
}

impl SignalingMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            SignalingMessage::Offer { .. } => "offer",
            SignalingMessage::Answer { .. } => "answer",
            SignalingMessage::Candidate { .. } => "candidate",
        }
    }
}

/// Reference to an endpoint inside a topology request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRef {
    pub id: EndpointId,
}

/// Requested topology: one destination, any number of sources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<EndpointRef>,
    #[serde(default)]
    pub sources: Vec<EndpointRef>,
}

impl TopologyRequest {
    pub fn new<I>(destination: Option<EndpointId>, sources: I) -> Self
    where
        I: IntoIterator<Item = EndpointId>,
    {
        Self {
            destination: destination.map(|id| EndpointRef { id }),
            sources: sources.into_iter().map(|id| EndpointRef { id }).collect(),
        }
    }

    pub fn destination_id(&self) -> Option<&EndpointId> {
        self.destination.as_ref().map(|d| &d.id)
    }

    /// Source ids in request order, duplicates included
    pub fn source_ids(&self) -> impl Iterator<Item = &EndpointId> {
        self.sources.iter().map(|s| &s.id)
    }
}

/// Frames received from a monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MonitorRequest {
    #[serde(rename = "refresh_nodes")]
    RequestSnapshot,

    #[serde(rename = "mixer_update")]
    SetTopology {
        #[serde(rename = "data")]
        topology: TopologyRequest,
    },

    /// Accepted for compatibility, has no effect
    #[serde(rename = "mixer_gains")]
    SetGains {
        #[serde(default)]
        data: Value,
    },
}

/// Frames sent to a monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MonitorUpdate {
    #[serde(rename = "audio_nodes")]
    Snapshot(Snapshot),
}
