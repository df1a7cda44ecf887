use crate::domain::EndpointId;
use std::collections::BTreeSet;

/// Why a topology request was not applied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("Topology request has no destination")]
    MissingDestination,

    #[error("Destination {0} is not registered")]
    UnknownDestination(EndpointId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyState {
    Empty,
    Active,
}

/// The single active mixing topology
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    destination: Option<EndpointId>,
    sources: BTreeSet<EndpointId>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self) -> Option<&EndpointId> {
        self.destination.as_ref()
    }

    pub fn sources(&self) -> impl Iterator<Item = &EndpointId> {
        self.sources.iter()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn has_source(&self, id: &EndpointId) -> bool {
        self.sources.contains(id)
    }

    pub fn is_destination(&self, id: &EndpointId) -> bool {
        self.destination.as_ref() == Some(id)
    }

    /// True if the endpoint is the destination or one of the sources
    pub fn involves(&self, id: &EndpointId) -> bool {
        self.is_destination(id) || self.has_source(id)
    }

    pub fn is_empty(&self) -> bool {
        self.destination.is_none() && self.sources.is_empty()
    }

    pub fn state(&self) -> TopologyState {
        if self.destination.is_some() {
            TopologyState::Active
        } else {
            TopologyState::Empty
        }
    }

    pub(crate) fn set_destination(&mut self, id: EndpointId) {
        self.destination = Some(id);
    }

    /// Returns false if the source was already present
    pub(crate) fn insert_source(&mut self, id: EndpointId) -> bool {
        self.sources.insert(id)
    }

    /// Empty the topology, returning what it held
    pub(crate) fn take(&mut self) -> Topology {
        std::mem::take(self)
    }
}
