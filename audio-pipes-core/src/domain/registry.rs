use crate::domain::{Capability, Endpoint, EndpointChannel, EndpointId, SessionId};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Errors that can occur when working with the registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid endpoint id: {0}")]
    InvalidId(EndpointId),
}

/// Result of a capability announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityUpdate {
    /// No endpoint with that id
    Unknown,
    /// Flag and title were already set
    Unchanged,
    /// A field visible in snapshots changed
    Changed,
}

/// Live set of connected endpoints, keyed by id
///
/// Iteration order is the id order, so snapshots are stable between calls.
#[derive(Debug, Default)]
pub struct Registry {
    endpoints: BTreeMap<EndpointId, Endpoint>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an endpoint; a stale entry with the same id is replaced
    #[instrument(skip(self, channel, title))]
    pub fn register(
        &mut self,
        channel: EndpointChannel,
        id: EndpointId,
        session: SessionId,
        title: impl Into<String>,
    ) -> Result<&Endpoint, RegistryError> {
        if !id.is_valid() {
            return Err(RegistryError::InvalidId(id));
        }

        let endpoint = Endpoint::new(id.clone(), session, title, channel);
        match self.endpoints.entry(id) {
            Entry::Occupied(mut slot) => {
                let stale = slot.insert(endpoint);
                debug!(stale_session = %stale.session(), "Replaced stale endpoint entry");
                Ok(slot.into_mut())
            }
            Entry::Vacant(slot) => Ok(slot.insert(endpoint)),
        }
    }

    pub fn get(&self, id: &EndpointId) -> Option<&Endpoint> {
        self.endpoints.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &EndpointId) -> Option<&mut Endpoint> {
        self.endpoints.get_mut(id)
    }

    pub fn contains(&self, id: &EndpointId) -> bool {
        self.endpoints.contains_key(id)
    }

    /// Mark an endpoint as source or destination, optionally renaming it
    pub fn set_capability(
        &mut self,
        id: &EndpointId,
        capability: Capability,
        title: Option<&str>,
    ) -> CapabilityUpdate {
        match self.endpoints.get_mut(id) {
            Some(endpoint) => {
                if endpoint.announce(capability, title) {
                    CapabilityUpdate::Changed
                } else {
                    CapabilityUpdate::Unchanged
                }
            }
            None => CapabilityUpdate::Unknown,
        }
    }

    pub fn remove(&mut self, id: &EndpointId) -> Option<Endpoint> {
        self.endpoints.remove(id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
