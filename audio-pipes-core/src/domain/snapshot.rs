use crate::domain::{EndpointId, Registry};
use serde::{Deserialize, Serialize};

/// One row of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub id: EndpointId,
    pub title: String,
    pub active: bool,
}

/// Monitor view of the registry
///
/// An endpoint that announced both capabilities is listed in both sections,
/// each with its own activity flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub sources: Vec<NodeSummary>,
    pub destinations: Vec<NodeSummary>,
}

impl Snapshot {
    pub fn from_registry(registry: &Registry) -> Self {
        let mut snapshot = Self::default();

        for endpoint in registry.all() {
            if endpoint.is_source() {
                snapshot.sources.push(NodeSummary {
                    id: endpoint.id().clone(),
                    title: endpoint.title().to_string(),
                    active: endpoint.is_source_active(),
                });
            }
            if endpoint.is_destination() {
                snapshot.destinations.push(NodeSummary {
                    id: endpoint.id().clone(),
                    title: endpoint.title().to_string(),
                    active: endpoint.is_destination_active(),
                });
            }
        }

        snapshot
    }

    pub fn source(&self, id: &EndpointId) -> Option<&NodeSummary> {
        self.sources.iter().find(|node| &node.id == id)
    }

    pub fn destination(&self, id: &EndpointId) -> Option<&NodeSummary> {
        self.destinations.iter().find(|node| &node.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.destinations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Capability, EndpointChannel, EndpointCommand, SessionId};
    use crate::infrastructure::{Channel, TransportError};
    use std::sync::Arc;

    #[derive(Debug)]
    struct NullChannel;

    impl Channel<EndpointCommand> for NullChannel {
        fn send(&self, _message: EndpointCommand) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn register(registry: &mut Registry, id: &str, title: &str) {
        let channel: EndpointChannel = Arc::new(NullChannel);
        registry
            .register(channel, id.into(), SessionId::new(), title)
            .unwrap();
    }

    #[test]
    fn test_endpoints_without_capability_are_hidden() {
        let mut registry = Registry::new();
        register(&mut registry, "1_", "Tab A");

        let snapshot = Snapshot::from_registry(&registry);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_snapshot_filters_by_capability() {
        let mut registry = Registry::new();
        register(&mut registry, "1_", "Tab A");
        register(&mut registry, "2_", "Tab B");
        registry.set_capability(&"1_".into(), Capability::Source, None);
        registry.set_capability(&"2_".into(), Capability::Destination, None);

        let snapshot = Snapshot::from_registry(&registry);
        assert_eq!(snapshot.sources.len(), 1);
        assert_eq!(snapshot.destinations.len(), 1);

        let source = snapshot.source(&"1_".into()).unwrap();
        assert_eq!(source.title, "Tab A");
        assert!(!source.active);
        assert!(snapshot.destination(&"1_".into()).is_none());
    }

    #[test]
    fn test_dual_role_endpoint_listed_twice() {
        let mut registry = Registry::new();
        register(&mut registry, "1_", "Loopback");
        registry.set_capability(&"1_".into(), Capability::Source, None);
        registry.set_capability(&"1_".into(), Capability::Destination, None);
        registry
            .get_mut(&"1_".into())
            .unwrap()
            .set_destination_active(true);

        let snapshot = Snapshot::from_registry(&registry);
        assert!(!snapshot.source(&"1_".into()).unwrap().active);
        assert!(snapshot.destination(&"1_".into()).unwrap().active);
    }
}
