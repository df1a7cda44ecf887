#![allow(dead_code)]

pub mod mock_channel;

use audio_pipes_core::{
    ConnectionInfo, EndpointCommand, EndpointId, EndpointMessage, Hub, HubCommand, HubConfig,
    HubEvent, MonitorId, MonitorRequest, MonitorUpdate, SessionId, Snapshot, TopologyRequest,
};
use mock_channel::MockChannel;
use std::collections::HashMap;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_test_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}

struct Connection {
    session: SessionId,
    channel: Arc<MockChannel<EndpointCommand>>,
}

/// A hub with one subscribed monitor and any number of mock endpoints
pub struct HubFixture {
    pub hub: Hub,
    pub monitor_id: MonitorId,
    pub monitor: Arc<MockChannel<MonitorUpdate>>,
    connections: HashMap<EndpointId, Connection>,
}

impl HubFixture {
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    pub fn with_config(config: HubConfig) -> Self {
        init_test_tracing();

        let mut hub = Hub::new(&config);
        let monitor_id = MonitorId::new();
        let monitor: Arc<MockChannel<MonitorUpdate>> = MockChannel::new();

        let event = hub.handle_command(HubCommand::SubscribeMonitor {
            id: monitor_id,
            channel: monitor.clone(),
        });
        assert!(matches!(event, HubEvent::MonitorSubscribed { .. }));
        monitor.take();

        Self {
            hub,
            monitor_id,
            monitor,
            connections: HashMap::new(),
        }
    }

    /// Open a top-level connection for `origin`; returns `"<origin>_"`
    pub fn connect(&mut self, origin: &str, title: &str) -> EndpointId {
        let channel: Arc<MockChannel<EndpointCommand>> = MockChannel::new();
        let session = SessionId::new();

        let event = self.hub.handle_command(HubCommand::ConnectEndpoint {
            info: ConnectionInfo {
                origin_id: Some(origin.to_string()),
                sub_origin_id: None,
                title: Some(title.to_string()),
                url: None,
            },
            session,
            channel: channel.clone(),
        });

        let id = match event {
            HubEvent::EndpointRegistered { id, .. } => id,
            other => panic!("Expected EndpointRegistered, got {:?}", other),
        };
        self.connections
            .insert(id.clone(), Connection { session, channel });
        id
    }

    pub fn send(&mut self, id: &EndpointId, message: EndpointMessage) -> HubEvent {
        self.hub.handle_command(HubCommand::EndpointMessage {
            id: id.clone(),
            message,
        })
    }

    pub fn connect_source(&mut self, origin: &str, title: &str) -> EndpointId {
        let id = self.connect(origin, title);
        self.send(&id, EndpointMessage::SourceAvailable { title: None });
        id
    }

    pub fn connect_destination(&mut self, origin: &str, title: &str) -> EndpointId {
        let id = self.connect(origin, title);
        self.send(&id, EndpointMessage::DestinationAvailable { title: None });
        id
    }

    pub fn apply(&mut self, destination: Option<&EndpointId>, sources: &[&EndpointId]) -> HubEvent {
        let topology =
            TopologyRequest::new(destination.cloned(), sources.iter().map(|s| (*s).clone()));
        self.hub.handle_command(HubCommand::MonitorRequest {
            id: self.monitor_id,
            request: MonitorRequest::SetTopology { topology },
        })
    }

    pub fn disconnect(&mut self, id: &EndpointId) -> HubEvent {
        let session = self.session(id);
        self.hub.handle_command(HubCommand::DisconnectEndpoint {
            id: id.clone(),
            session,
        })
    }

    pub fn session(&self, id: &EndpointId) -> SessionId {
        self.connections
            .get(id)
            .map(|c| c.session)
            .unwrap_or_else(|| panic!("No connection for {}", id))
    }

    pub fn channel(&self, id: &EndpointId) -> Arc<MockChannel<EndpointCommand>> {
        self.connections
            .get(id)
            .map(|c| c.channel.clone())
            .unwrap_or_else(|| panic!("No connection for {}", id))
    }

    /// Commands received by an endpoint since the last call
    pub fn received(&self, id: &EndpointId) -> Vec<EndpointCommand> {
        self.channel(id).take()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        for connection in self.connections.values() {
            connection.channel.take();
        }
        self.monitor.take();
    }

    /// Most recent snapshot pushed to the monitor
    pub fn last_snapshot(&self) -> Snapshot {
        match self.monitor.last() {
            Some(MonitorUpdate::Snapshot(snapshot)) => snapshot,
            None => panic!("Monitor received no snapshot"),
        }
    }
}
