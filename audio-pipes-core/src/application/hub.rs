use crate::application::{relay, HubCommand, HubConfig, HubEvent, Mixer, Notifier};
use crate::domain::{
    Capability, CapabilityUpdate, ConnectionInfo, EndpointChannel, EndpointId, EndpointMessage,
    MonitorChannel, MonitorId, MonitorRequest, Registry, SessionId, SignalingMessage, Snapshot,
    Topology, TopologyRequest,
};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Coordinator owning the registry, the mixer and the monitor subscriptions
///
/// Every mutation goes through `handle_command`, one command at a time.
#[derive(Debug, Default)]
pub struct Hub {
    registry: Registry,
    mixer: Mixer,
    notifier: Notifier,
}

impl Hub {
    pub fn new(config: &HubConfig) -> Self {
        Self {
            registry: Registry::new(),
            mixer: Mixer::new(config.offer_timeout),
            notifier: Notifier::new(),
        }
    }

    /// Process a single command and return the resulting event
    #[instrument(skip(self, command), fields(command = command.name()))]
    pub fn handle_command(&mut self, command: HubCommand) -> HubEvent {
        match command {
            HubCommand::ConnectEndpoint {
                info,
                session,
                channel,
            } => self.handle_connect_endpoint(info, session, channel),

            HubCommand::EndpointMessage { id, message } => {
                self.handle_endpoint_message(id, message)
            }

            HubCommand::DisconnectEndpoint { id, session } => {
                self.handle_disconnect_endpoint(id, session)
            }

            HubCommand::SubscribeMonitor { id, channel } => {
                self.handle_subscribe_monitor(id, channel)
            }

            HubCommand::UnsubscribeMonitor { id } => self.handle_unsubscribe_monitor(id),

            HubCommand::MonitorRequest { id, request } => {
                self.handle_monitor_request(id, request)
            }

            HubCommand::CheckDeadlines { now } => self.handle_check_deadlines(now),
        }
    }

    // Queries

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn topology(&self) -> &Topology {
        self.mixer.topology()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_registry(&self.registry)
    }

    pub fn monitor_count(&self) -> usize {
        self.notifier.len()
    }

    pub fn pending_offers(&self) -> usize {
        self.mixer.pending_offers()
    }

    fn publish(&self) {
        let delivered = self.notifier.publish(&self.snapshot());
        debug!(delivered, "Snapshot published");
    }

    fn handle_connect_endpoint(
        &mut self,
        info: ConnectionInfo,
        session: SessionId,
        channel: EndpointChannel,
    ) -> HubEvent {
        let id = info.endpoint_id();
        let replaced = self.registry.contains(&id);

        // The new connection starts with no role, so the old one leaves the topology first
        let topology_reset = replaced
            && self
                .mixer
                .on_endpoint_removed(&mut self.registry, &id)
                .is_some();

        if let Err(e) = self
            .registry
            .register(channel, id.clone(), session, info.derive_title())
        {
            warn!(error = %e, "Refusing endpoint");
            return HubEvent::CommandFailed {
                command: "ConnectEndpoint".to_string(),
                reason: e.to_string(),
            };
        }

        info!(endpoint = %id, %session, replaced, topology_reset, "Endpoint connected");

        // A replaced entry may have been visible; a fresh one is not yet
        if replaced {
            self.publish();
        }

        HubEvent::EndpointRegistered {
            id,
            replaced,
            topology_reset,
        }
    }

    fn handle_endpoint_message(&mut self, id: EndpointId, message: EndpointMessage) -> HubEvent {
        let signal = match message {
            EndpointMessage::SourceAvailable { title } => {
                return self.announce(id, Capability::Source, title);
            }
            EndpointMessage::DestinationAvailable { title } => {
                return self.announce(id, Capability::Destination, title);
            }
            EndpointMessage::Offer { sdp } => {
                self.mixer.offer_received(&id);
                SignalingMessage::Offer { sdp }
            }
            EndpointMessage::Answer { sdp, target_id } => {
                SignalingMessage::Answer { sdp, target_id }
            }
            EndpointMessage::Candidate { candidate } => SignalingMessage::Candidate { candidate },
        };

        let kind = signal.kind();
        let outcome = relay::route(&self.registry, self.mixer.topology(), &id, signal);

        HubEvent::SignalRelayed {
            from: id,
            kind,
            outcome,
        }
    }

    fn announce(
        &mut self,
        id: EndpointId,
        capability: Capability,
        title: Option<String>,
    ) -> HubEvent {
        match self
            .registry
            .set_capability(&id, capability, title.as_deref())
        {
            CapabilityUpdate::Unknown => HubEvent::CommandFailed {
                command: "EndpointMessage".to_string(),
                reason: format!("Endpoint {} is not registered", id),
            },
            CapabilityUpdate::Unchanged => HubEvent::CapabilityAnnounced {
                id,
                capability,
                changed: false,
            },
            CapabilityUpdate::Changed => {
                info!(endpoint = %id, %capability, "Capability announced");
                self.publish();
                HubEvent::CapabilityAnnounced {
                    id,
                    capability,
                    changed: true,
                }
            }
        }
    }

    fn handle_disconnect_endpoint(&mut self, id: EndpointId, session: SessionId) -> HubEvent {
        let current = match self.registry.get(&id) {
            Some(endpoint) => endpoint.session(),
            None => {
                return HubEvent::CommandFailed {
                    command: "DisconnectEndpoint".to_string(),
                    reason: format!("Endpoint {} is not registered", id),
                };
            }
        };

        if current != session {
            debug!(endpoint = %id, %session, %current, "Ignoring disconnect of superseded connection");
            return HubEvent::DisconnectIgnored { id };
        }

        // Topology cleanup first, while the endpoint is still registered
        let topology_reset = self
            .mixer
            .on_endpoint_removed(&mut self.registry, &id)
            .is_some();
        self.registry.remove(&id);

        info!(endpoint = %id, topology_reset, "Endpoint disconnected");
        self.publish();

        HubEvent::EndpointRemoved { id, topology_reset }
    }

    fn handle_subscribe_monitor(&mut self, id: MonitorId, channel: MonitorChannel) -> HubEvent {
        let snapshot = self.snapshot();
        let snapshot_delivered = match self.notifier.subscribe(id, channel, &snapshot) {
            Ok(()) => true,
            Err(e) => {
                warn!(monitor = %id, error = %e, "Failed to send initial snapshot");
                false
            }
        };

        HubEvent::MonitorSubscribed {
            id,
            snapshot_delivered,
        }
    }

    fn handle_unsubscribe_monitor(&mut self, id: MonitorId) -> HubEvent {
        if self.notifier.unsubscribe(&id) {
            debug!(monitor = %id, "Monitor unsubscribed");
            HubEvent::MonitorUnsubscribed { id }
        } else {
            HubEvent::CommandFailed {
                command: "UnsubscribeMonitor".to_string(),
                reason: format!("Monitor {} is not subscribed", id),
            }
        }
    }

    fn handle_monitor_request(&mut self, id: MonitorId, request: MonitorRequest) -> HubEvent {
        match request {
            MonitorRequest::RequestSnapshot => {
                match self.notifier.send_to(&id, &self.snapshot()) {
                    Some(Ok(())) => HubEvent::SnapshotSent {
                        monitor: id,
                        delivered: true,
                    },
                    Some(Err(e)) => {
                        warn!(monitor = %id, error = %e, "Failed to send snapshot");
                        HubEvent::SnapshotSent {
                            monitor: id,
                            delivered: false,
                        }
                    }
                    None => HubEvent::CommandFailed {
                        command: "MonitorRequest".to_string(),
                        reason: format!("Monitor {} is not subscribed", id),
                    },
                }
            }

            MonitorRequest::SetTopology { topology } => self.apply_topology(&topology),

            MonitorRequest::SetGains { .. } => {
                debug!(monitor = %id, "Ignoring gain update");
                HubEvent::GainsIgnored { monitor: id }
            }
        }
    }

    fn apply_topology(&mut self, request: &TopologyRequest) -> HubEvent {
        let result = self
            .mixer
            .apply(&mut self.registry, request, Instant::now());

        // The old topology is gone either way
        self.publish();

        match result {
            Ok(report) => HubEvent::TopologyApplied {
                destination: report.destination,
                sources: report.sources,
                skipped: report.skipped,
            },
            Err(reason) => HubEvent::TopologyRejected { reason },
        }
    }

    fn handle_check_deadlines(&mut self, now: Instant) -> HubEvent {
        let overdue = self.mixer.overdue(now);
        if overdue.is_empty() {
            return HubEvent::DeadlinesChecked {
                pending: self.mixer.pending_offers(),
            };
        }

        warn!(sources = ?overdue, "Offer deadline missed, tearing down topology");
        self.mixer.teardown(&mut self.registry, None);
        self.publish();

        HubEvent::OfferTimedOut { sources: overdue }
    }
}
