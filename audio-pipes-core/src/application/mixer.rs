use crate::domain::{
    EndpointCommand, EndpointId, Registry, Topology, TopologyError, TopologyRequest,
};
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Endpoints told to reset during a teardown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// Received `Reset`
    pub reset: Vec<EndpointId>,
    /// `Reset` send failed
    pub failed: Vec<EndpointId>,
}

/// Result of a successful apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub destination: EndpointId,
    /// Sources added to the topology, in request order
    pub sources: Vec<EndpointId>,
    /// Requested sources that are not registered
    pub skipped: Vec<EndpointId>,
    pub teardown: TeardownReport,
}

/// Owns the active topology and keeps registry activity flags in line with it
#[derive(Debug, Default)]
pub struct Mixer {
    topology: Topology,
    offer_timeout: Option<Duration>,
    /// Sources told to `InitiateOffer` that have not offered yet
    pending_offers: BTreeMap<EndpointId, Instant>,
}

impl Mixer {
    pub fn new(offer_timeout: Option<Duration>) -> Self {
        Self {
            topology: Topology::new(),
            offer_timeout,
            pending_offers: BTreeMap::new(),
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn pending_offers(&self) -> usize {
        self.pending_offers.len()
    }

    /// Replace the topology with the requested one
    ///
    /// The previous topology is always torn down first, also when the request
    /// turns out to be invalid.
    #[instrument(skip(self, registry, request), fields(destination = ?request.destination_id()))]
    pub fn apply(
        &mut self,
        registry: &mut Registry,
        request: &TopologyRequest,
        now: Instant,
    ) -> Result<ApplyReport, TopologyError> {
        let teardown = self.teardown(registry, None);

        let Some(destination_id) = request.destination_id() else {
            error!("Topology request without destination");
            return Err(TopologyError::MissingDestination);
        };

        let Some(destination) = registry.get_mut(destination_id) else {
            error!(destination = %destination_id, "Destination not registered");
            return Err(TopologyError::UnknownDestination(destination_id.clone()));
        };

        self.topology.set_destination(destination_id.clone());
        destination.set_destination_active(true);
        if let Err(e) = destination.send(EndpointCommand::PrepareReceive {
            topology: request.clone(),
        }) {
            warn!(destination = %destination_id, error = %e, "Failed to send prepare-receive");
        }

        let mut sources = Vec::new();
        let mut skipped = Vec::new();

        for source_id in request.source_ids() {
            if self.topology.has_source(source_id) {
                continue;
            }

            let Some(source) = registry.get_mut(source_id) else {
                warn!(source = %source_id, "Requested source not registered, skipping");
                skipped.push(source_id.clone());
                continue;
            };

            self.topology.insert_source(source_id.clone());
            sources.push(source_id.clone());

            if source.is_source_active() {
                continue;
            }
            source.set_source_active(true);

            match source.send(EndpointCommand::InitiateOffer) {
                Ok(()) => {
                    if let Some(timeout) = self.offer_timeout {
                        self.pending_offers.insert(source_id.clone(), now + timeout);
                    }
                }
                Err(e) => {
                    warn!(source = %source_id, error = %e, "Failed to send initiate-offer");
                }
            }
        }

        info!(
            sources = sources.len(),
            skipped = skipped.len(),
            "Topology applied"
        );

        Ok(ApplyReport {
            destination: destination_id.clone(),
            sources,
            skipped,
            teardown,
        })
    }

    /// Reset every participant except `exclude` and clear the topology
    ///
    /// An endpoint holding both roles gets a single `Reset`. Activity flags are
    /// cleared whether or not the send succeeded; the excluded endpoint's flags
    /// are left alone.
    #[instrument(skip(self, registry))]
    pub fn teardown(
        &mut self,
        registry: &mut Registry,
        exclude: Option<&EndpointId>,
    ) -> TeardownReport {
        let previous = self.topology.take();
        self.pending_offers.clear();

        let mut report = TeardownReport::default();
        let mut notified = BTreeSet::new();

        if let Some(destination_id) = previous.destination() {
            if Some(destination_id) != exclude {
                if let Some(destination) = registry.get_mut(destination_id) {
                    if destination.is_destination_active() {
                        notified.insert(destination_id.clone());
                        match destination.send(EndpointCommand::Reset) {
                            Ok(()) => report.reset.push(destination_id.clone()),
                            Err(e) => {
                                warn!(destination = %destination_id, error = %e, "Failed to reset destination");
                                report.failed.push(destination_id.clone());
                            }
                        }
                    }
                    destination.set_destination_active(false);
                }
            }
        }

        for source_id in previous.sources() {
            if Some(source_id) == exclude {
                continue;
            }
            let Some(source) = registry.get_mut(source_id) else {
                continue;
            };

            if notified.insert(source_id.clone()) {
                match source.send(EndpointCommand::Reset) {
                    Ok(()) => report.reset.push(source_id.clone()),
                    Err(e) => {
                        warn!(source = %source_id, error = %e, "Failed to reset source");
                        report.failed.push(source_id.clone());
                    }
                }
            }
            source.set_source_active(false);
        }

        if !previous.is_empty() {
            debug!(
                reset = report.reset.len(),
                failed = report.failed.len(),
                "Topology torn down"
            );
        }

        report
    }

    /// Tear down if the departing endpoint takes part in the topology
    ///
    /// Must run while the endpoint is still in the registry.
    pub fn on_endpoint_removed(
        &mut self,
        registry: &mut Registry,
        id: &EndpointId,
    ) -> Option<TeardownReport> {
        if self.topology.involves(id) {
            info!(endpoint = %id, "Participant left, tearing down topology");
            Some(self.teardown(registry, Some(id)))
        } else {
            self.pending_offers.remove(id);
            None
        }
    }

    /// Clear the offer deadline of a source; returns true if one was pending
    pub fn offer_received(&mut self, id: &EndpointId) -> bool {
        self.pending_offers.remove(id).is_some()
    }

    /// Sources whose offer deadline has passed
    pub fn overdue(&self, now: Instant) -> Vec<EndpointId> {
        self.pending_offers
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, _)| id.clone())
            .collect()
    }
}
