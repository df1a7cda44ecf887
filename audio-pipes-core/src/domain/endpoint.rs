use crate::domain::{EndpointCommand, EndpointId, MonitorUpdate, SessionId};
use crate::infrastructure::{Channel, TransportError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Send target of a connected endpoint
pub type EndpointChannel = Arc<dyn Channel<EndpointCommand>>;

/// Send target of a subscribed monitor
pub type MonitorChannel = Arc<dyn Channel<MonitorUpdate>>;

/// Role an endpoint can announce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Source,
    Destination,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Source => write!(f, "source"),
            Capability::Destination => write!(f, "destination"),
        }
    }
}

/// Metadata known about a connection when it is opened
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Owning page (tab) identifier
    pub origin_id: Option<String>,
    /// Frame within the page; absent, empty or `0` for the top-level frame
    pub sub_origin_id: Option<String>,
    /// Page title
    pub title: Option<String>,
    /// Frame URL
    pub url: Option<String>,
}

impl ConnectionInfo {
    pub fn endpoint_id(&self) -> EndpointId {
        EndpointId::from_origin(self.origin_id.as_deref(), self.sub_origin_id.as_deref())
    }

    pub fn is_top_level(&self) -> bool {
        match self.sub_origin_id.as_deref().map(str::trim) {
            None | Some("") | Some("0") => true,
            Some(_) => false,
        }
    }

    /// Label shown before the endpoint announces its own title
    ///
    /// Sub-frames are named by their URL without the http(s) scheme, since the
    /// page title belongs to the top-level frame.
    pub fn derive_title(&self) -> String {
        let title = if self.is_top_level() {
            self.title.clone()
        } else {
            self.url.as_deref().map(|url| strip_scheme(url).to_string())
        };

        title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

fn strip_scheme(url: &str) -> &str {
    for scheme in ["https://", "http://"] {
        let matches = url
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme));
        if matches {
            return &url[scheme.len()..];
        }
    }
    url
}

/// A connected endpoint as tracked by the registry
#[derive(Debug, Clone)]
pub struct Endpoint {
    id: EndpointId,
    session: SessionId,
    title: String,
    channel: EndpointChannel,
    is_source: bool,
    is_destination: bool,
    source_active: bool,
    destination_active: bool,
}

impl Endpoint {
    pub fn new(
        id: EndpointId,
        session: SessionId,
        title: impl Into<String>,
        channel: EndpointChannel,
    ) -> Self {
        Self {
            id,
            session,
            title: title.into(),
            channel,
            is_source: false,
            is_destination: false,
            source_active: false,
            destination_active: false,
        }
    }

    // Getters

    pub fn id(&self) -> &EndpointId {
        &self.id
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_source(&self) -> bool {
        self.is_source
    }

    pub fn is_destination(&self) -> bool {
        self.is_destination
    }

    pub fn is_source_active(&self) -> bool {
        self.source_active
    }

    pub fn is_destination_active(&self) -> bool {
        self.destination_active
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        match capability {
            Capability::Source => self.is_source,
            Capability::Destination => self.is_destination,
        }
    }

    /// Fire-and-forget send through the endpoint's channel
    pub fn send(&self, command: EndpointCommand) -> Result<(), TransportError> {
        self.channel.send(command)
    }

    // Mutations (registry and mixer only)

    /// Returns true if a visible field changed
    pub(crate) fn announce(&mut self, capability: Capability, title: Option<&str>) -> bool {
        let mut changed = !self.has_capability(capability);

        match capability {
            Capability::Source => self.is_source = true,
            Capability::Destination => self.is_destination = true,
        }

        if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) {
            if self.title != title {
                self.title = title.to_string();
                changed = true;
            }
        }

        changed
    }

    pub(crate) fn set_source_active(&mut self, active: bool) {
        self.source_active = active;
    }

    pub(crate) fn set_destination_active(&mut self, active: bool) {
        self.destination_active = active;
    }
}
