use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a connected endpoint, `"<origin>_<sub_origin>"`
///
/// The sub-origin part is empty for a top-level connection (`"12_"`).
/// An endpoint whose origin cannot be determined gets the sentinel `-1`,
/// which the registry refuses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(String);

impl EndpointId {
    /// Sentinel for an unknown or unset endpoint
    pub const UNKNOWN: &'static str = "-1";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the composite id from connection origin identifiers
    pub fn from_origin(origin_id: Option<&str>, sub_origin_id: Option<&str>) -> Self {
        match origin_id.map(str::trim).filter(|origin| !origin.is_empty()) {
            Some(origin) => {
                let sub_origin = sub_origin_id.map(str::trim).unwrap_or("");
                Self(format!("{}_{}", origin, sub_origin))
            }
            None => Self::unknown(),
        }
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    /// False for the sentinel and for empty ids
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0 != Self::UNKNOWN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EndpointId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EndpointId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One transport connection of an endpoint
///
/// A reconnecting endpoint keeps its `EndpointId` but gets a fresh session,
/// which lets the hub tell a stale disconnect from a current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a subscribed monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonitorId(Uuid);

impl MonitorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MonitorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
