use crate::types::{AgentId, OfferId};
use serde::{Deserialize, Serialize};

/// Inclusive range of integer values, used for port-style resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub begin: u64,
    pub end: u64,
}

/// Value of a single resource: a scalar amount or a set of ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResourceValue {
    Scalar(f64),
    Ranges(Vec<ValueRange>),
}

/// A named resource inside an offer or task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub value: ResourceValue,
}

impl Resource {
    /// Create a scalar resource (cpus, mem, disk)
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: ResourceValue::Scalar(value),
        }
    }

    /// Create a ranges resource (ports)
    pub fn ranges(name: impl Into<String>, ranges: impl IntoIterator<Item = (u64, u64)>) -> Self {
        Self {
            name: name.into(),
            value: ResourceValue::Ranges(
                ranges
                    .into_iter()
                    .map(|(begin, end)| ValueRange { begin, end })
                    .collect(),
            ),
        }
    }

    /// The scalar amount, if this is a scalar resource
    pub fn as_scalar(&self) -> Option<f64> {
        match self.value {
            ResourceValue::Scalar(v) => Some(v),
            ResourceValue::Ranges(_) => None,
        }
    }
}

/// A time-bounded, single-use grant of a subset of one agent's resources.
///
/// An offer is valid until the framework acts on it (launch or decline) or
/// the master rescinds it. It must never be referenced after it has been
/// consumed, declined, or rescinded; the master treats such references as
/// lost and the affected tasks surface as `TaskState::Lost`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub agent_id: AgentId,
    pub hostname: String,
    pub resources: Vec<Resource>,
}

impl Offer {
    /// Look up a scalar resource by name
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.resources
            .iter()
            .find(|r| r.name == name)
            .and_then(Resource::as_scalar)
    }

    /// Offered cpus, zero if absent
    pub fn cpus(&self) -> f64 {
        self.scalar("cpus").unwrap_or(0.0)
    }

    /// Offered memory in megabytes, zero if absent
    pub fn mem(&self) -> f64 {
        self.scalar("mem").unwrap_or(0.0)
    }
}
