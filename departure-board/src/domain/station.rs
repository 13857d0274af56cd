//! Stations and stop points.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A specific physical boarding location (one platform, one side of a road),
/// identified by its external transit-system code such as `"de:08212:3"`.
///
/// The optional prefix and suffix are display adornments shown around the
/// platform label. Equality and hashing are by stop identifier only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopPoint {
    /// External stop identifier.
    pub stop_point_ref: String,
    /// Optional text shown before the platform label.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Optional text shown after the platform label.
    #[serde(default)]
    pub suffix: Option<String>,
}

impl StopPoint {
    /// Create a stop point with no display adornments.
    pub fn new(stop_point_ref: impl Into<String>) -> Self {
        Self {
            stop_point_ref: stop_point_ref.into(),
            prefix: None,
            suffix: None,
        }
    }
}

impl PartialEq for StopPoint {
    fn eq(&self, other: &Self) -> bool {
        self.stop_point_ref == other.stop_point_ref
    }
}

impl Eq for StopPoint {}

impl Hash for StopPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.stop_point_ref.hash(state);
    }
}

/// A named group of stop points representing one physical location.
///
/// A station may have several boarding points (both platforms of a tram
/// stop, say). Names are unique within a configuration and the stop-point
/// list is non-empty; both are enforced at configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub stop_points: Vec<StopPoint>,
}
