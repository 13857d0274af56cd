//! Transport mode codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mode of transport as reported in the feed's `PtMode` element.
///
/// The feed vocabulary is closed; anything outside it maps to `Unknown`
/// rather than failing the record, since the mode only steers icon shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TransportMode {
    #[default]
    Unknown,
    Air,
    Bus,
    TrolleyBus,
    Tram,
    Coach,
    Rail,
    IntercityRail,
    UrbanRail,
    Metro,
    Water,
    #[serde(rename = "cable-way")]
    CableWay,
    Funicular,
    Taxi,
}

impl TransportMode {
    /// Parse a feed mode code. Unrecognized or missing codes become `Unknown`.
    pub fn from_feed_code(code: &str) -> Self {
        match code {
            "air" => TransportMode::Air,
            "bus" => TransportMode::Bus,
            "trolleyBus" => TransportMode::TrolleyBus,
            "tram" => TransportMode::Tram,
            "coach" => TransportMode::Coach,
            "rail" => TransportMode::Rail,
            "intercityRail" => TransportMode::IntercityRail,
            "urbanRail" => TransportMode::UrbanRail,
            "metro" => TransportMode::Metro,
            "water" => TransportMode::Water,
            "cable-way" => TransportMode::CableWay,
            "funicular" => TransportMode::Funicular,
            "taxi" => TransportMode::Taxi,
            _ => TransportMode::Unknown,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            TransportMode::Unknown => "unknown",
            TransportMode::Air => "air",
            TransportMode::Bus => "bus",
            TransportMode::TrolleyBus => "trolleyBus",
            TransportMode::Tram => "tram",
            TransportMode::Coach => "coach",
            TransportMode::Rail => "rail",
            TransportMode::IntercityRail => "intercityRail",
            TransportMode::UrbanRail => "urbanRail",
            TransportMode::Metro => "metro",
            TransportMode::Water => "water",
            TransportMode::CableWay => "cable-way",
            TransportMode::Funicular => "funicular",
            TransportMode::Taxi => "taxi",
        };
        f.write_str(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        assert_eq!(TransportMode::from_feed_code("tram"), TransportMode::Tram);
        assert_eq!(TransportMode::from_feed_code("bus"), TransportMode::Bus);
        assert_eq!(
            TransportMode::from_feed_code("cable-way"),
            TransportMode::CableWay
        );
        assert_eq!(
            TransportMode::from_feed_code("intercityRail"),
            TransportMode::IntercityRail
        );
    }

    #[test]
    fn unknown_codes_default() {
        assert_eq!(
            TransportMode::from_feed_code("hyperloop"),
            TransportMode::Unknown
        );
        assert_eq!(TransportMode::from_feed_code(""), TransportMode::Unknown);
        // Case matters in the feed vocabulary
        assert_eq!(TransportMode::from_feed_code("Tram"), TransportMode::Unknown);
    }

    #[test]
    fn display_roundtrip() {
        for mode in [
            TransportMode::Bus,
            TransportMode::Tram,
            TransportMode::Rail,
            TransportMode::CableWay,
            TransportMode::TrolleyBus,
        ] {
            assert_eq!(TransportMode::from_feed_code(&mode.to_string()), mode);
        }
    }
}
