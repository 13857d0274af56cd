//! Station and stop-point registry.
//!
//! Built once from configuration, then read-only for the life of the
//! process. Answers the two questions the pipeline keeps asking: which
//! station owns a stop point (exact ref match), and which distinct stop
//! points do the configured displays need fetched each cycle.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::warn;

use crate::config::{Display, StationConfig};
use crate::domain::{Station, StopPoint};

/// The static station/stop-point mapping.
#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    stations: HashMap<String, Arc<Station>>,
}

impl StationRegistry {
    /// Build the registry from configured stations. Pure construction, no
    /// I/O; missing prefix/suffix fields are simply absent.
    pub fn build(stations: &[StationConfig]) -> Self {
        let stations = stations
            .iter()
            .map(|sc| {
                (
                    sc.name.clone(),
                    Arc::new(Station {
                        name: sc.name.clone(),
                        stop_points: sc.stop_points.clone(),
                    }),
                )
            })
            .collect();

        Self { stations }
    }

    /// Look up a station by name.
    pub fn get(&self, name: &str) -> Option<&Arc<Station>> {
        self.stations.get(name)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Find the station and stop point owning `stop_point_ref`.
    ///
    /// Exact ref equality. This is the grouping identity used for display
    /// slicing, deliberately stricter than the prefix match used against
    /// feed records.
    pub fn find_stop_point(&self, stop_point_ref: &str) -> Option<(Arc<Station>, StopPoint)> {
        for station in self.stations.values() {
            if let Some(sp) = station
                .stop_points
                .iter()
                .find(|sp| sp.stop_point_ref == stop_point_ref)
            {
                return Some((station.clone(), sp.clone()));
            }
        }
        None
    }

    /// All distinct stop points needed by the given displays.
    ///
    /// Deduplicates by stop identifier so the aggregator fetches each
    /// physical stop point at most once per cycle, however many displays
    /// show its station.
    pub fn distinct_stop_points(&self, displays: &[Display]) -> Vec<StopPoint> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut result = Vec::new();

        for disp in displays {
            let Some(station) = self.stations.get(&disp.station) else {
                // Config validation rules this out; guard anyway.
                warn!(station = %disp.station, "display references unknown station");
                continue;
            };
            for sp in &station.stop_points {
                if seen.insert(sp.stop_point_ref.as_str()) {
                    result.push(sp.clone());
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station_config(name: &str, refs: &[&str]) -> StationConfig {
        StationConfig {
            name: name.to_string(),
            stop_points: refs.iter().map(|r| StopPoint::new(*r)).collect(),
        }
    }

    fn display(station: &str) -> Display {
        Display {
            station: station.to_string(),
        }
    }

    #[test]
    fn build_and_get() {
        let registry = StationRegistry::build(&[
            station_config("Hauptbahnhof", &["de:08212:3", "de:08212:4"]),
            station_config("Marktplatz", &["de:08212:1"]),
        ]);

        assert_eq!(registry.len(), 2);
        let hbf = registry.get("Hauptbahnhof").unwrap();
        assert_eq!(hbf.stop_points.len(), 2);
        assert!(registry.get("Nirgendwo").is_none());
    }

    #[test]
    fn find_stop_point_is_exact() {
        let registry = StationRegistry::build(&[station_config("Hauptbahnhof", &["de:08212:3"])]);

        let (station, sp) = registry.find_stop_point("de:08212:3").unwrap();
        assert_eq!(station.name, "Hauptbahnhof");
        assert_eq!(sp.stop_point_ref, "de:08212:3");

        // A platform-qualified ref is not the configured stop point.
        assert!(registry.find_stop_point("de:08212:3:1").is_none());
    }

    #[test]
    fn distinct_stop_points_dedupes_across_displays() {
        let registry = StationRegistry::build(&[station_config(
            "Hauptbahnhof",
            &["de:08212:A", "de:08212:B"],
        )]);

        // Two displays showing the same station still need each stop point once.
        let displays = [display("Hauptbahnhof"), display("Hauptbahnhof")];
        let stop_points = registry.distinct_stop_points(&displays);

        assert_eq!(stop_points.len(), 2);
        let refs: Vec<&str> = stop_points
            .iter()
            .map(|sp| sp.stop_point_ref.as_str())
            .collect();
        assert_eq!(refs, vec!["de:08212:A", "de:08212:B"]);
    }

    #[test]
    fn distinct_stop_points_dedupes_shared_refs_across_stations() {
        let registry = StationRegistry::build(&[
            station_config("Nord", &["de:08212:9"]),
            station_config("Süd", &["de:08212:9", "de:08212:10"]),
        ]);

        let displays = [display("Nord"), display("Süd")];
        let stop_points = registry.distinct_stop_points(&displays);
        assert_eq!(stop_points.len(), 2);
    }

    #[test]
    fn unknown_display_station_is_skipped() {
        let registry = StationRegistry::build(&[station_config("Hauptbahnhof", &["de:08212:3"])]);
        let stop_points = registry.distinct_stop_points(&[display("Nirgendwo")]);
        assert!(stop_points.is_empty());
    }
}
