//! Feed document → departure records.
//!
//! Converts the raw stop events of one [`FeedDocument`] into enriched
//! [`Departure`] values for a single requested stop point. A malformed
//! record is skipped with a warning and never aborts the rest of the batch;
//! partial boards beat empty ones.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::colors::{ColorPair, ColorResolver};
use crate::domain::{Departure, TransportMode, normalize_line_name};
use crate::registry::StationRegistry;

use super::parse::FeedDocument;

/// Extract the departures for `stop_point_ref` from a parsed feed document.
///
/// Feed records are selected by **prefix** match on their stop-point ref:
/// the feed suffixes platform/direction qualifiers onto the base stop id
/// (`de:08212:3` answers with `de:08212:3:1`). The owning station, by
/// contrast, is resolved by **exact** ref equality in the registry, since
/// that is the grouping identity displays filter on.
///
/// Output is unordered; sort by effective time where display order matters.
pub fn extract(
    stop_point_ref: &str,
    document: &FeedDocument,
    registry: &StationRegistry,
    resolver: &ColorResolver,
    fallback: &ColorPair,
    treat_sev_as_normal: bool,
) -> Vec<Departure> {
    let Some((station, stop_point)) = registry.find_stop_point(stop_point_ref) else {
        warn!(stop_point = %stop_point_ref, "no configured station owns this stop point");
        return Vec::new();
    };

    let mut departures = Vec::new();

    for event in document
        .stop_events
        .iter()
        .filter(|e| e.stop_point_ref.starts_with(stop_point_ref))
    {
        let Some(planned_time) = event
            .timetabled_time
            .as_deref()
            .and_then(parse_feed_time)
        else {
            warn!(
                stop_point = %event.stop_point_ref,
                "skipping stop event without a valid timetabled time"
            );
            continue;
        };

        // Absent or unparseable estimate just means no real-time data.
        let estimated_time = event.estimated_time.as_deref().and_then(parse_feed_time);

        let Some(published_line_name) = event.published_line_name.as_deref() else {
            warn!(
                stop_point = %event.stop_point_ref,
                "skipping stop event without a published line name"
            );
            continue;
        };
        let line = normalize_line_name(published_line_name);

        let Some(destination) = event.destination.clone() else {
            warn!(
                stop_point = %event.stop_point_ref,
                line = %line,
                "skipping stop event without a destination"
            );
            continue;
        };

        let platform = event.planned_bay.as_deref().map(format_platform);

        let mode = event
            .mode
            .as_deref()
            .map(TransportMode::from_feed_code)
            .unwrap_or_default();

        let colors = resolver.resolve(&line, fallback, treat_sev_as_normal);

        departures.push(Departure {
            line,
            destination,
            platform,
            station: station.clone(),
            stop_point: stop_point.clone(),
            mode,
            background_color: colors.background,
            text_color: colors.text,
            planned_time,
            estimated_time,
        });
    }

    departures
}

/// Parse a feed timestamp (RFC 3339, offset or `Z`) to UTC.
fn parse_feed_time(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Strip the feed's redundant leading label word from a platform text.
///
/// `"Gleis 3"` becomes `"3"`; a single-token text is returned unchanged.
pub fn format_platform(platform: &str) -> String {
    let mut words = platform.split_whitespace();
    let first = words.next();
    let rest: Vec<&str> = words.collect();
    if rest.is_empty() {
        first.unwrap_or(platform).to_string()
    } else {
        rest.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StationConfig;
    use crate::domain::StopPoint;
    use crate::trias::parse::RawStopEvent;

    fn registry() -> StationRegistry {
        StationRegistry::build(&[StationConfig {
            name: "Hauptbahnhof".to_string(),
            stop_points: vec![StopPoint::new("de:08212:3"), StopPoint::new("de:08212:4")],
        }])
    }

    fn resolver() -> ColorResolver {
        ColorResolver::new("kvv", "http://localhost/line-colors.csv").unwrap()
    }

    fn fallback() -> ColorPair {
        ColorPair::new("#006EFF", "#FFFFFF")
    }

    fn event(stop_point_ref: &str) -> RawStopEvent {
        RawStopEvent {
            stop_point_ref: stop_point_ref.to_string(),
            timetabled_time: Some("2025-08-01T15:20:00Z".to_string()),
            estimated_time: Some("2025-08-01T15:22:00Z".to_string()),
            published_line_name: Some("Straßenbahn 3".to_string()),
            destination: Some("Rintheim".to_string()),
            planned_bay: Some("Gleis 3".to_string()),
            mode: Some("tram".to_string()),
        }
    }

    fn document(events: Vec<RawStopEvent>) -> FeedDocument {
        FeedDocument {
            stop_events: events,
        }
    }

    #[test]
    fn prefix_match_selects_qualified_stop_refs() {
        let doc = document(vec![event("de:08212:3:1")]);
        let departures = extract("de:08212:3", &doc, &registry(), &resolver(), &fallback(), false);

        assert_eq!(departures.len(), 1);
        let d = &departures[0];
        assert_eq!(d.line, "3");
        assert_eq!(d.destination, "Rintheim");
        assert_eq!(d.platform.as_deref(), Some("3"));
        assert_eq!(d.mode, TransportMode::Tram);
        assert_eq!(d.station.name, "Hauptbahnhof");
        // Grouping identity is the configured base stop point, not the
        // qualified feed ref.
        assert_eq!(d.stop_point.stop_point_ref, "de:08212:3");
        assert!(d.estimated_time.is_some());
    }

    #[test]
    fn unrelated_stop_refs_are_ignored() {
        let doc = document(vec![event("de:08212:3:1"), event("de:08212:99:1")]);
        let departures = extract("de:08212:3", &doc, &registry(), &resolver(), &fallback(), false);
        assert_eq!(departures.len(), 1);
    }

    #[test]
    fn missing_planned_time_skips_only_that_record() {
        let mut bad = event("de:08212:3:1");
        bad.timetabled_time = None;
        let doc = document(vec![bad, event("de:08212:3:2")]);

        let departures = extract("de:08212:3", &doc, &registry(), &resolver(), &fallback(), false);
        assert_eq!(departures.len(), 1);
    }

    #[test]
    fn unparseable_planned_time_skips_only_that_record() {
        let mut bad = event("de:08212:3:1");
        bad.timetabled_time = Some("gestern".to_string());
        let doc = document(vec![bad, event("de:08212:3:2")]);

        let departures = extract("de:08212:3", &doc, &registry(), &resolver(), &fallback(), false);
        assert_eq!(departures.len(), 1);
    }

    #[test]
    fn bad_estimate_means_no_realtime_data() {
        let mut e = event("de:08212:3:1");
        e.estimated_time = Some("sofort".to_string());
        let doc = document(vec![e]);

        let departures = extract("de:08212:3", &doc, &registry(), &resolver(), &fallback(), false);
        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].estimated_time, None);
    }

    #[test]
    fn missing_line_or_destination_skips_record() {
        let mut no_line = event("de:08212:3:1");
        no_line.published_line_name = None;
        let mut no_dest = event("de:08212:3:2");
        no_dest.destination = None;
        let doc = document(vec![no_line, no_dest, event("de:08212:3:3")]);

        let departures = extract("de:08212:3", &doc, &registry(), &resolver(), &fallback(), false);
        assert_eq!(departures.len(), 1);
    }

    #[test]
    fn missing_platform_and_mode_are_fine() {
        let mut e = event("de:08212:3:1");
        e.planned_bay = None;
        e.mode = None;
        let doc = document(vec![e]);

        let departures = extract("de:08212:3", &doc, &registry(), &resolver(), &fallback(), false);
        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].platform, None);
        assert_eq!(departures[0].mode, TransportMode::Unknown);
    }

    #[test]
    fn unknown_mode_defaults() {
        let mut e = event("de:08212:3:1");
        e.mode = Some("zeppelin".to_string());
        let doc = document(vec![e]);

        let departures = extract("de:08212:3", &doc, &registry(), &resolver(), &fallback(), false);
        assert_eq!(departures[0].mode, TransportMode::Unknown);
    }

    #[test]
    fn unknown_stop_point_yields_empty_list() {
        let doc = document(vec![event("de:08212:77:1")]);
        let departures = extract("de:08212:77", &doc, &registry(), &resolver(), &fallback(), false);
        assert!(departures.is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let doc = document(vec![event("de:08212:3:1"), event("de:08212:3:2")]);
        let registry = registry();
        let resolver = resolver();

        let first = extract("de:08212:3", &doc, &registry, &resolver, &fallback(), false);
        let second = extract("de:08212:3", &doc, &registry, &resolver, &fallback(), false);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_table_uses_fallback_colors() {
        let doc = document(vec![event("de:08212:3:1")]);
        let departures = extract("de:08212:3", &doc, &registry(), &resolver(), &fallback(), false);
        assert_eq!(departures[0].background_color, "#006EFF");
        assert_eq!(departures[0].text_color, "#FFFFFF");
    }

    #[test]
    fn offset_timestamps_normalize_to_utc() {
        let mut e = event("de:08212:3:1");
        e.timetabled_time = Some("2025-08-01T17:20:00+02:00".to_string());
        e.estimated_time = None;
        let doc = document(vec![e]);

        let departures = extract("de:08212:3", &doc, &registry(), &resolver(), &fallback(), false);
        assert_eq!(
            departures[0].planned_time,
            "2025-08-01T15:20:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn platform_formatting() {
        assert_eq!(format_platform("Gleis 3"), "3");
        assert_eq!(format_platform("3"), "3");
        assert_eq!(format_platform("Bstg. 4 Ost"), "4 Ost");
        assert_eq!(format_platform(""), "");
    }
}
