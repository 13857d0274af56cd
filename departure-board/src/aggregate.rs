//! Multi-stop-point aggregation.
//!
//! Once per refresh cycle the aggregator fetches every distinct stop point
//! exactly once, extracts departures, and merges them into one flat list.
//! Displays then get their slice filtered by station. A failed fetch only
//! costs that stop point's records for the cycle; displays keep whatever
//! they showed before (stale beats empty).

use futures::future::join_all;
use tracing::warn;

use crate::colors::{ColorPair, ColorResolver};
use crate::config::Display;
use crate::domain::{Departure, StopPoint};
use crate::registry::StationRegistry;
use crate::trias::{StopEventSource, extract};

/// Fetch and extract departures for every given stop point.
///
/// Fetches run concurrently (the client's semaphore bounds parallelism) and
/// the merge is order-independent; downstream consumers re-filter and
/// re-sort anyway. A fetch failure is logged and skipped, never propagated.
pub async fn refresh_all<S>(
    source: &S,
    stop_points: &[StopPoint],
    registry: &StationRegistry,
    resolver: &ColorResolver,
    fallback: &ColorPair,
    treat_sev_as_normal: bool,
) -> Vec<Departure>
where
    S: StopEventSource + Sync,
{
    let fetches = stop_points.iter().map(|sp| {
        let stop_point_ref = sp.stop_point_ref.as_str();
        async move { (stop_point_ref, source.stop_events(stop_point_ref).await) }
    });

    let mut all = Vec::new();
    for (stop_point_ref, result) in join_all(fetches).await {
        match result {
            Ok(document) => {
                all.extend(extract(
                    stop_point_ref,
                    &document,
                    registry,
                    resolver,
                    fallback,
                    treat_sev_as_normal,
                ));
            }
            Err(e) => {
                warn!(stop_point = %stop_point_ref, "skipping stop point this cycle: {e}");
            }
        }
    }

    all
}

/// The departures a display should show: those of its station.
///
/// No sorting, no truncation; the renderer receives the full matched list
/// and applies its own ordering and row limit.
pub fn departures_for_display(all: &[Departure], display: &Display) -> Vec<Departure> {
    all.iter()
        .filter(|d| d.station.name == display.station)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StationConfig;
    use crate::trias::{FeedDocument, MockFeed, RawStopEvent};

    fn registry() -> StationRegistry {
        StationRegistry::build(&[
            StationConfig {
                name: "Hauptbahnhof".to_string(),
                stop_points: vec![
                    crate::domain::StopPoint::new("de:08212:A"),
                    crate::domain::StopPoint::new("de:08212:B"),
                ],
            },
            StationConfig {
                name: "Marktplatz".to_string(),
                stop_points: vec![crate::domain::StopPoint::new("de:08212:C")],
            },
        ])
    }

    fn resolver() -> ColorResolver {
        ColorResolver::new("kvv", "http://localhost/line-colors.csv").unwrap()
    }

    fn fallback() -> ColorPair {
        ColorPair::new("#006EFF", "#FFFFFF")
    }

    fn document_for(stop_point_ref: &str, line: &str) -> FeedDocument {
        FeedDocument {
            stop_events: vec![RawStopEvent {
                stop_point_ref: format!("{stop_point_ref}:1"),
                timetabled_time: Some("2025-08-01T15:20:00Z".to_string()),
                published_line_name: Some(format!("Straßenbahn {line}")),
                destination: Some("Rintheim".to_string()),
                mode: Some("tram".to_string()),
                ..RawStopEvent::default()
            }],
        }
    }

    fn stop_points(refs: &[&str]) -> Vec<StopPoint> {
        refs.iter().map(|r| StopPoint::new(*r)).collect()
    }

    #[tokio::test]
    async fn merges_departures_across_stop_points() {
        let mock = MockFeed::new()
            .with_document("de:08212:A", document_for("de:08212:A", "1"))
            .with_document("de:08212:B", document_for("de:08212:B", "2"));

        let all = refresh_all(
            &mock,
            &stop_points(&["de:08212:A", "de:08212:B"]),
            &registry(),
            &resolver(),
            &fallback(),
            false,
        )
        .await;

        assert_eq!(all.len(), 2);
        let mut lines: Vec<&str> = all.iter().map(|d| d.line.as_str()).collect();
        lines.sort();
        assert_eq!(lines, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn failed_stop_point_does_not_sink_the_cycle() {
        // B has no mock data, so its fetch fails; A must still come through.
        let mock = MockFeed::new().with_document("de:08212:A", document_for("de:08212:A", "1"));

        let all = refresh_all(
            &mock,
            &stop_points(&["de:08212:A", "de:08212:B"]),
            &registry(),
            &resolver(),
            &fallback(),
            false,
        )
        .await;

        assert_eq!(all.len(), 1);
        assert_eq!(all[0].stop_point.stop_point_ref, "de:08212:A");
    }

    #[tokio::test]
    async fn all_failures_yield_empty_list() {
        let mock = MockFeed::new();
        let all = refresh_all(
            &mock,
            &stop_points(&["de:08212:A"]),
            &registry(),
            &resolver(),
            &fallback(),
            false,
        )
        .await;
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn xml_to_display_board_end_to_end() {
        // Realtime estimate on the first event puts it after the second.
        let xml = r#"<?xml version="1.0"?>
<Trias xmlns="http://www.vdv.de/trias">
  <StopEventResult>
    <StopPointRef>de:08212:A:1</StopPointRef>
    <ServiceDeparture>
      <TimetabledTime>2025-08-01T15:20:00Z</TimetabledTime>
      <EstimatedTime>2025-08-01T15:31:00Z</EstimatedTime>
    </ServiceDeparture>
    <PublishedLineName><Text>Straßenbahn 3</Text></PublishedLineName>
    <DestinationText><Text>Rintheim</Text></DestinationText>
    <Mode><PtMode>tram</PtMode></Mode>
  </StopEventResult>
  <StopEventResult>
    <StopPointRef>de:08212:A:2</StopPointRef>
    <ServiceDeparture>
      <TimetabledTime>2025-08-01T15:25:00Z</TimetabledTime>
    </ServiceDeparture>
    <PublishedLineName><Text>Bus SEV 4</Text></PublishedLineName>
    <DestinationText><Text>Durlach</Text></DestinationText>
    <Mode><PtMode>bus</PtMode></Mode>
  </StopEventResult>
</Trias>"#;
        let document = crate::trias::parse::parse_document(xml).unwrap();
        let mock = MockFeed::new().with_document("de:08212:A", document);

        let all = refresh_all(
            &mock,
            &stop_points(&["de:08212:A"]),
            &registry(),
            &resolver(),
            &fallback(),
            false,
        )
        .await;

        let mut board = departures_for_display(
            &all,
            &Display {
                station: "Hauptbahnhof".to_string(),
            },
        );
        crate::domain::sort_by_effective_time(&mut board);

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].line, "SEV4");
        assert_eq!(board[1].line, "3");
        assert!(board[1].estimated_time.is_some());
    }

    #[tokio::test]
    async fn display_slicing_filters_by_station() {
        let mock = MockFeed::new()
            .with_document("de:08212:A", document_for("de:08212:A", "1"))
            .with_document("de:08212:C", document_for("de:08212:C", "5"));

        let all = refresh_all(
            &mock,
            &stop_points(&["de:08212:A", "de:08212:C"]),
            &registry(),
            &resolver(),
            &fallback(),
            false,
        )
        .await;

        let hbf = departures_for_display(
            &all,
            &Display {
                station: "Hauptbahnhof".to_string(),
            },
        );
        assert_eq!(hbf.len(), 1);
        assert_eq!(hbf[0].line, "1");

        let markt = departures_for_display(
            &all,
            &Display {
                station: "Marktplatz".to_string(),
            },
        );
        assert_eq!(markt.len(), 1);
        assert_eq!(markt[0].line, "5");

        let unknown = departures_for_display(
            &all,
            &Display {
                station: "Nirgendwo".to_string(),
            },
        );
        assert!(unknown.is_empty());
    }
}
