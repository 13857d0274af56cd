//! TRIAS response parsing.
//!
//! Turns the XML body of a `StopEventRequest` response into a
//! [`FeedDocument`]: a flat list of raw stop events with all fields still
//! optional strings. Which fields are required, and what happens when they
//! are missing, is decided per record in [`crate::trias::extract`].

use tracing::warn;

use super::error::TriasError;

/// TRIAS schema namespace. All payload elements live here.
pub const TRIAS_NS: &str = "http://www.vdv.de/trias";

/// A parsed feed response for one stop-point departure query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedDocument {
    pub stop_events: Vec<RawStopEvent>,
}

/// One `StopEventResult` node, fields extracted but not yet validated.
///
/// `stop_point_ref` may carry platform/direction qualifiers suffixed onto
/// the base stop id; extraction matches it by prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStopEvent {
    pub stop_point_ref: String,
    pub timetabled_time: Option<String>,
    pub estimated_time: Option<String>,
    pub published_line_name: Option<String>,
    pub destination: Option<String>,
    pub planned_bay: Option<String>,
    pub mode: Option<String>,
}

/// Parse a TRIAS response body into a [`FeedDocument`].
///
/// A document that is not well-formed XML is an error; a `StopEventResult`
/// without a `StopPointRef` is dropped with a warning, since it can never be
/// matched to a configured stop point.
pub fn parse_document(body: &str) -> Result<FeedDocument, TriasError> {
    let doc = roxmltree::Document::parse(body).map_err(|e| TriasError::Xml {
        message: e.to_string(),
    })?;

    let mut stop_events = Vec::new();

    for result in doc
        .root()
        .descendants()
        .filter(|n| n.has_tag_name((TRIAS_NS, "StopEventResult")))
    {
        let Some(stop_point_ref) = element_text(&result, "StopPointRef") else {
            warn!("dropping stop event without StopPointRef");
            continue;
        };

        stop_events.push(RawStopEvent {
            stop_point_ref,
            timetabled_time: nested_text(&result, "ServiceDeparture", "TimetabledTime"),
            estimated_time: nested_text(&result, "ServiceDeparture", "EstimatedTime"),
            published_line_name: nested_text(&result, "PublishedLineName", "Text"),
            destination: nested_text(&result, "DestinationText", "Text"),
            planned_bay: nested_text(&result, "PlannedBay", "Text"),
            mode: nested_text(&result, "Mode", "PtMode"),
        });
    }

    Ok(FeedDocument { stop_events })
}

/// Trimmed text of the first descendant with the given TRIAS tag.
fn element_text(node: &roxmltree::Node<'_, '_>, tag: &str) -> Option<String> {
    node.descendants()
        .find(|n| n.has_tag_name((TRIAS_NS, tag)))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Trimmed text of `inner` inside the first descendant `outer` element.
fn nested_text(node: &roxmltree::Node<'_, '_>, outer: &str, inner: &str) -> Option<String> {
    node.descendants()
        .find(|n| n.has_tag_name((TRIAS_NS, outer)))
        .and_then(|n| element_text(&n, inner))
}
