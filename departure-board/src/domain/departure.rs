//! The canonical departure record handed to displays.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::mode::TransportMode;
use super::station::{Station, StopPoint};

/// One scheduled or real-time transit departure.
///
/// Departures are value objects: they are rebuilt wholesale from the feed
/// every refresh cycle, carry no identity beyond their field values, and are
/// never diffed incrementally. Many departures share their owning [`Station`]
/// through an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    /// Normalized line code, e.g. `"3"`, `"SEV3"`, `"ICE273"`.
    pub line: String,
    /// Destination as published by the feed.
    pub destination: String,
    /// Platform label with the feed's redundant leading word removed.
    pub platform: Option<String>,
    /// Station this departure is grouped under.
    pub station: Arc<Station>,
    /// The specific stop point it departs from.
    pub stop_point: StopPoint,
    pub mode: TransportMode,
    /// Resolved icon background color (hex).
    pub background_color: String,
    /// Resolved icon text color (hex).
    pub text_color: String,
    /// Timetabled departure time. Always present.
    pub planned_time: DateTime<Utc>,
    /// Real-time estimate, present only when the feed has real-time data.
    pub estimated_time: Option<DateTime<Utc>>,
}

impl Departure {
    /// The single timestamp used for sorting and display: the real-time
    /// estimate when present, else the timetabled time.
    pub fn effective_time(&self) -> DateTime<Utc> {
        self.estimated_time.unwrap_or(self.planned_time)
    }

    /// Signed time remaining until the effective departure. Negative once
    /// the departure has passed.
    pub fn time_until(&self, now: DateTime<Utc>) -> Duration {
        self.effective_time() - now
    }
}

/// Sort departures ascending by effective time.
///
/// Extraction output is unordered; call this wherever display order matters.
pub fn sort_by_effective_time(departures: &mut [Departure]) {
    departures.sort_by_key(|d| d.effective_time());
}
