//! TRIAS departure feed client.
//!
//! This module talks to a TRIAS 1.1 endpoint (the VDV transit-data exchange
//! standard, namespace `http://www.vdv.de/trias`) and turns its stop-event
//! responses into domain departures.
//!
//! Key characteristics of the feed:
//! - One request per stop point; the response repeats `StopEventResult`
//!   nodes for that stop.
//! - Response stop refs may be **platform-qualified** (`de:08212:3:1` for a
//!   query on `de:08212:3`), so selection is by prefix.
//! - `EstimatedTime` is present only when real-time data exists; its absence
//!   is normal, not an error.

mod client;
mod error;
pub mod extract;
mod mock;
pub mod parse;

pub use client::{StopEventSource, TriasClient, TriasConfig};
pub use error::TriasError;
pub use extract::{extract, format_platform};
pub use mock::MockFeed;
pub use parse::{FeedDocument, RawStopEvent};
