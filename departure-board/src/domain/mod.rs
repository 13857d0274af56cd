//! Domain types for the departure board.
//!
//! The canonical departure model and the feed-naming normalization rules.
//! Everything here is plain data or pure functions; no I/O.

mod departure;
mod line;
mod mode;
mod station;

pub use departure::{Departure, sort_by_effective_time};
pub use line::normalize_line_name;
pub use mode::TransportMode;
pub use station::{Station, StopPoint};
