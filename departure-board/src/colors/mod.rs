//! Line color resolution.
//!
//! Icon colors come from a public reference table (CSV, one row per operator
//! line) that is downloaded periodically and held in memory. Lookups never
//! fail: long-distance services get a fixed color pair, unknown lines get the
//! configured fallback, and a failed table refresh keeps the previous table.

mod error;
mod resolver;
mod table;

pub use error::ColorTableError;
pub use resolver::{ColorPair, ColorResolver, LONG_DISTANCE_COLORS};
pub use table::ColorTableEntry;
