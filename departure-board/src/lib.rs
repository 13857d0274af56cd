//! Real-time public-transit departure board core.
//!
//! Polls a TRIAS departure feed, normalizes feed records into canonical
//! [`domain::Departure`] values, enriches them with line colors and icon
//! descriptions, and distributes per-display subsets on a recurring refresh
//! cycle. Rendering is a collaborator behind [`scheduler::DepartureSink`];
//! this crate never draws pixels.

pub mod aggregate;
pub mod colors;
pub mod config;
pub mod domain;
pub mod icons;
pub mod registry;
pub mod scheduler;
pub mod trias;
