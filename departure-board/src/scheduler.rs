//! Refresh scheduling.
//!
//! Two independent timers drive the board: a short one refreshing
//! departures, a long one refreshing the color reference table. Each cycle
//! is an explicit function that returns normally; the loops re-arm only
//! after the current cycle completes, so a cycle can never overlap itself.
//! No error in either cycle terminates its loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

use crate::aggregate::{departures_for_display, refresh_all};
use crate::colors::{ColorPair, ColorResolver};
use crate::config::Display;
use crate::domain::{Departure, StopPoint};
use crate::registry::StationRegistry;
use crate::trias::StopEventSource;

/// Receives each display's departures at the end of a refresh cycle.
///
/// This is the seam to the rendering collaborator. The list is unsorted and
/// untruncated; ordering and "top N" are presentation decisions.
pub trait DepartureSink: Send + Sync {
    fn present(&self, display: &Display, departures: Vec<Departure>);
}

/// Timer cadences and the color table cache location.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub departure_interval: Duration,
    pub color_refresh_interval: Duration,
    pub color_table_path: PathBuf,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            departure_interval: Duration::from_secs(30),
            color_refresh_interval: Duration::from_secs(24 * 60 * 60),
            color_table_path: PathBuf::from("line-colors.csv"),
        }
    }
}

/// Drives the refresh pipeline on its two timers.
pub struct Scheduler<S> {
    source: S,
    registry: StationRegistry,
    /// Shared with the rendering side, which reads colors and icons from it.
    resolver: Arc<ColorResolver>,
    displays: Vec<Display>,
    /// Distinct stop points across all displays, computed once.
    stop_points: Vec<StopPoint>,
    fallback: ColorPair,
    treat_sev_as_normal: bool,
    sink: Arc<dyn DepartureSink>,
    config: SchedulerConfig,
}

impl<S> Scheduler<S>
where
    S: StopEventSource + Sync,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: S,
        registry: StationRegistry,
        resolver: Arc<ColorResolver>,
        displays: Vec<Display>,
        fallback: ColorPair,
        treat_sev_as_normal: bool,
        sink: Arc<dyn DepartureSink>,
        config: SchedulerConfig,
    ) -> Self {
        let stop_points = registry.distinct_stop_points(&displays);
        Self {
            source,
            registry,
            resolver,
            displays,
            stop_points,
            fallback,
            treat_sev_as_normal,
            sink,
            config,
        }
    }

    /// One departure refresh: fetch every distinct stop point once, slice
    /// per display, hand each slice to the sink.
    pub async fn departure_cycle(&self) {
        let all = refresh_all(
            &self.source,
            &self.stop_points,
            &self.registry,
            &self.resolver,
            &self.fallback,
            self.treat_sev_as_normal,
        )
        .await;

        debug!(
            departures = all.len(),
            stop_points = self.stop_points.len(),
            "departure cycle complete"
        );

        for display in &self.displays {
            let slice = departures_for_display(&all, display);
            self.sink.present(display, slice);
        }
    }

    /// One reference-data refresh: fetch the color table and, only when it
    /// actually changed, drop the icon cache.
    pub async fn reference_cycle(&self) {
        if self
            .resolver
            .refresh(&self.config.color_table_path)
            .await
        {
            self.resolver.icons().invalidate_all();
            debug!("color table refreshed, icon cache invalidated");
        }
    }

    /// Run both timer loops forever. Never returns.
    ///
    /// Each loop runs its cycle immediately, then waits out its interval;
    /// a slow cycle delays the next tick instead of stacking up.
    pub async fn run(&self) {
        let departures = async {
            let mut timer = interval(self.config.departure_interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            timer.tick().await; // first tick is immediate
            loop {
                self.departure_cycle().await;
                timer.tick().await;
            }
        };

        let reference = async {
            let mut timer = interval(self.config.color_refresh_interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            timer.tick().await;
            loop {
                self.reference_cycle().await;
                timer.tick().await;
            }
        };

        futures::join!(departures, reference);
    }
}
