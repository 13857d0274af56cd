use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use departure_board::colors::ColorResolver;
use departure_board::config::{BoardConfig, Display};
use departure_board::domain::{Departure, sort_by_effective_time};
use departure_board::icons::{IconShape, IconSpec};
use departure_board::registry::StationRegistry;
use departure_board::scheduler::{DepartureSink, Scheduler, SchedulerConfig};
use departure_board::trias::{TriasClient, TriasConfig};

/// Stand-in renderer: prints each display's board to stdout.
///
/// A real rendering collaborator would draw the icon specs into a window;
/// this one demonstrates the contract (it sorts and truncates, the core
/// does not).
struct ConsoleSink {
    resolver: Arc<ColorResolver>,
    max_rows: usize,
}

impl DepartureSink for ConsoleSink {
    fn present(&self, display: &Display, mut departures: Vec<Departure>) {
        sort_by_effective_time(&mut departures);
        let now = Utc::now();

        println!("=== {} ===", display.station);
        for d in departures.iter().take(self.max_rows) {
            let icon = self.resolver.icons().get_or_create(&d.line, || IconSpec {
                shape: IconShape::for_mode(d.mode),
                width: 90,
                height: 60,
                radius: 15,
                text: d.line.clone(),
                background_color: d.background_color.clone(),
                text_color: d.text_color.clone(),
            });

            // Platform label framed by the stop point's configured adornments.
            let prefix = d.stop_point.prefix.as_deref().unwrap_or("");
            let suffix = d.stop_point.suffix.as_deref().unwrap_or("");
            let platform = d.platform.as_deref().unwrap_or("-");
            let mins = d.time_until(now).num_minutes();
            println!(
                "{:>8} [{:?}] {:<24} {} {} {} {:>3} min",
                icon.text, icon.shape, d.destination, prefix, platform, suffix, mins
            );
        }
        println!();
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.json"));

    let config = match BoardConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("cannot start: {e}");
            std::process::exit(1);
        }
    };

    let registry = StationRegistry::build(&config.stations);
    info!(
        stations = registry.len(),
        displays = config.displays.len(),
        "configuration loaded"
    );

    let resolver = match ColorResolver::new(&config.operator, &config.color_table.url) {
        Ok(resolver) => Arc::new(resolver),
        Err(e) => {
            eprintln!("cannot start: {e}");
            std::process::exit(1);
        }
    };

    // Prime the color table from the last download, if there is one; the
    // reference cycle fetches a fresh copy right away regardless.
    match resolver.load_cached(&config.color_table.path) {
        Ok(rows) => info!(rows, "loaded cached line color table"),
        Err(e) => info!("no usable cached color table ({e}), starting empty"),
    }

    let client = match TriasClient::new(TriasConfig::new(
        &config.credentials.url,
        &config.credentials.requestor_ref,
    )) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("cannot start: {e}");
            std::process::exit(1);
        }
    };

    let sink = Arc::new(ConsoleSink {
        resolver: resolver.clone(),
        max_rows: 8,
    });

    let scheduler = Scheduler::new(
        client,
        registry,
        resolver,
        config.displays.clone(),
        config.fallback_colors.clone(),
        config.treat_sev_as_normal,
        sink,
        SchedulerConfig {
            departure_interval: Duration::from_secs(config.intervals.departure_refresh_secs),
            color_refresh_interval: Duration::from_secs(config.intervals.color_refresh_secs),
            color_table_path: config.color_table.path.clone(),
        },
    );

    info!("departure board running");
    scheduler.run().await;
}
