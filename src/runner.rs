use colored::*;
use dotenv::dotenv;
use tracing::{info, span, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::constant::FIXTURE_RADIUS_KM;
use crate::config::Config;
use crate::database::db_connection;
use crate::datasource::{DataSource, FallbackChain, MemoryStore, SqliteStore};
use crate::domain::solution::CurrentRoute;
use crate::domain::types::{Actor, BinRecord};
use crate::error::{Error, Result};
use crate::fixtures::generate_random_bins;
use crate::planning::RoutePlanner;
use crate::setup::{load_bins, save_routes_to_csv};

/// Initialize tracing; `RUST_LOG` overrides the default `info` level.
fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .pretty(),
        )
        .try_init()
        .map_err(|e| Error::invalid_config(format!("tracing init failed: {e}")))
}

fn input_bins(config: &Config) -> Result<Vec<BinRecord>> {
    match &config.bins_file {
        Some(path) => load_bins(path),
        None => {
            info!("BINS_FILE not set, generating fixture bins");
            Ok(generate_random_bins(
                config.fixture_bin_count,
                config.fixture_collectors,
                config.start,
                FIXTURE_RADIUS_KM,
                config.fixture_seed,
            ))
        }
    }
}

/// SQLite first when reachable, in-memory copy of the input always last.
async fn build_sources(config: &Config, bins: &[BinRecord]) -> Vec<DataSource> {
    let mut sources = Vec::with_capacity(2);

    match db_connection(&config.database_url).await {
        Ok(pool) => {
            let store = SqliteStore::new(pool);
            match store.upsert_bins(bins).await {
                Ok(()) => sources.push(store.into()),
                Err(e) => warn!("Could not seed SQLite, skipping it: {e}"),
            }
        }
        Err(e) => warn!("SQLite unavailable ({e}), continuing with in-memory data"),
    }

    sources.push(MemoryStore::with_bins(bins.to_vec()).into());
    sources
}

fn print_summary(routes: &[CurrentRoute]) {
    let total_km: f64 = routes.iter().map(|r| r.metrics.total_distance_km).sum();
    let total_min: f64 = routes.iter().map(|r| r.metrics.estimated_time_minutes).sum();

    for route in routes {
        let line = format!(
            "{:<10} {:>3} stops {:>9.2} km {:>6} min",
            route.collector_id,
            route.stops.len(),
            route.metrics.total_distance_km,
            route.metrics.estimated_time_minutes
        );
        if route.stops.is_empty() {
            println!("{}", line.yellow());
        } else {
            println!("{}", line.green());
        }
        let order: Vec<&str> = route.stops.iter().map(|s| s.bin.bin_id.as_str()).collect();
        println!("           {}", order.join(" -> ").dimmed());
    }

    println!(
        "{}",
        format!(
            "{} routes, {:.2} km, {} min in total",
            routes.len(),
            total_km,
            total_min
        )
        .bold()
    );
}

pub async fn run() -> Result<()> {
    dotenv().ok();
    init_tracing()?;
    let config = Config::load()?;

    let bins = {
        let span = span!(Level::INFO, "setup");
        let _guard = span.enter();
        input_bins(&config)?
    };
    info!("Planning routes for {} bins", bins.len());

    let chain = FallbackChain::new(build_sources(&config, &bins).await)?;
    let planner = RoutePlanner::from_config(chain, &config);

    let routes = planner
        .plan_all(&Actor::supervisor("binroute"), None)
        .await?;

    print_summary(&routes);
    save_routes_to_csv(&routes, &config.output_csv)?;

    Ok(())
}
