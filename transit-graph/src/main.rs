use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_graph::engine::QueryConfig;
use transit_graph::graph::GraphBuilder;
use transit_graph::gtfs;
use transit_graph::schedule::{ScheduleConfig, VisitStore};
use transit_graph::spatial::EARTH_RADIUS_MILES;
use transit_graph::transfer::TransferConfig;
use transit_graph::web::{AppState, create_router};

const DEFAULT_GTFS_DIR: &str = "gtfs";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DAY_FILTER: &str = "Weekday";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "transit graph server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let gtfs_dir =
        PathBuf::from(std::env::var("GTFS_DIR").unwrap_or_else(|_| DEFAULT_GTFS_DIR.into()));
    let day_filter = std::env::var("DAY_FILTER").unwrap_or_else(|_| DEFAULT_DAY_FILTER.into());
    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
        .parse()?;

    let graph = tokio::task::spawn_blocking(move || {
        let raw = gtfs::read_dir(&gtfs_dir)?;
        let config = ScheduleConfig::new(day_filter, EARTH_RADIUS_MILES);
        let store = VisitStore::from_records(&raw, &config)?;
        GraphBuilder::new(&store).build(&TransferConfig::default())
    })
    .await??;

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        stops = graph.stop_count(),
        "graph ready"
    );

    let state = AppState::new(graph, QueryConfig::default());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    info!("  GET  /health                  - Health check");
    info!("  GET  /stats                   - Graph size");
    info!("  POST /travel-times            - Travel times from a location");
    info!("  POST /travel-times/positions  - Travel times to positions");

    axum::serve(listener, app).await?;
    Ok(())
}
