use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use tracing_subscriber::EnvFilter;

use commute_server::bike::{GbfsClient, GbfsConfig};
use commute_server::config::Config;
use commute_server::schedule::Timetable;
use commute_server::subscriber;
use commute_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load();

    // The worker is the sole writer of the count; handlers only read it.
    let latest_count = Arc::new(AtomicUsize::new(0));
    subscriber::spawn(config.clone(), latest_count.clone());

    let bike = GbfsClient::new(GbfsConfig::default()).expect("Failed to create GBFS client");
    let state = AppState::new(Timetable::builtin(), bike, latest_count, &config.tz);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
    println!("Commute dashboard API listening on http://{addr}");
    println!();
    println!("Endpoints:");
    println!("  GET /health          - Health check");
    println!("  GET /congestion      - Latest object count and level");
    println!("  GET /bus             - Next departures (optional ?line= and ?n=)");
    println!("  GET /timetable       - Full timetable");
    println!("  GET /bike            - Bike availability");
    println!("  GET /bike-direction  - Directional bike availability");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
