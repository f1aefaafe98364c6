use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};
use warp::{self, Filter};

use snapfeed::config::ServerConfig;
use snapfeed::constants::WS_PATH;
use snapfeed::core::server::{ServerManager, SharedServerManager};
use snapfeed::handlers::posts;
use snapfeed::handlers::websocket::handle_ws_client;
use snapfeed::storage::memory::create_memory_store;

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    // Load config from .env
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, ring_timeout={:?}",
        config.host, config.port, config.ring_timeout
    );

    // Build the server address before moving the config
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    // Create the server manager over an in-memory store
    let store = create_memory_store();
    let server: SharedServerManager = Arc::new(ServerManager::new(store, config));

    // Expire unanswered calls in the background
    server.clone().start_ring_sweep_task();

    // Create WebSocket route
    let ws_route = warp::path(WS_PATH)
        .and(warp::ws())
        .and(with_server(server.clone()))
        .map(|ws: warp::ws::Ws, server: SharedServerManager| {
            info!("New websocket connection");
            ws.on_upgrade(move |socket| handle_ws_client(socket, server))
        });

    // Post creation: persist, then relay the new post feed-wide
    let create_post_route = warp::path!("api" / "posts")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_server(server.clone()))
        .and_then(posts::create_post);

    let list_posts_route = warp::path!("api" / "posts")
        .and(warp::get())
        .and(with_server(server.clone()))
        .and_then(posts::list_posts);

    // Create health check route
    let health_route = warp::path("health").map(|| "OK");

    // Combine routes
    let routes = ws_route
        .or(create_post_route)
        .or(list_posts_route)
        .or(health_route);

    // Start the server
    info!("Starting snapfeed server on {}", addr);

    warp::serve(routes).run(addr).await;
}

// Helper function to include the server manager in a request
fn with_server(
    server: SharedServerManager,
) -> impl Filter<Extract = (SharedServerManager,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || server.clone())
}
