use futures_util::sink::SinkExt;
use futures_util::stream::StreamExt;
use log::{error, info, warn};
use tokio::sync::mpsc;
use uuid::Uuid;
use warp::ws::WebSocket;

use crate::core::dispatcher::EventDispatcher;
use crate::core::events::ServerEvent;
use crate::core::server::SharedServerManager;

// Handle a WebSocket connection
pub async fn handle_ws_client(ws: WebSocket, server: SharedServerManager) {
    let (mut ws_tx, mut ws_rx) = ws.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn a task to forward messages from our channel to the WebSocket
    tokio::task::spawn(async move {
        let mut rx = rx;
        while let Some(message) = rx.recv().await {
            if let Err(e) = ws_tx.send(message).await {
                error!("Failed to send WebSocket message: {}", e);
                break;
            }
        }
    });

    // Generate a unique connection ID
    let connection_id = Uuid::new_v4().to_string();

    server
        .register_connection(connection_id.clone(), tx.clone())
        .await;
    info!("Client connected: {}", connection_id);

    // Tell the client its connection id; it addresses call answers with it
    server
        .send_to_connection(
            &connection_id,
            &ServerEvent::Connected {
                connection_id: connection_id.clone(),
            },
        )
        .await;

    let dispatcher = EventDispatcher::new(server.clone());

    // Handle incoming events
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(msg) => {
                // Only process text frames
                if let Ok(text) = msg.to_str() {
                    if let Err(e) = dispatcher.dispatch(&connection_id, text).await {
                        warn!("Rejected frame from {}: {}", connection_id, e);
                    }
                }
            }
            Err(e) => {
                error!("WebSocket error on {}: {}", connection_id, e);
                break;
            }
        }
    }

    // Client disconnected: registry, rooms, and live calls are torn down
    server.disconnect(&connection_id).await;
    info!("Client disconnected: {}", connection_id);
}
