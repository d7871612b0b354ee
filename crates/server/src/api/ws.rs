//! WebSocket search sessions.
//!
//! Each connection drives its own search session: the client sends what is
//! in the search box, the server pushes the whole view whenever it changes.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use marquee_core::{spawn_session, SessionView};

use crate::metrics::{
    WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_MESSAGES_RECEIVED, WS_MESSAGES_SENT,
};
use crate::state::AppState;

/// Message sent by the browser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Current contents of the search box.
    Input { query: String },
}

/// Message pushed to the browser.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full view state: search results and trending panel.
    View(SessionView),
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle a single WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();

    let session = spawn_session(Arc::clone(state.coordinator()), state.debounce());
    let mut view_rx = session.subscribe();

    // Track connection metrics
    WS_CONNECTIONS_TOTAL.inc();
    WS_CONNECTIONS_ACTIVE.inc();

    info!("WebSocket client {} connected", connection_id);

    // Forward every view change to the client, starting with the initial one
    let send_task = tokio::spawn(async move {
        loop {
            let msg = ServerMessage::View(view_rx.borrow_and_update().clone());

            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, client disconnected");
                        break;
                    }
                    WS_MESSAGES_SENT.with_label_values(&["view"]).inc();
                }
                Err(e) => {
                    error!("Failed to serialize ServerMessage: {}", e);
                }
            }

            if view_rx.changed().await.is_err() {
                debug!("Search session closed");
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(ClientMessage::Input { query }) => {
                    WS_MESSAGES_RECEIVED.with_label_values(&["input"]).inc();
                    if !session.input(query).await {
                        warn!("Search session for {} stopped unexpectedly", connection_id);
                        break;
                    }
                }
                Err(e) => {
                    WS_MESSAGES_RECEIVED.with_label_values(&["invalid"]).inc();
                    debug!("Ignoring malformed message from {}: {}", connection_id, e);
                }
            },
            Ok(Message::Close(_)) => {
                debug!("WebSocket client requested close");
                break;
            }
            Ok(Message::Ping(data)) => {
                // Pong is handled automatically by axum
                debug!("Received ping: {:?}", data);
            }
            Ok(_) => {
                // Ignore other message types
            }
            Err(e) => {
                warn!("WebSocket receive error: {}", e);
                break;
            }
        }
    }

    // Clean up
    send_task.abort();
    session.close().await;
    WS_CONNECTIONS_ACTIVE.dec();
    info!("WebSocket client {} disconnected", connection_id);
}
