use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use ulid::Ulid;

use crate::protocol::{self, parse_start_request, ServerMessage};
use crate::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle one viewer connection.
///
/// Viewers only receive events broadcast after they connect; there is no
/// catch-up on join.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let viewer_id = Ulid::new();
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.subscribe();

    tracing::info!(
        "Viewer {} connected ({} viewers)",
        viewer_id,
        state.viewer_count()
    );

    loop {
        tokio::select! {
            event = events.recv() => {
                match delivery_for(event) {
                    Delivery::Send(json) => {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Delivery::Skip => {}
                    Delivery::Stop => break,
                }
            }

            frame = receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        handle_text(&state, text.as_str());
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("Viewer {} WebSocket error: {}", viewer_id, e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    tracing::info!("Viewer {} disconnected", viewer_id);
}

/// What a viewer connection does with the next item from its subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Send this text frame
    Send(String),
    /// Nothing to send, keep the connection
    Skip,
    /// The event channel is gone, disconnect
    Stop,
}

/// Map a broadcast receive result to a delivery decision.
///
/// A lagging viewer misses the overwritten events and carries on.
pub fn delivery_for(event: Result<ServerMessage, RecvError>) -> Delivery {
    match event {
        Ok(msg) => match protocol::encode(&msg) {
            Ok(json) => Delivery::Send(json),
            Err(e) => {
                tracing::error!("Failed to encode event: {}", e);
                Delivery::Skip
            }
        },
        Err(RecvError::Lagged(skipped)) => {
            tracing::debug!("Viewer lagged, skipped {} events", skipped);
            Delivery::Skip
        }
        Err(RecvError::Closed) => Delivery::Stop,
    }
}

/// Handle an inbound text frame.
///
/// Returns true if a start request was queued. Anything else is dropped
/// without a reply.
pub fn handle_text(state: &AppState, text: &str) -> bool {
    tracing::debug!("Received message: {}", text);

    match parse_start_request(text) {
        Some(name) => {
            let queued = state.request_start(name);
            if !queued {
                tracing::warn!("Game loop is not running, start request dropped");
            }
            queued
        }
        None => false,
    }
}
