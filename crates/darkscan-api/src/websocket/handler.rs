//! WebSocket handler implementation.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use darkscan_protocols::ScanMode;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::state::AppState;

use super::message::WsMessage;

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Push the current report, then every new one until the client leaves.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket connected");
    let (mut sender, mut receiver) = socket.split();
    let mut results = state.scheduler.subscribe();

    let current = WsMessage::Results(state.scheduler.report());
    if send(&mut sender, &current).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            report = results.recv() => match report {
                Ok(report) => {
                    if send(&mut sender, &WsMessage::Results(report)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "WebSocket client fell behind, skipping reports");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let reply = match serde_json::from_str::<WsMessage>(&text) {
                        Ok(msg) => handle_message(msg, &state),
                        Err(e) => {
                            warn!(error = %e, "Failed to parse WebSocket message");
                            Some(WsMessage::error("PARSE_ERROR", e.to_string()))
                        }
                    };
                    if let Some(reply) = reply {
                        if send(&mut sender, &reply).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    warn!(error = %e, "WebSocket error");
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }

    info!("WebSocket disconnected");
}

fn handle_message(msg: WsMessage, state: &AppState) -> Option<WsMessage> {
    match msg {
        WsMessage::Ping { timestamp } => Some(WsMessage::Pong { timestamp }),
        WsMessage::Redo => Some(WsMessage::Started {
            started: state.scheduler.request_scan(ScanMode::Both),
        }),
        other => {
            debug!(?other, "Ignoring unexpected message from client");
            None
        }
    }
}

async fn send(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &WsMessage,
) -> Result<(), axum::Error> {
    match serde_json::to_string(msg) {
        Ok(json) => sender.send(Message::Text(json.into())).await,
        Err(e) => {
            warn!(error = %e, "Failed to encode WebSocket message");
            Ok(())
        }
    }
}
