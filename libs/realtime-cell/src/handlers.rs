use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
    Extension,
};
use futures::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use shared_models::auth::Session;

use crate::hub::LiveUpdateHub;

pub async fn live_updates_socket(
    ws: WebSocketUpgrade,
    Extension(hub): Extension<LiveUpdateHub>,
    Extension(session): Extension<Session>,
) -> impl IntoResponse {
    info!("Dashboard WebSocket upgrade for {}", session.subject);
    ws.on_upgrade(move |socket| forward_events(socket, hub))
}

async fn forward_events(socket: WebSocket, hub: LiveUpdateHub) {
    let (mut sink, mut stream) = socket.split();
    let mut events = hub.subscribe();

    let hello = json!({ "type": "connected" }).to_string();
    if sink.send(Message::Text(hello.into())).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(message) => {
                    if sink.send(Message::Text(message.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Dashboard client lagged, skipped {} event(s)", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(Message::Ping(payload))) => {
                    if sink.send(Message::Pong(payload)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("Dashboard WebSocket error: {}", e);
                    break;
                }
            },
        }
    }

    let _ = sink.close().await;
    debug!("Dashboard WebSocket closed");
}
