//! Notification socket at `/ws`

use crate::notify::{Delivery, Subscription};
use crate::repository::Repository;
use crate::state::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use bulletin_core::model::Notification;

/// Upgrade the connection and stream notifications to it
pub async fn ws_handler<R: Repository>(
    ws: WebSocketUpgrade,
    State(state): State<AppState<R>>,
) -> Response {
    // Subscribe before the upgrade so nothing published meanwhile is missed
    let subscription = state.hub.subscribe();
    let metrics = state.metrics.clone();
    let hub = state.hub.clone();

    ws.on_upgrade(move |socket| async move {
        metrics.increment("ws.connections");
        metrics.gauge("ws.open", hub.connection_count() as u64);
        tracing::info!(open = hub.connection_count(), "WebSocket client connected");

        handle_socket(socket, subscription).await;

        // The subscription is gone by now
        metrics.gauge("ws.open", hub.connection_count() as u64);
        tracing::info!(open = hub.connection_count(), "WebSocket client disconnected");
    })
}

async fn handle_socket(mut socket: WebSocket, mut subscription: Subscription) {
    let Ok(greeting) = serde_json::to_string(&Notification::connected()) else {
        return;
    };
    if socket.send(Message::Text(greeting.into())).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            delivery = subscription.next() => match delivery {
                Delivery::Message(payload) => {
                    if socket.send(Message::Text(payload.to_string().into())).await.is_err() {
                        break;
                    }
                }
                Delivery::Finished => break,
            },
            incoming = socket.recv() => match incoming {
                // Client messages carry nothing the server acts on
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    drop(subscription);
    let _ = socket.send(Message::Close(None)).await;
}
