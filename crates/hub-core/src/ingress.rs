use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use dumpling_protocol::KitchenIdentity;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::{HubState, ProducerRecord};

/// Router for the kitchen-facing (producer) side of the hub. One route:
/// every connection is a producer stream.
pub fn ingress_router(state: Arc<HubState>) -> Router {
    Router::new()
        .route("/", get(upgrade))
        .with_state(state)
}

async fn upgrade(
    ws: WebSocketUpgrade,
    State(state): State<Arc<HubState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_producer(socket, state, addr))
}

async fn handle_producer(mut socket: WebSocket, state: Arc<HubState>, addr: SocketAddr) {
    let identity = match read_identity(&mut socket).await {
        Some(identity) => identity,
        None => {
            warn!(peer = %addr, "producer disconnected before sending a valid identity frame");
            return;
        }
    };

    let id = Uuid::new_v4();
    info!(kitchen = %identity.kitchen_name, peer = %addr, "kitchen connected");

    state
        .register_producer(
            id,
            ProducerRecord {
                identity: identity.clone(),
                peer_host: addr.ip().to_string(),
                peer_port: addr.port(),
            },
        )
        .await;

    while let Some(Ok(message)) = socket.recv().await {
        let bytes = match message {
            Message::Text(text) => text.as_bytes().to_vec(),
            Message::Binary(bytes) => bytes.to_vec(),
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => continue,
        };

        match dumpling_protocol::validate(&bytes) {
            Ok(chef_name) => {
                state.record_dumpling_in();
                state.fan_out(&bytes).await;
                debug!(kitchen = %identity.kitchen_name, chef = %chef_name, "relayed dumpling");
            }
            Err(e) => {
                warn!(kitchen = %identity.kitchen_name, error = %e, "dropping invalid dumpling");
            }
        }
    }

    state.unregister_producer(id).await;
    info!(kitchen = %identity.kitchen_name, peer = %addr, "kitchen disconnected");
}

async fn read_identity(socket: &mut WebSocket) -> Option<KitchenIdentity> {
    match socket.recv().await {
        Some(Ok(Message::Text(text))) => serde_json::from_str(&text).ok(),
        _ => None,
    }
}
