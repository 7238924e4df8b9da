use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use dumpling_protocol::EaterIdentity;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::{ConsumerRecord, HubState, CONSUMER_QUEUE_CAPACITY};

/// Router for the eater-facing (consumer) side of the hub.
pub fn egress_router(state: Arc<HubState>) -> Router {
    Router::new()
        .route("/", get(upgrade))
        .with_state(state)
}

async fn upgrade(
    ws: WebSocketUpgrade,
    State(state): State<Arc<HubState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_consumer(socket, state, addr))
}

async fn handle_consumer(socket: WebSocket, state: Arc<HubState>, addr: SocketAddr) {
    let (mut sender, mut receiver) = socket.split();

    let identity: EaterIdentity = match receiver.next().await {
        Some(Ok(Message::Text(text))) => match serde_json::from_str(&text) {
            Ok(identity) => identity,
            Err(e) => {
                warn!(peer = %addr, error = %e, "eater sent an invalid identity frame");
                return;
            }
        },
        _ => {
            warn!(peer = %addr, "eater disconnected before sending an identity frame");
            return;
        }
    };

    let id = Uuid::new_v4();
    let (queue_tx, mut queue_rx) = mpsc::channel::<Vec<u8>>(CONSUMER_QUEUE_CAPACITY);
    let (close_tx, mut close_rx) = mpsc::channel(1);

    info!(eater = %identity.eater_name, peer = %addr, "eater connected");

    state
        .register_consumer(
            id,
            ConsumerRecord {
                identity: identity.clone(),
                peer_host: addr.ip().to_string(),
                peer_port: addr.port(),
                queue_tx,
                close_tx,
            },
        )
        .await;

    loop {
        tokio::select! {
            frame = queue_rx.recv() => {
                match frame {
                    Some(bytes) => {
                        let text = String::from_utf8_lossy(&bytes).into_owned();
                        if sender.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                        state.record_dumpling_out();
                    }
                    None => break,
                }
            }
            reason = close_rx.recv() => {
                if let Some(reason) = reason {
                    let _ = sender
                        .send(Message::Close(Some(CloseFrame {
                            code: reason.code,
                            reason: reason.reason.into(),
                        })))
                        .await;
                    warn!(eater = %identity.eater_name, peer = %addr, code = reason.code, "disconnecting eater");
                }
                break;
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    state.unregister_consumer(id).await;
    info!(eater = %identity.eater_name, peer = %addr, "eater disconnected");
}
