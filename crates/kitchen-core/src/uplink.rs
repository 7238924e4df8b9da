use dumpling_protocol::{CloseReason, KitchenIdentity};
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::{frame::coding::CloseCode, CloseFrame};
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum UplinkError {
    #[error("could not connect to hub: {0}")]
    Connect(String),
    #[error("websocket error: {0}")]
    Ws(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Drains `outbound_rx` and forwards each frame to the hub over one
/// persistent stream: identity frame first, then dumplings indefinitely.
///
/// There is no ack protocol here — guaranteed delivery is explicitly out of
/// scope — so this is fire-and-forget. On connect failure, remote close, or
/// cancellation it logs and returns rather than retrying.
pub async fn run_uplink(
    hub_addr: String,
    identity: KitchenIdentity,
    mut outbound_rx: mpsc::Receiver<Vec<u8>>,
) -> Result<(), UplinkError> {
    let uri = format!("ws://{hub_addr}/");
    let (stream, _) = tokio_tungstenite::connect_async(&uri)
        .await
        .map_err(|e| UplinkError::Connect(e.to_string()))?;
    let (mut sender, mut receiver) = stream.split();

    let frame = serde_json::to_string(&identity)
        .map_err(|e| UplinkError::Serialization(e.to_string()))?;
    sender
        .send(Message::Text(frame.into()))
        .await
        .map_err(|e| UplinkError::Ws(e.to_string()))?;

    info!(kitchen = %identity.kitchen_name, hub = %hub_addr, "uplink connected");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                close(&mut sender, CloseReason::cancelled()).await;
                break;
            }
            dumpling = outbound_rx.recv() => {
                match dumpling {
                    Some(bytes) => {
                        let text = String::from_utf8_lossy(&bytes).into_owned();
                        if let Err(e) = sender.send(Message::Text(text.into())).await {
                            warn!(kitchen = %identity.kitchen_name, error = %e, "uplink write failed; exiting");
                            break;
                        }
                    }
                    None => {
                        close(&mut sender, CloseReason::cancelled()).await;
                        break;
                    }
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => {
                        info!(kitchen = %identity.kitchen_name, "hub closed the uplink");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(kitchen = %identity.kitchen_name, error = %e, "uplink read error; exiting");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

async fn close<S>(sender: &mut S, reason: CloseReason)
where
    S: futures_util::Sink<Message> + Unpin,
{
    let frame = CloseFrame {
        code: CloseCode::from(reason.code),
        reason: reason.reason.into(),
    };
    let _ = sender.send(Message::Close(Some(frame))).await;
}
