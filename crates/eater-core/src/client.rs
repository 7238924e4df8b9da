use dumpling_protocol::{CloseReason, EaterIdentity};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::protocol::{frame::coding::CloseCode, CloseFrame};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error};

use crate::error::EaterError;
use crate::handler::EaterHandler;

/// Opens a consumer stream to a hub, sends the identity frame, and loops
/// decoding dumplings until cancelled, the eat limit is reached, or the hub
/// closes the stream.
pub struct EaterClient<H: EaterHandler> {
    hub_addr: String,
    eater_name: String,
    chef_filter: Option<Vec<String>>,
    eat_limit: Option<u64>,
    handler: H,
}

impl<H: EaterHandler> EaterClient<H> {
    pub fn new(
        hub_addr: impl Into<String>,
        eater_name: impl Into<String>,
        chef_filter: Option<Vec<String>>,
        eat_limit: Option<u64>,
        handler: H,
    ) -> Self {
        Self {
            hub_addr: hub_addr.into(),
            eater_name: eater_name.into(),
            chef_filter,
            eat_limit,
            handler,
        }
    }

    /// Runs the eater to completion. Returns once the stream closes, the
    /// eat limit is hit, or the process is cancelled.
    pub async fn run(mut self) -> Result<(), EaterError> {
        let uri = format!("ws://{}/", self.hub_addr);
        let (stream, _) = tokio_tungstenite::connect_async(&uri)
            .await
            .map_err(|e| EaterError::Connect(e.to_string()))?;
        let (mut sender, mut receiver) = stream.split();

        let identity = EaterIdentity {
            eater_name: self.eater_name.clone(),
        };
        let frame = serde_json::to_string(&identity)
            .map_err(|e| EaterError::Serialization(e.to_string()))?;
        sender
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| EaterError::Ws(e.to_string()))?;

        self.handler.on_connect(&uri).await;

        let mut eaten: u64 = 0;

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    close(&mut sender, CloseReason::cancelled()).await;
                    break;
                }
                incoming = receiver.next() => {
                    match incoming {
                        Some(Ok(Message::Text(text))) => {
                            match dumpling_protocol::decode(text.as_bytes()) {
                                Ok(dumpling) => {
                                    let wanted = match &self.chef_filter {
                                        None => true,
                                        Some(chefs) => chefs.iter().any(|c| c == dumpling.chef_name()),
                                    };

                                    if wanted {
                                        eaten += 1;
                                        self.handler.on_dumpling(&dumpling).await;
                                    }

                                    if matches!(self.eat_limit, Some(limit) if eaten >= limit) {
                                        close(&mut sender, CloseReason::eater_full()).await;
                                        break;
                                    }
                                }
                                Err(e) => {
                                    error!(eater = %self.eater_name, error = %e, "dropping invalid dumpling");
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            self.handler.on_connection_lost("hub closed the connection").await;
                            break;
                        }
                        Some(Err(e)) => {
                            self.handler.on_connection_lost(&e.to_string()).await;
                            break;
                        }
                        _ => {}
                    }
                }
            }
        }

        debug!(eater = %self.eater_name, eaten, "eater finished");
        Ok(())
    }
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
