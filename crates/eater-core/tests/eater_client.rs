use std::sync::{Arc, Mutex};

use dumpling_protocol::Dumpling;
use eater_core::{EaterClient, EaterHandler};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

#[derive(Default, Clone)]
struct RecordingHandler {
    seen: Arc<Mutex<Vec<String>>>,
}

impl EaterHandler for RecordingHandler {
    async fn on_dumpling(&mut self, dumpling: &Dumpling) {
        self.seen.lock().unwrap().push(dumpling.chef_name().to_string());
    }
}

fn dumpling_frame(chef: &str) -> String {
    serde_json::json!({
        "metadata": {"chef": chef, "kitchen": null, "creation_time": 1.0, "driver": "packet"},
        "payload": {"n": 1}
    })
    .to_string()
}

async fn mock_hub(listener: TcpListener, frames: Vec<&'static str>) {
    let (stream, _) = listener.accept().await.unwrap();
    let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

    // Identity frame from the eater.
    let _identity = ws.next().await.unwrap().unwrap();

    for frame in frames {
        ws.send(Message::Text(frame.to_string().into())).await.unwrap();
    }

    // Let the eater close on its own (eat-limit) or just drop the stream.
    let _ = ws.next().await;
}

#[tokio::test]
async fn filters_by_chef_name() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let frames = vec![
        Box::leak(dumpling_frame("A").into_boxed_str()) as &'static str,
        Box::leak(dumpling_frame("B").into_boxed_str()) as &'static str,
        Box::leak(dumpling_frame("A").into_boxed_str()) as &'static str,
        Box::leak(dumpling_frame("B").into_boxed_str()) as &'static str,
        Box::leak(dumpling_frame("A").into_boxed_str()) as &'static str,
    ];
    let server = tokio::spawn(mock_hub(listener, frames));

    let handler = RecordingHandler::default();
    let seen = handler.seen.clone();
    let client = EaterClient::new(
        addr.to_string(),
        "E",
        Some(vec!["A".to_string()]),
        Some(3),
        handler,
    );

    tokio::time::timeout(std::time::Duration::from_secs(5), client.run())
        .await
        .unwrap()
        .unwrap();
    server.abort();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen, vec!["A", "A", "A"]);
}
