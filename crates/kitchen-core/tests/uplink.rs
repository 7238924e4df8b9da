use dumpling_protocol::KitchenIdentity;
use futures_util::StreamExt;
use kitchen_core::run_uplink;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

#[tokio::test]
async fn sends_identity_frame_then_forwards_queued_dumplings() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        let identity_msg = ws.next().await.unwrap().unwrap();
        let identity: KitchenIdentity = serde_json::from_str(identity_msg.to_text().unwrap()).unwrap();
        assert_eq!(identity.kitchen_name, "K");

        let dumpling_msg = ws.next().await.unwrap().unwrap();
        dumpling_protocol::decode(dumpling_msg.into_text().unwrap().as_bytes()).unwrap()
    });

    let (tx, rx) = mpsc::channel(8);
    let identity = KitchenIdentity {
        kitchen_name: "K".to_string(),
        interface: "all".to_string(),
        filter: "tcp".to_string(),
        chefs: vec!["ArpChef".to_string()],
        poke_interval: Some(5),
    };

    let dumpling = dumpling_protocol::Dumpling::new(
        "ArpChef",
        Some("K".to_string()),
        dumpling_protocol::Driver::Packet,
        serde_json::json!({"ok": true}),
    );
    tx.send(dumpling.encode().unwrap()).await.unwrap();
    drop(tx);

    let uplink = tokio::spawn(run_uplink(addr.to_string(), identity, rx));

    let received = tokio::time::timeout(std::time::Duration::from_secs(5), server)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(received.chef_name(), "ArpChef");

    uplink.await.unwrap().unwrap();
}
