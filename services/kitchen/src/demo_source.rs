use std::thread;
use std::time::Duration;

use kitchen_core::{ArpInfo, ArpOperation, ChannelPacketSource, RawPacket};

/// Real packet capture is an external collaborator (see the root design
/// notes): this kitchen ships no sniffer backend, only the `PacketSource`
/// seam `kitchen-core` defines. This generator stands in for one, cycling
/// through a small fixed set of synthetic packets so the kitchen has
/// something to dispatch to its chefs without a live network interface.
pub fn spawn(interface: String, filter: String) -> ChannelPacketSource {
    let (tx, source) = ChannelPacketSource::channel();

    thread::spawn(move || {
        tracing::info!(interface = %interface, filter = %filter, "demo packet source running (no capture backend configured)");
        let samples = demo_packets();
        let mut i = 0usize;
        loop {
            let packet = samples[i % samples.len()].clone();
            if tx.send(packet).is_err() {
                break;
            }
            i += 1;
            thread::sleep(Duration::from_millis(200));
        }
    });

    source
}

fn demo_packets() -> Vec<RawPacket> {
    vec![
        RawPacket {
            layers: vec!["Ethernet".to_string(), "IP".to_string(), "TCP".to_string()],
            arp: None,
            dns_hostname: None,
            summary: "TCP segment".to_string(),
        },
        RawPacket {
            layers: vec!["Ethernet".to_string(), "ARP".to_string()],
            arp: Some(ArpInfo {
                operation: ArpOperation::Reply,
                src_hw: "aa:bb:cc:dd:ee:ff".to_string(),
                src_ip: "10.0.1.100".to_string(),
                dst_hw: "11:22:33:44:55:66".to_string(),
                dst_ip: "10.0.1.99".to_string(),
            }),
            dns_hostname: None,
            summary: "ARP reply".to_string(),
        },
        RawPacket {
            layers: vec!["Ethernet".to_string(), "IP".to_string(), "UDP".to_string(), "DNS".to_string()],
            arp: None,
            dns_hostname: Some("example.com".to_string()),
            summary: "DNS query".to_string(),
        },
    ]
}
