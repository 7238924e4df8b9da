use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use hub_core::{egress_router, ingress_router, run_status_synthesizer, HubState, TransportBindError};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Dumpling broker: relays dumplings from kitchens to eaters over two
/// independently bound WebSocket ports.
#[derive(Parser, Debug)]
#[command(name = "hub")]
struct Cli {
    #[arg(long, default_value = "localhost")]
    address: String,

    #[arg(long = "in-port", default_value_t = 11347)]
    in_port: u16,

    #[arg(long = "out-port", default_value_t = 11348)]
    out_port: u16,

    #[arg(long = "status-freq", default_value_t = 5)]
    status_freq: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let state = HubState::new();

    let ingress_addr = format!("{}:{}", cli.address, cli.in_port);
    let egress_addr = format!("{}:{}", cli.address, cli.out_port);

    let ingress_listener = bind_or_exit(&ingress_addr).await;
    let egress_listener = bind_or_exit(&egress_addr).await;

    info!(ingress = %ingress_addr, egress = %egress_addr, "hub listening");

    tokio::spawn(run_status_synthesizer(
        state.clone(),
        Duration::from_secs(cli.status_freq),
    ));

    let ingress_app =
        ingress_router(state.clone()).into_make_service_with_connect_info::<SocketAddr>();
    let egress_app = egress_router(state).into_make_service_with_connect_info::<SocketAddr>();

    let ingress_server =
        axum::serve(ingress_listener, ingress_app).with_graceful_shutdown(shutdown_signal());
    let egress_server =
        axum::serve(egress_listener, egress_app).with_graceful_shutdown(shutdown_signal());

    let (ingress_result, egress_result) = tokio::join!(ingress_server, egress_server);
    if let Err(e) = ingress_result {
        error!(error = %e, "ingress server error");
    }
    if let Err(e) = egress_result {
        error!(error = %e, "egress server error");
    }
}

async fn bind_or_exit(addr: &str) -> TcpListener {
    match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(source) => {
            let err = TransportBindError::Bind {
                addr: addr.to_string(),
                source,
            };
            error!(error = %err, "fatal: could not start hub");
            std::process::exit(1);
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install ctrl_c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down");
}
