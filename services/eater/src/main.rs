use clap::Parser;
use dumpling_protocol::Dumpling;
use eater_core::{EaterClient, EaterHandler};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Minimal terminal dumpling eater: connects to a hub's egress port and
/// prints every dumpling it receives.
#[derive(Parser, Debug)]
#[command(name = "eater")]
struct Cli {
    #[arg(long, default_value = "localhost:11348")]
    hub: String,

    #[arg(long = "eater-name", default_value = "nameless_eater")]
    eater_name: String,

    /// Chef names to receive dumplings from. Omit to receive from every
    /// chef.
    #[arg(long = "chef")]
    chef: Vec<String>,

    /// Stop after receiving this many dumplings. Omit to run forever.
    #[arg(long = "eat-count")]
    eat_count: Option<u64>,
}

struct PrintingHandler;

impl EaterHandler for PrintingHandler {
    async fn on_connect(&mut self, hub_uri: &str) {
        info!(hub_uri, "connected");
    }

    async fn on_dumpling(&mut self, dumpling: &Dumpling) {
        println!(
            "{}",
            serde_json::json!({
                "chef_name": dumpling.chef_name(),
                "kitchen_name": dumpling.kitchen_name(),
                "driver": format!("{:?}", dumpling.driver()).to_lowercase(),
                "creation_time": dumpling.creation_time(),
                "payload": dumpling.payload(),
            })
        );
    }

    async fn on_connection_lost(&mut self, reason: &str) {
        info!(reason, "connection lost");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let chef_filter = if cli.chef.is_empty() { None } else { Some(cli.chef) };

    let client = EaterClient::new(cli.hub, cli.eater_name, chef_filter, cli.eat_count, PrintingHandler);

    if let Err(e) = client.run().await {
        tracing::error!(error = %e, "eater exited with an error");
        std::process::exit(1);
    }
}
