mod chefs;
mod config;
mod demo_source;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use dumpling_protocol::KitchenIdentity;
use kitchen_core::Kitchen;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const OUTBOUND_QUEUE_CAPACITY: usize = 1024;

/// Packet-sniffing producer: captures packets, dispatches them (and a
/// periodic timer poke) to a compiled-in set of chefs, and forwards every
/// resulting dumpling to a hub.
#[derive(Parser, Debug)]
#[command(name = "kitchen")]
struct Cli {
    /// Optional TOML config file supplying defaults for unset flags below.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long = "kitchen-name")]
    kitchen_name: Option<String>,

    #[arg(long)]
    hub: Option<String>,

    #[arg(long)]
    interface: Option<String>,

    #[arg(long)]
    filter: Option<String>,

    /// Accepted for CLI-surface parity with the original dynamic loader;
    /// this kitchen ships chefs compiled in, so module paths are only
    /// logged, never loaded.
    #[arg(long = "chef-module")]
    chef_module: Vec<String>,

    /// Chef names to register (by their compiled-in registry name). Omit to
    /// register every compiled-in chef.
    #[arg(long = "chef")]
    chef: Vec<String>,

    /// Seconds between interval pokes, or "none" to disable the poke worker.
    #[arg(long = "poke-interval")]
    poke_interval: Option<String>,

    /// Print the compiled-in chef registry and exit.
    #[arg(long = "chef-list")]
    chef_list: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if cli.chef_list {
        for name in chefs::all_chef_names() {
            println!("{name}");
        }
        std::process::exit(0);
    }

    let file_config = match &cli.config {
        Some(path) => match config::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = %e, "failed to load config file");
                std::process::exit(1);
            }
        },
        None => config::KitchenFileConfig::default(),
    };

    for module in &cli.chef_module {
        warn!(module, "dynamic chef-module loading is not supported; only compiled-in chefs are available");
    }

    let kitchen_name = cli
        .kitchen_name
        .or(file_config.kitchen_name)
        .unwrap_or_else(|| "nameless_kitchen".to_string());
    let hub_addr = cli.hub.or(file_config.hub).unwrap_or_else(|| "localhost:11347".to_string());
    let interface = cli.interface.or(file_config.interface).unwrap_or_else(|| "all".to_string());
    let filter = cli.filter.or(file_config.filter).unwrap_or_default();

    let requested_chefs = if !cli.chef.is_empty() {
        cli.chef
    } else if let Some(chefs) = file_config.chefs {
        chefs
    } else {
        chefs::all_chef_names().into_iter().map(str::to_string).collect()
    };

    let poke_interval = match cli.poke_interval.or(file_config.poke_interval.map(|n| n.to_string())) {
        Some(raw) if raw.eq_ignore_ascii_case("none") => None,
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(_) => {
                error!(value = %raw, "invalid --poke-interval; expected a number of seconds or \"none\"");
                std::process::exit(1);
            }
        },
        None => Some(5),
    };

    let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
    let kitchen = Kitchen::new(kitchen_name.clone(), outbound_tx);

    let mut loaded_any = false;
    for name in &requested_chefs {
        match chefs::build_chef(name) {
            Some(chef) => {
                kitchen.register_chef(chef);
                loaded_any = true;
            }
            None => warn!(chef = %name, "unknown chef name; skipping"),
        }
    }

    if !loaded_any {
        error!("no chef was loadable; nothing for this kitchen to do");
        std::process::exit(1);
    }

    let registered = kitchen.chef_names();
    info!(kitchen = %kitchen_name, chefs = ?registered, interface = %interface, filter = %filter, "kitchen starting");

    let identity = KitchenIdentity {
        kitchen_name: kitchen_name.clone(),
        interface: interface.clone(),
        filter: filter.clone(),
        chefs: registered,
        poke_interval,
    };

    let source = demo_source::spawn(interface, filter);
    let _capture_handle = kitchen.spawn_capture(source);
    let _poke_handle = kitchen.spawn_poke(poke_interval.map(Duration::from_secs));

    if let Err(e) = kitchen_core::run_uplink(hub_addr, identity, outbound_rx).await {
        error!(error = %e, "uplink exited");
    }
}
