//! Lake Monitoring Service - Main Daemon
//!
//! A daemon that periodically:
//! 1. Fetches the laghi.net lake widget (level, inflow, outflow, fill)
//! 2. Normalizes it into one record per configured lake
//! 3. Publishes one sensor per (lake, measurement)
//! 4. Optionally serves those sensors over HTTP
//!
//! Usage:
//!   cargo run --release                          # Start daemon with laghi.toml
//!   cargo run --release -- --config other.toml   # Use another configuration file
//!   cargo run --release -- --endpoint 8080       # Serve sensors on port 8080
//!   cargo run --release -- --once                # Refresh once, print sensors, exit
//!
//! Environment:
//!   RUST_LOG - log filter (default: info)

use laghi_service::config::{load_config, load_config_or_default, DEFAULT_CONFIG_PATH};
use laghi_service::daemon::Daemon;
use laghi_service::endpoint;
use std::env;

fn main() {
    // Load .env file if present, then logging
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("🏞️  Lake Monitoring Service (laghi.net)");
    println!("======================================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<String> = None;
    let mut endpoint_port: Option<u16> = None;
    let mut once = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
            }
            "--endpoint" => {
                match args.get(i + 1).and_then(|p| p.parse().ok()) {
                    Some(port) => endpoint_port = Some(port),
                    None => {
                        eprintln!("Error: --endpoint requires a port number");
                        std::process::exit(1);
                    }
                }
                i += 2;
            }
            "--once" => {
                once = true;
                i += 1;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--config PATH] [--endpoint PORT] [--once]", args[0]);
                std::process::exit(1);
            }
        }
    }

    // An explicit path must exist; the default may be absent
    let loaded = match &config_path {
        Some(path) => load_config(path),
        None => load_config_or_default(DEFAULT_CONFIG_PATH),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            std::process::exit(1);
        }
    };
    if endpoint_port.is_some() {
        config.endpoint_port = endpoint_port;
    }

    let mut daemon = Daemon::with_config(config);

    if once {
        if let Err(e) = daemon.prepare() {
            eprintln!("\n❌ Initialization failed: {}\n", e);
            std::process::exit(1);
        }
        match daemon.run_once() {
            Ok(states) => {
                for state in states {
                    match (state.value, state.unit) {
                        (Some(value), Some(unit)) => println!("   {:<45} {} {}", state.name, value, unit),
                        _ => println!("   {:<45} unavailable", state.name),
                    }
                }
            }
            Err(e) => {
                eprintln!("❌ Refresh failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("📊 Initializing daemon...");
    if let Err(e) = daemon.initialize() {
        eprintln!("\n❌ Initialization failed: {}\n", e);
        std::process::exit(1);
    }
    println!("✓ Daemon initialized\n");

    // Start HTTP endpoint if requested (in background thread)
    if let Some(port) = daemon.config().endpoint_port {
        println!("🚀 Starting HTTP endpoint server...");
        match (daemon.snapshot_handle(), daemon.configured_lakes()) {
            (Ok(snapshot), Ok(lakes)) => {
                std::thread::spawn(move || {
                    if let Err(e) = endpoint::start_endpoint_server(port, snapshot, lakes) {
                        eprintln!("❌ Endpoint server error: {}", e);
                    }
                });
                println!("   Endpoint running on http://0.0.0.0:{}\n", port);
            }
            _ => eprintln!("❌ Daemon not ready, continuing without HTTP endpoint\n"),
        }
    }

    println!("🔄 Starting refresh loop...");
    println!("   Refresh interval: {} minutes", daemon.config().scan_interval_minutes);
    println!("   Press Ctrl+C to stop\n");

    if let Err(e) = daemon.run() {
        eprintln!("\n❌ Daemon error: {}", e);
        std::process::exit(1);
    }
}
