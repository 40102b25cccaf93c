//! iwstat Exporter CLI
//!
//! Serves iwinfo client statistics to Prometheus, or prints a single
//! snapshot to stdout.

use clap::{Parser, Subcommand};
use iwstat_exporter::{
    snapshot::{SnapshotProvider, SnapshotSource},
    FileConfig,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "iwstat-exporter", version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Snapshot file, overriding the configured source.
    #[arg(short, long, global = true)]
    source: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve metrics over HTTP (default).
    Serve {
        /// Listen address, overriding the configuration.
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },
    /// Print the current snapshot and exit.
    Dump,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };
    if let Some(path) = cli.source {
        config.source = SnapshotSource::File(path);
    }

    match cli.command.unwrap_or(Command::Serve { listen: None }) {
        Command::Dump => dump(&config.source),
        Command::Serve { listen } => {
            if let Some(addr) = listen {
                config.server.listen = addr;
            }
            serve(config);
        }
    }
}

fn dump(source: &SnapshotSource) {
    let stats = match source.snapshot() {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("Failed to scan: {}", e);
            std::process::exit(1);
        }
    };

    for s in &stats {
        println!(
            "{:>6} {} RSSI:{:6} SNR:{:4} RX:{:6} TX:{:6} TPUT:{:8}",
            s.interface, s.client, s.rssi, s.snr, s.rx_phy, s.tx_phy, s.expected_throughput
        );
    }
}

#[cfg(feature = "server")]
fn serve(config: FileConfig) {
    use iwstat_exporter::metrics::{MetricsRegistry, MetricsServer, MetricsServerConfig, Publisher};

    info!("iwstat exporter v{}", iwstat_exporter::VERSION);
    info!(source = ?config.source, "Reading snapshots");

    let namespace = &config.metrics.namespace;
    let publisher = match Publisher::with_options(config.source, namespace, config.metrics.labels) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to declare metrics: {}", e);
            std::process::exit(1);
        }
    };
    let registry = match MetricsRegistry::new(namespace) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to create registry: {}", e);
            std::process::exit(1);
        }
    };

    let server = MetricsServer::new(
        MetricsServerConfig {
            bind_addr: config.server.listen,
        },
        registry,
        publisher,
    );

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(server.run()) {
        eprintln!("Cannot start iwstat exporter: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "server"))]
fn serve(_config: FileConfig) {
    info!("iwstat exporter v{}", iwstat_exporter::VERSION);
    eprintln!("Built without the `server` feature; only `dump` is available");
    std::process::exit(2);
}
