//! Prometheus metrics for associated wireless clients.
//!
//! Every numeric snapshot column is exported as its own gauge, labeled
//! with the reporting interface and the client identifier. Values are
//! taken from a fresh snapshot on each scrape; nothing is cached between
//! scrapes.
//!
//! # Metrics Exposed
//!
//! ## Client Metrics
//! - `iwstat_rssi_of_connected_client` - RSSI in dBm
//! - `iwstat_snr_of_connected_client` - SNR in dB
//! - `iwstat_inactive_seconds_of_connected_client` - Seconds since last activity
//! - `iwstat_{rx,tx}_phy_rate_of_connected_client` - PHY rate
//! - `iwstat_{rx,tx}_megabytes_of_connected_client` - Cumulative megabytes
//! - `iwstat_{rx,tx}_packet_retry_rate_of_connected_client` - Packet retry rate
//! - `iwstat_{rx,tx}_vht_mcs_index_of_connected_client` - VHT MCS index
//! - `iwstat_{rx,tx}_vht_mcs_mhz_of_connected_client` - VHT channel width
//! - `iwstat_{rx,tx}_vht_nss_of_connected_client` - VHT spatial streams
//! - `iwstat_{rx,tx}_packets_of_connected_client` - Cumulative packets
//! - `iwstat_expected_throughput_of_connected_client` - Expected throughput
//! - `iwstat_channel_utilization_of_connected_client` - Channel utilization
//!
//! Cumulative values are exported as gauges, unchanged.
//!
//! ## Exporter Metrics
//! - `iwstat_exporter_scrapes_total` - Scrapes attempted
//! - `iwstat_exporter_scrape_errors_total` - Scrapes whose snapshot failed
//!
//! # Example
//!
//! ```no_run
//! use iwstat_exporter::metrics::{MetricsRegistry, Publisher};
//! use iwstat_exporter::snapshot::SnapshotSource;
//!
//! let source = SnapshotSource::File("/tmp/iwstat".into());
//! let publisher = Publisher::new(source).expect("Failed to declare metrics");
//! let registry = MetricsRegistry::new("iwstat").expect("Failed to create registry");
//!
//! match registry.scrape(&publisher) {
//!     Ok(text) => print!("{}", text),
//!     Err(e) => eprintln!("scrape failed: {}", e),
//! }
//! ```

mod collector;
mod registry;
#[cfg(feature = "server")]
mod server;

pub use collector::{
    DeclaredMetric, LabelSchema, MetricsError, Observation, Publisher, DEFAULT_NAMESPACE,
};
pub use registry::{families, MetricsRegistry, ScrapeError};
#[cfg(feature = "server")]
pub use server::{MetricsServer, MetricsServerConfig, MetricsState, ServerError};
