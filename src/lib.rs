//! iwstat Exporter Library
//!
//! Republishes OpenWRT iwinfo associated-client statistics (RSSI, SNR,
//! PHY rates, retry rates, throughput) as Prometheus metrics.
//!
//! # Architecture
//!
//! ```text
//! snapshot source → parser → publisher → registry → /metrics
//! ```
//!
//! A snapshot is taken on every scrape: the source is read, parsed into
//! [`ClientStat`] records, and every record is mapped onto one gauge per
//! numeric column. Nothing is cached between scrapes.
//!
//! # Example
//!
//! ```
//! use iwstat_exporter::snapshot::scan;
//!
//! let snapshot = "ifname mac rssi snr ...\n\
//!     wlan0 aa:bb:cc:dd:ee:ff -42 30 5 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16\n";
//!
//! let stats = scan(snapshot.as_bytes()).unwrap();
//! assert_eq!(stats.len(), 1);
//! assert_eq!(stats[0].rssi, -42);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod snapshot;

// Re-export commonly used types at crate root
pub use config::FileConfig;
pub use metrics::{DeclaredMetric, LabelSchema, MetricsRegistry, Observation, Publisher};
pub use snapshot::{scan, ClientStat, Field, SnapshotError, SnapshotProvider, SnapshotSource};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
