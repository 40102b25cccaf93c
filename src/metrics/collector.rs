//! Metric definitions and per-scrape collection.

use crate::snapshot::{ClientStat, Field, SnapshotError, SnapshotProvider};
use prometheus::core::Desc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Default metric namespace.
pub const DEFAULT_NAMESPACE: &str = "iwstat";

/// Metric name suffix and help text for every exported field.
const METRIC_TABLE: [(Field, &str, &str); Field::COUNT] = [
    (Field::Rssi, "rssi", "RSSI of connected client in dBm."),
    (Field::Snr, "snr", "SNR of connected client in dB."),
    (Field::Inactive, "inactive_seconds", "Seconds since last activity of connected client."),
    (Field::RxPhy, "rx_phy_rate", "Receive PHY rate of connected client."),
    (Field::RxMbytes, "rx_megabytes", "Megabytes received from connected client."),
    (Field::RxPrr, "rx_packet_retry_rate", "Receive packet retry rate of connected client."),
    (Field::RxVhtMcsIndex, "rx_vht_mcs_index", "Receive VHT MCS index of connected client."),
    (Field::RxVhtMcsMhz, "rx_vht_mcs_mhz", "Receive VHT channel width in MHz of connected client."),
    (Field::RxVhtNss, "rx_vht_nss", "Receive VHT spatial streams of connected client."),
    (Field::RxPackets, "rx_packets", "Packets received from connected client."),
    (Field::TxPhy, "tx_phy_rate", "Transmit PHY rate of connected client."),
    (Field::TxMbytes, "tx_megabytes", "Megabytes transmitted to connected client."),
    (Field::TxPrr, "tx_packet_retry_rate", "Transmit packet retry rate of connected client."),
    (Field::TxVhtMcsIndex, "tx_vht_mcs_index", "Transmit VHT MCS index of connected client."),
    (Field::TxVhtMcsMhz, "tx_vht_mcs_mhz", "Transmit VHT channel width in MHz of connected client."),
    (Field::TxVhtNss, "tx_vht_nss", "Transmit VHT spatial streams of connected client."),
    (Field::TxPackets, "tx_packets", "Packets transmitted to connected client."),
    (Field::ExpectedThroughput, "expected_throughput", "Expected throughput of connected client."),
    (Field::ChannelUtilization, "channel_utilization", "Channel utilization percentage seen by connected client."),
];

/// Label dimensions attached to every client metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelSchema {
    /// `interfaceName` and `clientID`.
    #[default]
    InterfaceAndClient,
    /// `clientID` only.
    ClientOnly,
}

impl LabelSchema {
    /// Label names in the order label values are produced.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            LabelSchema::InterfaceAndClient => &["interfaceName", "clientID"],
            LabelSchema::ClientOnly => &["clientID"],
        }
    }

    fn values(self, stat: &ClientStat) -> Vec<String> {
        match self {
            LabelSchema::InterfaceAndClient => vec![stat.interface.clone(), stat.client.clone()],
            LabelSchema::ClientOnly => vec![stat.client.clone()],
        }
    }
}

/// A metric the publisher may emit: name, help text and label schema.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredMetric {
    name: String,
    help: String,
    labels: LabelSchema,
    field: Field,
}

impl DeclaredMetric {
    /// Fully qualified metric name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help text.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Label names, in label value order.
    pub fn label_names(&self) -> &'static [&'static str] {
        self.labels.names()
    }

    /// Snapshot field this metric reports.
    pub fn field(&self) -> Field {
        self.field
    }

    /// Builds the equivalent Prometheus descriptor, validating the name
    /// and label names.
    pub fn desc(&self) -> Result<Desc, MetricsError> {
        Ok(Desc::new(
            self.name.clone(),
            self.help.clone(),
            self.labels.names().iter().map(|l| l.to_string()).collect(),
            HashMap::new(),
        )?)
    }
}

impl fmt::Display for DeclaredMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}}}", self.name, self.labels.names().join(","))
    }
}

/// One output of a collection cycle.
#[derive(Debug, Clone)]
pub enum Observation<'a> {
    /// A sample for one client.
    Value {
        metric: &'a DeclaredMetric,
        labels: Vec<String>,
        value: f64,
    },
    /// The snapshot could not be taken; the metric has no value this cycle.
    Unavailable {
        metric: &'a DeclaredMetric,
        error: Arc<SnapshotError>,
    },
}

impl<'a> Observation<'a> {
    /// Metric this observation belongs to.
    pub fn metric(&self) -> &'a DeclaredMetric {
        match self {
            Observation::Value { metric, .. } | Observation::Unavailable { metric, .. } => *metric,
        }
    }
}

/// Maps snapshot records onto labeled gauge samples.
///
/// The declared metrics are fixed at construction. Each call to
/// [`Publisher::collect`] takes its own snapshot and keeps nothing
/// afterwards, so concurrent scrapes do not interfere.
pub struct Publisher {
    metrics: Vec<DeclaredMetric>,
    labels: LabelSchema,
    source: Box<dyn SnapshotProvider>,
}

impl Publisher {
    /// Creates a publisher with the default namespace and both labels.
    pub fn new(source: impl SnapshotProvider + 'static) -> Result<Self, MetricsError> {
        Self::with_options(source, DEFAULT_NAMESPACE, LabelSchema::default())
    }

    /// Creates a publisher with a custom namespace and label schema.
    pub fn with_options(
        source: impl SnapshotProvider + 'static,
        namespace: &str,
        labels: LabelSchema,
    ) -> Result<Self, MetricsError> {
        let metrics = METRIC_TABLE
            .iter()
            .map(|(field, suffix, help)| DeclaredMetric {
                name: format!("{}_{}_of_connected_client", namespace, suffix),
                help: help.to_string(),
                labels,
                field: *field,
            })
            .collect::<Vec<_>>();

        for metric in &metrics {
            metric.desc()?;
        }

        Ok(Self {
            metrics,
            labels,
            source: Box::new(source),
        })
    }

    /// Every metric this publisher can emit, whether or not a snapshot
    /// is currently available.
    pub fn describe(&self) -> &[DeclaredMetric] {
        &self.metrics
    }

    /// Label schema shared by all declared metrics.
    pub fn labels(&self) -> LabelSchema {
        self.labels
    }

    /// Takes a snapshot and produces one observation per (client, metric)
    /// pair, or one [`Observation::Unavailable`] per metric when the
    /// snapshot fails.
    pub fn collect(&self) -> Vec<Observation<'_>> {
        let stats = match self.source.snapshot() {
            Ok(stats) => stats,
            Err(e) => {
                let error = Arc::new(e);
                return self
                    .metrics
                    .iter()
                    .map(|metric| Observation::Unavailable {
                        metric,
                        error: Arc::clone(&error),
                    })
                    .collect();
            }
        };

        let mut observations = Vec::with_capacity(stats.len() * self.metrics.len());
        for stat in &stats {
            let labels = self.labels.values(stat);
            for metric in &self.metrics {
                observations.push(Observation::Value {
                    metric,
                    labels: labels.clone(),
                    value: stat.get(metric.field) as f64,
                });
            }
        }

        observations
    }
}

impl fmt::Debug for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("metrics", &self.metrics.len())
            .field("labels", &self.labels)
            .finish()
    }
}
