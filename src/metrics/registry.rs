//! Prometheus exposition of collected observations.

use super::collector::{MetricsError, Observation, Publisher};
use crate::snapshot::SnapshotError;
use prometheus::proto::{Gauge, LabelPair, Metric, MetricFamily, MetricType};
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that fail a scrape.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("{} metrics unavailable: {error}", metrics.len())]
    Unavailable {
        /// Names of every declared metric that has no value this cycle.
        metrics: Vec<String>,
        error: Arc<SnapshotError>,
    },

    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

/// Prometheus registry holding the exporter's own metrics.
///
/// Client metrics are not registered here: they are rebuilt from a fresh
/// snapshot on every scrape and merged into the output.
pub struct MetricsRegistry {
    registry: Registry,
    scrapes_total: IntCounter,
    scrape_errors_total: IntCounter,
}

impl MetricsRegistry {
    /// Creates a registry backed by a new Prometheus registry.
    pub fn new(namespace: &str) -> Result<Self, MetricsError> {
        Self::with_registry(Registry::new(), namespace)
    }

    /// Registers the exporter metrics into an existing registry.
    pub fn with_registry(registry: Registry, namespace: &str) -> Result<Self, MetricsError> {
        let scrapes_total = IntCounter::new(
            format!("{}_exporter_scrapes_total", namespace),
            "Total number of snapshot scrapes attempted",
        )?;
        let scrape_errors_total = IntCounter::new(
            format!("{}_exporter_scrape_errors_total", namespace),
            "Total number of scrapes that failed to take a snapshot",
        )?;

        registry.register(Box::new(scrapes_total.clone()))?;
        registry.register(Box::new(scrape_errors_total.clone()))?;

        Ok(Self {
            registry,
            scrapes_total,
            scrape_errors_total,
        })
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Collects from the publisher and encodes the result together with
    /// the registry's own metrics.
    pub fn scrape(&self, publisher: &Publisher) -> Result<String, ScrapeError> {
        self.scrapes_total.inc();
        let observations = publisher.collect();

        let mut unavailable = Vec::new();
        let mut cause = None;
        for obs in &observations {
            if let Observation::Unavailable { metric, error } = obs {
                unavailable.push(metric.name().to_string());
                cause.get_or_insert_with(|| Arc::clone(error));
            }
        }

        if let Some(error) = cause {
            self.scrape_errors_total.inc();
            tracing::warn!(
                error = %error,
                metrics = unavailable.len(),
                "Snapshot unavailable"
            );
            return Err(ScrapeError::Unavailable {
                metrics: unavailable,
                error,
            });
        }

        tracing::debug!(
            observations = observations.len(),
            clients = observations.len() / publisher.describe().len().max(1),
            "Scrape complete"
        );

        Ok(self.encode(&observations)?)
    }

    /// Encodes observations and the registry's own metrics in Prometheus
    /// text format. Unavailable observations are skipped.
    pub fn encode(&self, observations: &[Observation<'_>]) -> Result<String, MetricsError> {
        let mut metric_families = self.registry.gather();
        metric_families.extend(families(observations));
        metric_families.sort_by(|a, b| a.get_name().cmp(b.get_name()));

        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Groups value observations into one gauge family per metric.
///
/// Metrics without any value are omitted.
pub fn families(observations: &[Observation<'_>]) -> Vec<MetricFamily> {
    let mut by_name: BTreeMap<&str, MetricFamily> = BTreeMap::new();

    for obs in observations {
        let Observation::Value {
            metric,
            labels,
            value,
        } = obs
        else {
            continue;
        };

        let family = by_name.entry(metric.name()).or_insert_with(|| {
            let mut mf = MetricFamily::default();
            mf.set_name(metric.name().to_string());
            mf.set_help(metric.help().to_string());
            mf.set_field_type(MetricType::GAUGE);
            mf
        });

        let mut m = Metric::default();
        for (name, value) in metric.label_names().iter().zip(labels) {
            let mut pair = LabelPair::default();
            pair.set_name(name.to_string());
            pair.set_value(value.clone());
            m.mut_label().push(pair);
        }
        let mut gauge = Gauge::default();
        gauge.set_value(*value);
        m.set_gauge(gauge);

        family.mut_metric().push(m);
    }

    by_name.into_values().collect()
}
