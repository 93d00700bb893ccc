// Default HttpClient metrics
// This file defines the metric families recorded around outgoing requests
// and how their default instances are created on a registry
//
// Numan Thabit 2025 Nov

use crate::collector::MetricFactory;
use prometheus::{CounterVec, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry};

pub const IN_PROGRESS_NAME: &str = "httpclient_requests_in_progress";
pub const IN_PROGRESS_HELP: &str = "Number of requests currently being executed by an HttpClient.";

pub const REQUEST_COUNT_NAME: &str = "httpclient_requests_sent_total";
pub const REQUEST_COUNT_HELP: &str =
    "Count of HTTP requests that have been completed by an HttpClient.";

pub const REQUEST_DURATION_NAME: &str = "httpclient_request_duration_seconds";
pub const REQUEST_DURATION_HELP: &str =
    "Duration histogram of HTTP requests performed by an HttpClient.";

/// 1ms up to ~32s in powers of two.
pub fn default_duration_buckets() -> Vec<f64> {
    (0..16).map(|i| 0.001 * f64::from(1u32 << i)).collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InProgressMetric;

impl MetricFactory for InProgressMetric {
    type Collector = GaugeVec;

    fn create(&self, registry: &Registry, label_names: &[&str]) -> prometheus::Result<GaugeVec> {
        let gauge = GaugeVec::new(Opts::new(IN_PROGRESS_NAME, IN_PROGRESS_HELP), label_names)?;
        registry.register(Box::new(gauge.clone()))?;
        Ok(gauge)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestCountMetric;

impl MetricFactory for RequestCountMetric {
    type Collector = CounterVec;

    fn create(&self, registry: &Registry, label_names: &[&str]) -> prometheus::Result<CounterVec> {
        let counter =
            CounterVec::new(Opts::new(REQUEST_COUNT_NAME, REQUEST_COUNT_HELP), label_names)?;
        registry.register(Box::new(counter.clone()))?;
        Ok(counter)
    }
}

#[derive(Debug, Clone)]
pub struct RequestDurationMetric {
    pub buckets: Vec<f64>,
}

impl Default for RequestDurationMetric {
    fn default() -> Self {
        Self {
            buckets: default_duration_buckets(),
        }
    }
}

impl MetricFactory for RequestDurationMetric {
    type Collector = HistogramVec;

    fn create(&self, registry: &Registry, label_names: &[&str]) -> prometheus::Result<HistogramVec> {
        let opts = HistogramOpts::new(REQUEST_DURATION_NAME, REQUEST_DURATION_HELP)
            .buckets(self.buckets.clone());
        let histogram = HistogramVec::new(opts, label_names)?;
        registry.register(Box::new(histogram.clone()))?;
        Ok(histogram)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::LabelledCollector;

    #[test]
    fn default_buckets_are_exponential() {
        let buckets = default_duration_buckets();
        assert_eq!(buckets.len(), 16);
        assert_eq!(buckets[0], 0.001);
        assert_eq!(buckets[15], 0.001 * 32768.0);
        assert!(buckets.windows(2).all(|w| w[1] == w[0] * 2.0));
    }

    #[test]
    fn factories_register_on_the_given_registry() {
        let registry = Registry::new();
        let labels = ["method", "host"];
        let gauge = InProgressMetric.create(&registry, &labels).unwrap();
        let counter = RequestCountMetric.create(&registry, &labels).unwrap();
        let histogram = RequestDurationMetric::default()
            .create(&registry, &labels)
            .unwrap();

        assert_eq!(gauge.name(), IN_PROGRESS_NAME);
        assert_eq!(counter.label_names(), vec!["method", "host"]);
        histogram.with_labels(&["GET", "h"]).unwrap().observe(0.2);
        counter.with_labels(&["GET", "h"]).unwrap().inc();
        gauge.with_labels(&["GET", "h"]).unwrap().inc();

        let names: Vec<_> = registry
            .gather()
            .iter()
            .map(|mf| mf.get_name().to_string())
            .collect();
        assert!(names.contains(&REQUEST_DURATION_NAME.to_string()));
        assert!(names.contains(&REQUEST_COUNT_NAME.to_string()));
        assert!(names.contains(&IN_PROGRESS_NAME.to_string()));
    }

    #[test]
    fn registering_twice_fails() {
        let registry = Registry::new();
        RequestCountMetric.create(&registry, &["method"]).unwrap();
        assert!(RequestCountMetric.create(&registry, &["method"]).is_err());
    }
}
