// Options for HttpClient metrics
// Each metric group carries the common options plus an optional custom
// metric instance that replaces the default one
//
// Numan Thabit 2025 Nov

use crate::mapping::ParameterMapping;
use crate::metrics::default_duration_buckets;
use prometheus::{CounterVec, GaugeVec, HistogramVec, Registry};

#[derive(Clone)]
pub struct HttpClientMetricsOptions {
    pub enabled: bool,
    /// Additional request parameters to track beyond `method` and `host`,
    /// e.g. an API version. Default metrics get a label per entry; a custom
    /// metric must declare those labels itself.
    pub additional_parameters: Vec<ParameterMapping>,
    /// Registry for the default metric instance; `None` uses the process-wide
    /// default registry.
    pub registry: Option<Registry>,
}

impl Default for HttpClientMetricsOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            additional_parameters: Vec::new(),
            registry: None,
        }
    }
}

impl HttpClientMetricsOptions {
    pub fn registry(&self) -> Registry {
        self.registry
            .clone()
            .unwrap_or_else(|| prometheus::default_registry().clone())
    }
}

#[derive(Clone, Default)]
pub struct InProgressOptions {
    pub common: HttpClientMetricsOptions,
    pub gauge: Option<GaugeVec>,
}

#[derive(Clone, Default)]
pub struct RequestCountOptions {
    pub common: HttpClientMetricsOptions,
    pub counter: Option<CounterVec>,
}

#[derive(Clone)]
pub struct RequestDurationOptions {
    pub common: HttpClientMetricsOptions,
    pub histogram: Option<HistogramVec>,
    /// Buckets of the default histogram; ignored with a custom histogram.
    pub buckets: Vec<f64>,
}

impl Default for RequestDurationOptions {
    fn default() -> Self {
        Self {
            common: HttpClientMetricsOptions::default(),
            histogram: None,
            buckets: default_duration_buckets(),
        }
    }
}

/// Options for the whole HttpClient metrics layer.
#[derive(Clone, Default)]
pub struct HttpClientExporterOptions {
    pub in_progress: InProgressOptions,
    pub request_count: RequestCountOptions,
    pub request_duration: RequestDurationOptions,
}

impl HttpClientExporterOptions {
    /// Adds an additional route parameter to all the HttpClient metrics.
    pub fn add_route_parameter(&mut self, mapping: ParameterMapping) -> &mut Self {
        self.in_progress
            .common
            .additional_parameters
            .push(mapping.clone());
        self.request_count
            .common
            .additional_parameters
            .push(mapping.clone());
        self.request_duration
            .common
            .additional_parameters
            .push(mapping);
        self
    }

    /// Creates every default metric on `registry`.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.in_progress.common.registry = Some(registry.clone());
        self.request_count.common.registry = Some(registry.clone());
        self.request_duration.common.registry = Some(registry);
        self
    }
}
