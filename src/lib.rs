// Library root module for httpclient-metrics
// This file defines the public API and module structure for the library
// that attaches method, host and caller-defined labels to HttpClient metrics
//
// Numan Thabit 2025 Nov

pub mod collector;
pub mod config;
pub mod errors;
pub mod index;
pub mod instrumentation;
pub mod labels;
pub mod layer;
pub mod mapping;
pub mod metrics;
pub mod options;
pub mod resolver;
pub mod transport;
pub mod validation;

pub use collector::{LabelledCollector, MetricFactory};
pub use errors::{ConfigError, ResolveError};
pub use instrumentation::HttpClientInstrumentation;
pub use layer::{HttpClientMetricsLayer, HttpClientMetricsService};
pub use mapping::{ParameterMapping, RequestView};
pub use options::{
    HttpClientExporterOptions, HttpClientMetricsOptions, InProgressOptions, RequestCountOptions,
    RequestDurationOptions,
};
pub use transport::ReqwestTransport;
