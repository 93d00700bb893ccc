// Error types for metrics configuration and label resolution
// Configuration errors are fatal and raised while building instrumentation;
// resolution errors signal a broken internal invariant on the request path
//
// Numan Thabit 2025 Nov

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid label name {name:?}: {reason}")]
    InvalidLabelName { name: String, reason: &'static str },
    #[error(
        "the set of additional HttpClient parameters to track contains multiple entries with the same parameter name: {}",
        .names.join(", ")
    )]
    DuplicateParameterName { names: Vec<String> },
    #[error(
        "the set of additional HttpClient parameters to track contains multiple entries with the same label name: {}",
        .names.join(", ")
    )]
    DuplicateLabelName { names: Vec<String> },
    #[error(
        "the set of additional HttpClient parameters to track contains an entry with a reserved label name ({}). Reserved label names are: {}",
        .names.join(", "),
        .reserved.join(", ")
    )]
    ReservedLabelName {
        names: Vec<String>,
        reserved: Vec<&'static str>,
    },
    #[error(
        "the set of additional HttpClient parameters to track contains an entry with a reserved HttpClient parameter name ({}). Reserved HttpClient parameter names are: {}",
        .names.join(", "),
        .reserved.join(", ")
    )]
    ReservedParameterName {
        names: Vec<String>,
        reserved: Vec<&'static str>,
    },
    #[error("metric declares label {label:?} which is neither built-in nor mapped to an additional parameter")]
    UnmappedLabel { label: String },
    #[error("invalid histogram buckets: {0}")]
    InvalidBuckets(String),
    #[error("metric error: {0}")]
    Metric(#[from] prometheus::Error),
    #[error("settings error: {0}")]
    Settings(#[from] config::ConfigError),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("label {label:?} is not present in the label index")]
    UnknownLabel { label: String },
    #[error("no parameter mapping for parameter {parameter:?} (label {label:?})")]
    MissingMapping { label: String, parameter: String },
    #[error("parameter {parameter:?} is mapped {count} times")]
    AmbiguousMapping { parameter: String, count: usize },
    #[error("metric rejected label values: {0}")]
    Metric(#[from] prometheus::Error),
}
