// Parameter mappings for additional HttpClient metric labels
// A mapping ties a caller-defined request parameter to the metric label it
// populates and carries the function that extracts its value from a request
//
// Numan Thabit 2025 Nov

use crate::errors::ConfigError;
use crate::labels::validate_label_name;
use http::{header, Extensions, HeaderMap, Method, Request, Uri};
use std::fmt;
use std::sync::Arc;

/// Borrowed view of an outgoing request, as seen by label extractors.
#[derive(Clone, Copy)]
pub struct RequestView<'a> {
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
    pub extensions: &'a Extensions,
}

impl<'a> RequestView<'a> {
    pub fn method(&self) -> &'a str {
        self.method.as_str()
    }

    /// Host of the request target. Falls back to the `Host` header (port
    /// stripped) for origin-form URIs; empty when neither is present.
    pub fn host(&self) -> &'a str {
        if let Some(host) = self.uri.host() {
            return host;
        }
        self.headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(strip_port)
            .unwrap_or_default()
    }
}

impl<'a, B> From<&'a Request<B>> for RequestView<'a> {
    fn from(request: &'a Request<B>) -> Self {
        Self {
            method: request.method(),
            uri: request.uri(),
            headers: request.headers(),
            extensions: request.extensions(),
        }
    }
}

fn strip_port(authority: &str) -> &str {
    // Bracketed IPv6 literal, e.g. [::1]:8080
    if let Some(rest) = authority.strip_prefix('[') {
        return match rest.find(']') {
            Some(end) => &authority[..end + 2],
            None => authority,
        };
    }
    match authority.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => authority,
    }
}

/// Extracts a label value for `parameter_name` from a request. `None` is
/// recorded as the empty string.
pub type LabelValueFn = dyn Fn(&RequestView<'_>, &str) -> Option<String> + Send + Sync;

/// Maps an HttpClient request parameter to a Prometheus label.
///
/// Parameter and label name are usually equal; a distinct label name lets a
/// parameter be tracked even when its name collides with a built-in label.
#[derive(Clone)]
pub struct ParameterMapping {
    parameter_name: String,
    label_name: String,
    extractor: Arc<LabelValueFn>,
}

impl ParameterMapping {
    /// Mapping whose label carries the same name as the parameter.
    pub fn new<F>(name: impl Into<String>, extractor: F) -> Result<Self, ConfigError>
    where
        F: Fn(&RequestView<'_>, &str) -> Option<String> + Send + Sync + 'static,
    {
        let name = name.into();
        Self::with_label(name.clone(), name, extractor)
    }

    pub fn with_label<F>(
        parameter_name: impl Into<String>,
        label_name: impl Into<String>,
        extractor: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&RequestView<'_>, &str) -> Option<String> + Send + Sync + 'static,
    {
        let label_name = label_name.into();
        validate_label_name(&label_name)?;
        Ok(Self {
            parameter_name: parameter_name.into(),
            label_name,
            extractor: Arc::new(extractor),
        })
    }

    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    pub fn label_name(&self) -> &str {
        &self.label_name
    }

    /// Runs the extractor for this mapping's parameter.
    pub fn extract(&self, request: &RequestView<'_>) -> Option<String> {
        (self.extractor)(request, &self.parameter_name)
    }
}

impl fmt::Debug for ParameterMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterMapping")
            .field("parameter_name", &self.parameter_name)
            .field("label_name", &self.label_name)
            .finish_non_exhaustive()
    }
}
