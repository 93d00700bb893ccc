// HttpClient metric instrumentation
// Owns one metric instance together with its validated parameter set and
// label index, and picks the measurement child for each outgoing request
//
// Numan Thabit 2025 Nov

use crate::collector::{LabelledCollector, MetricFactory};
use crate::errors::{ConfigError, ResolveError};
use crate::index::LabelIndex;
use crate::labels::{default_label_names, BUILT_IN};
use crate::mapping::{ParameterMapping, RequestView};
use crate::options::HttpClientMetricsOptions;
use crate::resolver::resolve_label_values;
use crate::validation::validate_additional_parameters;
use std::borrow::Cow;
use tracing::debug;

pub struct HttpClientInstrumentation<C: LabelledCollector> {
    metric: C,
    label_names: Vec<String>,
    parameters: Vec<ParameterMapping>,
    index: LabelIndex,
}

impl<C: LabelledCollector> HttpClientInstrumentation<C> {
    /// Validates the additional parameters, builds the label index and then
    /// either adopts `custom_metric` or creates the default metric through
    /// `factory` with the built-in plus additional labels.
    pub fn new<F>(
        options: &HttpClientMetricsOptions,
        factory: &F,
        custom_metric: Option<C>,
    ) -> Result<Self, ConfigError>
    where
        F: MetricFactory<Collector = C>,
    {
        let parameters = options.additional_parameters.clone();
        validate_additional_parameters(&parameters)?;
        let index = LabelIndex::build(&parameters);

        let metric = match custom_metric {
            Some(metric) => metric,
            None => {
                let labels = default_label_names(parameters.iter().map(ParameterMapping::label_name));
                factory.create(&options.registry(), &labels)?
            }
        };

        let label_names = metric.label_names();
        if let Some(label) = label_names
            .iter()
            .find(|label| !BUILT_IN.contains(&label.as_str()) && !index.contains(label))
        {
            return Err(ConfigError::UnmappedLabel {
                label: label.clone(),
            });
        }

        debug!(
            metric = %metric.name(),
            labels = ?label_names,
            additional_parameters = parameters.len(),
            "httpclient metric instrumentation ready"
        );

        Ok(Self {
            metric,
            label_names,
            parameters,
            index,
        })
    }

    /// Skips validation and the coverage check so resolution faults can be
    /// exercised.
    #[cfg(test)]
    pub(crate) fn from_parts(metric: C, parameters: Vec<ParameterMapping>) -> Self {
        let label_names = metric.label_names();
        let index = LabelIndex::build(&parameters);
        Self {
            metric,
            label_names,
            parameters,
            index,
        }
    }

    pub fn metric(&self) -> &C {
        &self.metric
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    /// Label values this instrumentation would record for `request`.
    pub fn label_values<'r>(
        &self,
        request: &RequestView<'r>,
    ) -> Result<Vec<Cow<'r, str>>, ResolveError> {
        resolve_label_values(&self.label_names, &self.index, &self.parameters, request)
    }

    /// Measurement child to record against for `request`.
    ///
    /// A metric without labels short-circuits to its unlabelled child and
    /// runs no extractor. Faults are returned unlogged; the pipeline reports
    /// them once.
    pub fn create_child(&self, request: &RequestView<'_>) -> Result<C::Child, ResolveError> {
        if self.label_names.is_empty() {
            return Ok(self.metric.unlabelled()?);
        }

        let values = self.label_values(request)?;
        let values: Vec<&str> = values.iter().map(|v| &**v).collect();
        Ok(self.metric.with_labels(&values)?)
    }
}
