// Collector abstraction over prometheus metric vectors
// Lets instrumentation work with counters, gauges and histograms alike and
// lets each metric kind supply its own default instance
//
// Numan Thabit 2025 Nov

use prometheus::core::Collector;
use prometheus::{Counter, CounterVec, Gauge, GaugeVec, Histogram, HistogramVec, Registry};

/// A labelled metric family whose children record observations.
pub trait LabelledCollector: Clone + Send + Sync + 'static {
    type Child: Clone + Send + Sync + 'static;

    /// Fully qualified metric name.
    fn name(&self) -> String;

    /// Declared label names, in order.
    fn label_names(&self) -> Vec<String>;

    /// Child of a metric declared without labels.
    fn unlabelled(&self) -> prometheus::Result<Self::Child> {
        self.with_labels(&[])
    }

    fn with_labels(&self, values: &[&str]) -> prometheus::Result<Self::Child>;
}

/// Creates the default metric instance for a set of label names.
pub trait MetricFactory {
    type Collector: LabelledCollector;

    fn create(&self, registry: &Registry, label_names: &[&str])
        -> prometheus::Result<Self::Collector>;
}

macro_rules! impl_labelled_collector {
    ($vec:ty, $child:ty) => {
        impl LabelledCollector for $vec {
            type Child = $child;

            fn name(&self) -> String {
                self.desc()
                    .first()
                    .map(|desc| desc.fq_name.clone())
                    .unwrap_or_default()
            }

            fn label_names(&self) -> Vec<String> {
                self.desc()
                    .first()
                    .map(|desc| desc.variable_labels.clone())
                    .unwrap_or_default()
            }

            fn with_labels(&self, values: &[&str]) -> prometheus::Result<Self::Child> {
                self.get_metric_with_label_values(values)
            }
        }
    };
}

impl_labelled_collector!(CounterVec, Counter);
impl_labelled_collector!(GaugeVec, Gauge);
impl_labelled_collector!(HistogramVec, Histogram);
