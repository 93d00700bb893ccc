// Tower middleware recording HttpClient metrics
// Wraps an inner HTTP service and records in-progress, count and duration
// metrics for every request it forwards
//
// Numan Thabit 2025 Nov

use crate::collector::{LabelledCollector, MetricFactory};
use crate::errors::{ConfigError, ResolveError};
use crate::instrumentation::HttpClientInstrumentation;
use crate::mapping::RequestView;
use crate::metrics::{InProgressMetric, RequestCountMetric, RequestDurationMetric};
use crate::options::{HttpClientExporterOptions, HttpClientMetricsOptions};
use crate::validation::validate_additional_parameters;
use futures::future::BoxFuture;
use http::Request;
use prometheus::core::Collector;
use prometheus::{Counter, CounterVec, Gauge, GaugeVec, Histogram, HistogramVec, Registry};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{BoxError, Layer, Service};
use tracing::warn;

struct Instruments {
    in_progress: Option<HttpClientInstrumentation<GaugeVec>>,
    request_count: Option<HttpClientInstrumentation<CounterVec>>,
    request_duration: Option<HttpClientInstrumentation<HistogramVec>>,
}

struct Children {
    in_progress: Option<Gauge>,
    request_count: Option<Counter>,
    request_duration: Option<Histogram>,
}

impl Instruments {
    fn children(&self, request: &RequestView<'_>) -> Result<Children, ResolveError> {
        Ok(Children {
            in_progress: self
                .in_progress
                .as_ref()
                .map(|i| i.create_child(request))
                .transpose()?,
            request_count: self
                .request_count
                .as_ref()
                .map(|i| i.create_child(request))
                .transpose()?,
            request_duration: self
                .request_duration
                .as_ref()
                .map(|i| i.create_child(request))
                .transpose()?,
        })
    }
}

#[derive(Clone)]
pub struct HttpClientMetricsLayer {
    instruments: Arc<Instruments>,
}

impl HttpClientMetricsLayer {
    /// Builds the instrumentation of every enabled metric group; disabled
    /// groups are not validated.
    ///
    /// All enabled parameter sets are validated before any metric is
    /// created, and default metrics registered by earlier groups are
    /// unregistered again when a later group fails.
    pub fn new(options: HttpClientExporterOptions) -> Result<Self, ConfigError> {
        let HttpClientExporterOptions {
            in_progress,
            request_count,
            request_duration,
        } = options;

        for common in [&in_progress.common, &request_count.common, &request_duration.common] {
            if common.enabled {
                validate_additional_parameters(&common.additional_parameters)?;
            }
        }

        let mut registrations = Registrations::default();
        let in_progress = build_group(
            &in_progress.common,
            &InProgressMetric,
            in_progress.gauge,
            &mut registrations,
        )?;
        let request_count = build_group(
            &request_count.common,
            &RequestCountMetric,
            request_count.counter,
            &mut registrations,
        )?;
        let request_duration = build_group(
            &request_duration.common,
            &RequestDurationMetric {
                buckets: request_duration.buckets,
            },
            request_duration.histogram,
            &mut registrations,
        )?;
        registrations.commit();

        Ok(Self {
            instruments: Arc::new(Instruments {
                in_progress,
                request_count,
                request_duration,
            }),
        })
    }

    #[cfg(test)]
    fn from_instruments(instruments: Instruments) -> Self {
        Self {
            instruments: Arc::new(instruments),
        }
    }
}

fn build_group<C, F>(
    common: &HttpClientMetricsOptions,
    factory: &F,
    custom_metric: Option<C>,
    registrations: &mut Registrations,
) -> Result<Option<HttpClientInstrumentation<C>>, ConfigError>
where
    C: LabelledCollector + Collector,
    F: MetricFactory<Collector = C>,
{
    if !common.enabled {
        return Ok(None);
    }
    let created_here = custom_metric.is_none();
    let instrumentation = HttpClientInstrumentation::new(common, factory, custom_metric)?;
    if created_here {
        registrations.track(common.registry(), instrumentation.metric().clone());
    }
    Ok(Some(instrumentation))
}

/// Default metrics registered while a layer is being built. Dropped before
/// `commit`, it unregisters all of them.
#[derive(Default)]
struct Registrations {
    created: Vec<(Registry, Box<dyn Collector>)>,
}

impl Registrations {
    fn track(&mut self, registry: Registry, metric: impl Collector + 'static) {
        self.created.push((registry, Box::new(metric)));
    }

    fn commit(mut self) {
        self.created.clear();
    }
}

impl Drop for Registrations {
    fn drop(&mut self) {
        for (registry, metric) in self.created.drain(..) {
            if let Err(err) = registry.unregister(metric) {
                warn!(error = %err, "failed to unregister metric after construction error");
            }
        }
    }
}

impl<S> Layer<S> for HttpClientMetricsLayer {
    type Service = HttpClientMetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HttpClientMetricsService {
            inner,
            instruments: self.instruments.clone(),
        }
    }
}

#[derive(Clone)]
pub struct HttpClientMetricsService<S> {
    inner: S,
    instruments: Arc<Instruments>,
}

/// Decrements the in-progress gauge when the request finishes or is dropped.
struct InProgressGuard(Gauge);

impl InProgressGuard {
    fn track(gauge: Gauge) -> Self {
        gauge.inc();
        Self(gauge)
    }
}

impl Drop for InProgressGuard {
    fn drop(&mut self) {
        self.0.dec();
    }
}

impl<S, B> Service<Request<B>> for HttpClientMetricsService<S>
where
    S: Service<Request<B>>,
    S::Error: Into<BoxError>,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
{
    type Response = S::Response;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        // Children are resolved up front; a fault means the request is not sent.
        let children = match self.instruments.children(&RequestView::from(&request)) {
            Ok(children) => children,
            Err(err) => {
                warn!(
                    method = %request.method(),
                    uri = %request.uri(),
                    error = %err,
                    "dropping request: metric labels could not be resolved"
                );
                return Box::pin(async move { Err(err.into()) });
            }
        };
        let Children {
            in_progress,
            request_count,
            request_duration,
        } = children;

        let guard = in_progress.map(InProgressGuard::track);
        let started = Instant::now();
        let fut = self.inner.call(request);

        Box::pin(async move {
            let result = fut.await;
            if let Some(histogram) = request_duration {
                histogram.observe(started.elapsed().as_secs_f64());
            }
            if result.is_ok() {
                if let Some(counter) = request_count {
                    counter.inc();
                }
            }
            drop(guard);
            result.map_err(Into::into)
        })
    }
}
