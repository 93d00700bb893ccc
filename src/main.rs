use anyhow::{anyhow, Context, Result};
use axum::{http::StatusCode, routing::get, Router};
use http::Request;
use httpclient_metrics::config::MetricsSettings;
use httpclient_metrics::{
    HttpClientExporterOptions, HttpClientMetricsLayer, ParameterMapping, ReqwestTransport,
};
use prometheus::{Registry, TextEncoder};
use serde::Deserialize;
use std::time::Duration;
use tower::{Service, ServiceBuilder, ServiceExt};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

fn default_listen() -> String {
    "0.0.0.0:9464".to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct AppConfig {
    /// URL polled through the instrumented client
    target: Url,
    /// Bind address of the /metrics endpoint
    #[serde(default = "default_listen")]
    listen: String,
    /// Poll interval in seconds
    interval_secs: Option<u64>,
    /// `METRICS__*` overrides; everything enabled when absent
    metrics: Option<MetricsSettings>,
}

impl AppConfig {
    fn load() -> Result<Self> {
        Self::from_env(config::Environment::default())
    }

    fn from_env(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(
                env.separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("metrics.request_duration.buckets"),
            )
            .build()?;
        Ok(cfg.try_deserialize()?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().context("initialize tracing subscriber")?;

    if let Err(err) = run().await {
        tracing::error!(error = ?err, "fatal demo error");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = AppConfig::load().context("load configuration from environment")?;
    let settings = config.metrics.clone().unwrap_or_default();

    let registry = Registry::new();
    let mut options = HttpClientExporterOptions::from_settings(&settings)
        .context("build exporter options")?
        .with_registry(registry.clone());
    // First path segment, e.g. "v1" for /v1/items
    options.add_route_parameter(
        ParameterMapping::new("path_prefix", |req, _| {
            req.uri
                .path()
                .split('/')
                .find(|segment| !segment.is_empty())
                .map(str::to_owned)
        })
        .context("define path_prefix parameter")?,
    );

    let layer = HttpClientMetricsLayer::new(options).context("initialize httpclient metrics")?;
    let mut client = ServiceBuilder::new()
        .layer(layer)
        .service(ReqwestTransport::new(reqwest::Client::new()));

    let listen = config.listen.clone();
    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("bind metrics endpoint {listen}"))?;
    let app = metrics_router(registry);
    info!(address = %listen, "metrics endpoint starting");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warn!(error = %e, "metrics endpoint error");
        }
    });

    let mut ticker = tokio::time::interval(Duration::from_secs(config.interval_secs.unwrap_or(15)));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let request = Request::get(config.target.as_str())
                    .body(String::new())
                    .context("build request")?;
                match ServiceExt::<Request<String>>::ready(&mut client).await {
                    Ok(svc) => match svc.call(request).await {
                        Ok(resp) => info!(url = %config.target, status = %resp.status(), bytes = resp.body().len(), "poll completed"),
                        Err(err) => warn!(url = %config.target, error = %err, "poll failed"),
                    },
                    Err(err) => warn!(error = %err, "client not ready"),
                }
            }
            res = tokio::signal::ctrl_c() => {
                if let Err(err) = res {
                    warn!(error = %err, "ctrl_c listener error");
                }
                info!("Shutdown signal received, exiting");
                break;
            }
        }
    }
    Ok(())
}

fn metrics_router(registry: Registry) -> Router {
    Router::new()
        .route(
            "/metrics",
            get(move || {
                let registry = registry.clone();
                async move {
                    TextEncoder::new()
                        .encode_to_string(&registry.gather())
                        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
                }
            }),
        )
        .layer(TraceLayer::new_for_http())
}

fn init_tracing() -> Result<()> {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,hyper=warn,reqwest=warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("tracing subscriber init: {err}"))
}
