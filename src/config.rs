// Configuration management module
// This file loads the HttpClient metrics settings from environment variables
// or YAML and turns them into exporter options
//
// Numan Thabit 2025 Nov

use crate::errors::ConfigError;
use crate::metrics::default_duration_buckets;
use crate::options::HttpClientExporterOptions;
use serde::Deserialize;

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricToggle {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl Default for MetricToggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DurationSettings {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Histogram bucket upper bounds in seconds; defaults to 1ms..~32s.
    pub buckets: Option<Vec<f64>>,
}

impl Default for DurationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            buckets: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsSettings {
    #[serde(default)]
    pub in_progress: MetricToggle,
    #[serde(default)]
    pub request_count: MetricToggle,
    #[serde(default)]
    pub request_duration: DurationSettings,
}

impl MetricsSettings {
    /// Load from `HTTPCLIENT_METRICS__*` environment variables, e.g.
    /// `HTTPCLIENT_METRICS__REQUEST_DURATION__ENABLED=false` or
    /// `HTTPCLIENT_METRICS__REQUEST_DURATION__BUCKETS=0.01,0.1,1`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env(config::Environment::with_prefix("HTTPCLIENT_METRICS"))
    }

    fn from_env(env: config::Environment) -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .add_source(
                env.prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("request_duration.buckets"),
            )
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Yaml))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn duration_buckets(&self) -> Result<Vec<f64>, ConfigError> {
        let Some(buckets) = &self.request_duration.buckets else {
            return Ok(default_duration_buckets());
        };
        if buckets.is_empty() {
            return Err(ConfigError::InvalidBuckets("bucket list is empty".into()));
        }
        if buckets.iter().any(|b| !b.is_finite()) {
            return Err(ConfigError::InvalidBuckets("buckets must be finite".into()));
        }
        if buckets.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::InvalidBuckets(
                "buckets must be strictly increasing".into(),
            ));
        }
        Ok(buckets.clone())
    }
}

impl HttpClientExporterOptions {
    /// Options with toggles and buckets taken from `settings`; parameters and
    /// registry stay at their defaults.
    pub fn from_settings(settings: &MetricsSettings) -> Result<Self, ConfigError> {
        let mut options = Self::default();
        options.in_progress.common.enabled = settings.in_progress.enabled;
        options.request_count.common.enabled = settings.request_count.enabled;
        options.request_duration.common.enabled = settings.request_duration.enabled;
        options.request_duration.buckets = settings.duration_buckets()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_settings_enable_everything() {
        let settings = MetricsSettings::from_yaml("{}").unwrap();
        let options = HttpClientExporterOptions::from_settings(&settings).unwrap();
        assert!(options.in_progress.common.enabled);
        assert!(options.request_count.common.enabled);
        assert!(options.request_duration.common.enabled);
        assert_eq!(options.request_duration.buckets, default_duration_buckets());
    }

    #[test]
    fn yaml_toggles_and_buckets() {
        let settings = MetricsSettings::from_yaml(
            r#"
in_progress:
  enabled: false
request_duration:
  buckets: [0.01, 0.1, 1.0]
"#,
        )
        .unwrap();
        let options = HttpClientExporterOptions::from_settings(&settings).unwrap();
        assert!(!options.in_progress.common.enabled);
        assert!(options.request_count.common.enabled);
        assert_eq!(options.request_duration.buckets, vec![0.01, 0.1, 1.0]);
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("HTTPCLIENT_METRICS").source(Some(vars))
    }

    #[test]
    fn environment_toggles_and_bucket_list() {
        let settings = MetricsSettings::from_env(env(&[
            ("HTTPCLIENT_METRICS__REQUEST_COUNT__ENABLED", "false"),
            ("HTTPCLIENT_METRICS__REQUEST_DURATION__BUCKETS", "0.01,0.1,1"),
            ("UNRELATED__REQUEST_COUNT__ENABLED", "true"),
        ]))
        .unwrap();
        assert!(settings.in_progress.enabled);
        assert!(!settings.request_count.enabled);
        assert!(settings.request_duration.enabled);
        assert_eq!(settings.duration_buckets().unwrap(), vec![0.01, 0.1, 1.0]);
    }

    #[test]
    fn unordered_buckets_are_rejected() {
        let settings = MetricsSettings::from_yaml("request_duration:\n  buckets: [1.0, 0.5]\n").unwrap();
        assert!(matches!(
            HttpClientExporterOptions::from_settings(&settings),
            Err(ConfigError::InvalidBuckets(_))
        ));
    }
}
