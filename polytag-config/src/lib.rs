//! Loader for Polytag configuration with YAML + environment overlays.
//!
//! Sources are merged in order: YAML files/snippets first, then
//! `POLYTAG__`-prefixed environment variables (`__` separates nesting, so
//! `POLYTAG__INFERENCE__MODEL` sets `inference.model`). After merging,
//! `${VAR}` placeholders in any string are expanded from the process
//! environment before the typed structs are built.
use config::{Config, ConfigError, Environment, File};
use polytag_common::observability::{LogConfig, LogFormat};
use polytag_pipeline::{EmptyExtractionPolicy, Template};
use polytag_web::{ExtractionSettings, FetchSettings};
use serde::de::{self, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const CONFIG_FILE_NAME: &str = "polytag.yaml";

#[derive(Debug, Deserialize)]
pub struct PolytagConfig {
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub version: Option<String>,
    #[serde(default)]
    pub template: Template,
    #[serde(default)]
    pub empty_extraction: EmptyExtractionPolicy,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub strict_labels: bool,
    pub inference: InferenceConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    /// When absent the template's own extraction defaults apply.
    #[serde(default)]
    pub extraction: Option<ExtractionSettings>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PolytagConfig {
    pub fn extraction_settings(&self) -> ExtractionSettings {
        self.extraction
            .clone()
            .unwrap_or_else(|| self.template.default_extraction())
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum InferenceConfig {
    Ai21 {
        #[serde(default = "default_ai21_model", deserialize_with = "scalar_string")]
        model: String,
        #[serde(deserialize_with = "scalar_string")]
        auth_token: String,
        #[serde(default = "default_ai21_endpoint")]
        endpoint: String,
        #[serde(default, deserialize_with = "flexible_opt_u64")]
        timeout_secs: Option<u64>,
    },
}

// `POLYTAG__*` values always arrive as strings, while YAML scalars keep
// their own type (`version: 0.1` is a float, `auth_token: 1234` an integer).
// These accept either spelling for the field's real type.

fn scalar_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(de)? {
        Value::String(s) => Ok(s),
        v @ (Value::Number(_) | Value::Bool(_)) => Ok(v.to_string()),
        other => Err(D::Error::custom(format!("expected a string, got `{other}`"))),
    }
}

fn opt_scalar_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(de)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        v @ (Value::Number(_) | Value::Bool(_)) => Ok(Some(v.to_string())),
        other => Err(D::Error::custom(format!("expected a string, got `{other}`"))),
    }
}

fn parse_u64<E: de::Error>(v: Value) -> Result<u64, E> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| E::custom(format!("expected a non-negative integer, got `{n}`"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|e| E::custom(format!("invalid integer `{s}`: {e}"))),
        other => Err(E::custom(format!("expected an integer, got `{other}`"))),
    }
}

fn flexible_u64<'de, D>(de: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    parse_u64(Value::deserialize(de)?)
}

fn flexible_opt_u64<'de, D>(de: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(de)? {
        Value::Null => Ok(None),
        v => parse_u64(v).map(Some),
    }
}

fn flexible_bool<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(de)? {
        Value::Bool(b) => Ok(b),
        Value::String(s) => s
            .trim()
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected `true` or `false`, got `{s}`"))),
        other => Err(D::Error::custom(format!("expected a bool, got `{other}`"))),
    }
}

fn default_ai21_model() -> String {
    "j2-ultra".into()
}
fn default_ai21_endpoint() -> String {
    "https://api.ai21.com/studio/v1".into()
}

#[derive(Debug, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout", deserialize_with = "flexible_u64")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_fetch_timeout() -> u64 {
    15
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            user_agent: None,
        }
    }
}

impl FetchConfig {
    pub fn settings(&self) -> FetchSettings {
        let mut settings = FetchSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            ..FetchSettings::default()
        };
        if let Some(ua) = &self.user_agent {
            settings.user_agent = ua.clone();
        }
        settings
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_true", deserialize_with = "flexible_bool")]
    pub stderr: bool,
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}
fn default_filter() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            stderr: default_true(),
            filter: default_filter(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self, app_name: &'static str) -> LogConfig {
        LogConfig {
            app_name,
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.filter.clone(),
        }
    }
}

/// `<config dir>/polytag/polytag.yaml` when that file exists.
pub fn default_config_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("polytag").join(CONFIG_FILE_NAME);
    path.is_file().then_some(path)
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct PolytagConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for PolytagConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PolytagConfigLoader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`Self::with_file`], but a missing file is skipped.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use polytag_config::{InferenceConfig, PolytagConfigLoader};
    /// use polytag_pipeline::Template;
    ///
    /// let cfg = PolytagConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// version: "1"
    /// template: taxonomy
    /// inference:
    ///   provider: ai21
    ///   auth_token: "example"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.template, Template::Taxonomy);
    /// let InferenceConfig::Ai21 { model, endpoint, .. } = &cfg.inference;
    /// assert_eq!(model, "j2-ultra");
    /// assert_eq!(endpoint, "https://api.ai21.com/studio/v1");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// `POLYTAG__`-prefixed environment variables are layered last so they
    /// win over every file, then `${VAR}` placeholders are expanded.
    pub fn load(self) -> Result<PolytagConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(Environment::with_prefix("POLYTAG").separator("__"))
            .build()?;

        // Convert to serde_json::Value first
        let mut v: Value = cfg.try_deserialize()?;
        // Recursively expand environment variables
        expand_env_in_value(&mut v);

        let typed: PolytagConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
