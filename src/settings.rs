//! Configuration loading.
//!
//! Settings come from an optional file (TOML, YAML or JSON, by extension)
//! overridden by `LAGWATCH_*` environment variables, e.g.
//! `LAGWATCH_SERVERS=http://a:8000,http://b:8000` or `LAGWATCH_INTERVAL=30s`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use lagwatch_adapters::burrow::{
    BurrowAdapter, BurrowAdapterBuilder, DEFAULT_API_PREFIX, DEFAULT_SERVER, DEFAULT_TIMEOUT,
};
use lagwatch_adapters::gather::DEFAULT_WORKERS;
use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "LAGWATCH";

const LIST_KEYS: &[&str] = &["servers", "clusters", "groups", "topics"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Burrow servers, optionally with `user:pass@` credentials.
    pub servers: Vec<String>,
    pub api_prefix: String,
    #[serde(deserialize_with = "crate::duration::deserialize")]
    pub response_timeout: Duration,

    /// Time between the starts of two gather cycles.
    #[serde(deserialize_with = "crate::duration::deserialize")]
    pub interval: Duration,

    /// Worker count of every level unless overridden below.
    pub concurrent_connections: usize,
    pub cluster_workers: Option<usize>,
    pub group_workers: Option<usize>,
    pub topic_workers: Option<usize>,

    pub username: Option<String>,
    pub password: Option<String>,
    pub tls_ca: Option<PathBuf>,
    pub insecure_skip_verify: bool,

    /// Whitelists. Empty allows everything.
    pub clusters: Vec<String>,
    pub groups: Vec<String>,
    pub topics: Vec<String>,

    pub disable_topics: bool,
    pub disable_group_summary: bool,
    pub disable_group_topics: bool,

    /// `-` for stdout, `tcp://host:port`, or a file path.
    pub output: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            servers: vec![DEFAULT_SERVER.to_string()],
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            response_timeout: DEFAULT_TIMEOUT,
            interval: Duration::from_secs(10),
            concurrent_connections: DEFAULT_WORKERS,
            cluster_workers: None,
            group_workers: None,
            topic_workers: None,
            username: None,
            password: None,
            tls_ca: None,
            insecure_skip_verify: false,
            clusters: Vec::new(),
            groups: Vec::new(),
            topics: Vec::new(),
            disable_topics: false,
            disable_group_summary: false,
            disable_group_topics: false,
            output: "-".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (if given) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(env)
            .build()
            .and_then(Config::try_deserialize)
            .with_context(|| match path {
                Some(path) => format!("Failed to load configuration from {}", path.display()),
                None => "Failed to load configuration from environment".to_string(),
            })?;

        if settings.interval.is_zero() {
            anyhow::bail!("interval must be greater than zero");
        }
        Ok(settings)
    }

    /// Adapter builder carrying every setting.
    pub fn adapter_builder(&self) -> BurrowAdapterBuilder {
        let mut builder = BurrowAdapter::builder()
            .servers(self.servers.iter().cloned())
            .api_prefix(self.api_prefix.as_str())
            .timeout(self.response_timeout)
            .concurrent_connections(self.concurrent_connections)
            .clusters(self.clusters.iter().cloned())
            .groups(self.groups.iter().cloned())
            .topics(self.topics.iter().cloned())
            .insecure_skip_verify(self.insecure_skip_verify)
            .disable_topics(self.disable_topics)
            .disable_group_summary(self.disable_group_summary)
            .disable_group_topics(self.disable_group_topics);

        if let Some(workers) = self.cluster_workers {
            builder = builder.cluster_workers(workers);
        }
        if let Some(workers) = self.group_workers {
            builder = builder.group_workers(workers);
        }
        if let Some(workers) = self.topic_workers {
            builder = builder.topic_workers(workers);
        }
        if self.username.is_some() || self.password.is_some() {
            builder = builder.credentials(
                self.username.clone().unwrap_or_default(),
                self.password.clone().unwrap_or_default(),
            );
        }
        if let Some(ca) = &self.tls_ca {
            builder = builder.tls_ca(ca);
        }
        builder
    }

    /// Build the Burrow adapter these settings describe.
    pub fn adapter(&self) -> Result<BurrowAdapter> {
        self.adapter_builder()
            .build()
            .context("Failed to build Burrow adapter")
    }
}

fn environment() -> Environment {
    LIST_KEYS.iter().fold(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(","),
        |env, key| env.with_list_parse_key(key),
    )
}
