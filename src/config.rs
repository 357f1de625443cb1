use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Which backing implementation feeds the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    /// Fixed literal data.
    Stub,
    /// JSON over HTTP from `upstream_base_url`.
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub request_timeout_secs: u64,
    /// Deadline for each upstream call. Always below the request deadline.
    pub upstream_timeout_ms: u64,
    pub data_source: DataSourceKind,
    pub upstream_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            static_dir: PathBuf::from("static"),
            request_timeout_secs: 30,
            upstream_timeout_ms: default_upstream_timeout_ms(30),
            data_source: DataSourceKind::Stub,
            upstream_base_url: None,
        }
    }
}

/// Two thirds of the request deadline.
fn default_upstream_timeout_ms(request_timeout_secs: u64) -> u64 {
    request_timeout_secs.saturating_mul(1000) / 3 * 2
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let data_source = match var("DATA_SOURCE").as_deref().map(str::trim) {
            None => defaults.data_source,
            Some(s) if s.eq_ignore_ascii_case("stub") => DataSourceKind::Stub,
            Some(s) if s.eq_ignore_ascii_case("remote") => DataSourceKind::Remote,
            Some(other) => {
                anyhow::bail!("DATA_SOURCE must be 'stub' or 'remote', got '{}'", other)
            }
        };

        let request_timeout_secs = match var("REQUEST_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be a positive number"))?,
            None => defaults.request_timeout_secs,
        };
        let request_timeout_ms = request_timeout_secs.saturating_mul(1000);

        let upstream_timeout_ms = match var("UPSTREAM_TIMEOUT_MS") {
            Some(ms) => ms
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0 && *ms < request_timeout_ms)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "UPSTREAM_TIMEOUT_MS must be a positive number below REQUEST_TIMEOUT_SECS ({} ms)",
                        request_timeout_ms
                    )
                })?,
            None => default_upstream_timeout_ms(request_timeout_secs),
        };

        let config = Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: match var("PORT") {
                Some(port) => port
                    .trim()
                    .parse::<u16>()
                    .ok()
                    .filter(|p| *p != 0)
                    .ok_or_else(|| {
                        anyhow::anyhow!("PORT must be a valid number between 1-65535")
                    })?,
                None => defaults.port,
            },
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            request_timeout_secs,
            upstream_timeout_ms,
            upstream_base_url: var("UPSTREAM_BASE_URL")
                .map(|url| {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("UPSTREAM_BASE_URL must start with http:// or https://");
                    }
                    Ok(url.trim_end_matches('/').to_string())
                })
                .transpose()?,
            data_source,
        };

        if config.data_source == DataSourceKind::Remote && config.upstream_base_url.is_none() {
            anyhow::bail!("UPSTREAM_BASE_URL is required when DATA_SOURCE=remote");
        }

        tracing::debug!("Server address: {}:{}", config.host, config.port);
        tracing::debug!("Static directory: {}", config.static_dir.display());
        tracing::debug!(
            "Timeouts: request {}s, upstream {}ms",
            config.request_timeout_secs,
            config.upstream_timeout_ms
        );
        tracing::debug!("Data source: {:?}", config.data_source);
        if let Some(ref url) = config.upstream_base_url {
            tracing::debug!("Upstream base URL: {}", url);
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Creates the static asset directory if it does not exist yet.
    ///
    /// Called once from the process entry point before the router is built.
    pub fn prepare_static_dir(&self) -> anyhow::Result<&Path> {
        std::fs::create_dir_all(&self.static_dir).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create static directory {}: {}",
                self.static_dir.display(),
                e
            )
        })?;
        Ok(&self.static_dir)
    }
}
