//! Environment-driven service configuration.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SWEEP_SCHEDULE: &str = "0 */5 * * * *";

#[derive(Debug, Clone)]
pub struct Config {
    /// Video platform API key
    pub youtube_api_key: String,
    /// Base URL of the video platform API (overridable for local mocks)
    pub youtube_api_base: String,
    pub bind_addr: String,
    /// Deadline applied to every outbound API call
    pub upstream_timeout: Duration,
    /// Progress entries older than this are swept
    pub progress_ttl: Duration,
    /// Cron expression driving the progress sweeper
    pub sweep_schedule: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube_api_key: String::new(),
            youtube_api_base: DEFAULT_API_BASE.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            upstream_timeout: Duration::from_secs(15),
            progress_ttl: Duration::from_secs(3600),
            sweep_schedule: DEFAULT_SWEEP_SCHEDULE.to_string(),
        }
    }
}

impl Config {
    /// Build the configuration from the process environment.
    /// Call `dotenv()` first if a `.env` file should be honored.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let youtube_api_key = lookup("YOUTUBE_API_KEY").unwrap_or_default();
        if youtube_api_key.is_empty() {
            warn!("⚠️ YOUTUBE_API_KEY is not set. API requests will fail.");
        }

        let youtube_api_base = lookup("YOUTUBE_API_BASE")
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.youtube_api_base);

        let bind_addr = lookup("BIND_ADDR")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.bind_addr);

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_secs("UPSTREAM_TIMEOUT_SECS", &raw)?),
            None => defaults.upstream_timeout,
        };

        let progress_ttl = match lookup("PROGRESS_TTL_SECS") {
            Some(raw) => Duration::from_secs(parse_secs("PROGRESS_TTL_SECS", &raw)?),
            None => defaults.progress_ttl,
        };

        let sweep_schedule = lookup("SWEEP_SCHEDULE")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.sweep_schedule);

        Ok(Self {
            youtube_api_key,
            youtube_api_base,
            bind_addr,
            upstream_timeout,
            progress_ttl,
            sweep_schedule,
        })
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number of seconds, got {:?}", key, raw))?;
    if secs == 0 {
        anyhow::bail!("{} must be greater than zero", key);
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.youtube_api_base, DEFAULT_API_BASE);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.upstream_timeout, Duration::from_secs(15));
        assert_eq!(config.progress_ttl, Duration::from_secs(3600));
        assert!(config.youtube_api_key.is_empty());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("YOUTUBE_API_KEY", "secret"),
            ("YOUTUBE_API_BASE", "http://127.0.0.1:9000/"),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
            ("PROGRESS_TTL_SECS", "60"),
            ("SWEEP_SCHEDULE", "*/10 * * * * *"),
        ]))
        .unwrap();
        assert_eq!(config.youtube_api_key, "secret");
        assert_eq!(config.youtube_api_base, "http://127.0.0.1:9000");
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
        assert_eq!(config.progress_ttl, Duration::from_secs(60));
        assert_eq!(config.sweep_schedule, "*/10 * * * * *");
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("UPSTREAM_TIMEOUT_SECS", "soon")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("PROGRESS_TTL_SECS", "0")])).is_err());
    }
}
