//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Default TTL in seconds for cache entries set without an explicit TTL
    pub default_ttl: u64,
    /// TTL in seconds for the memoized pedigree statistics
    pub statistics_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Fixed prefix of pedigree business identifiers
    pub pedigree_id_prefix: String,
    /// Number of zero-padded digits after the prefix
    pub pedigree_id_width: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3001)
    /// - `DEFAULT_TTL` - Default cache TTL in seconds (default: 300)
    /// - `STATISTICS_TTL` - Statistics cache TTL in seconds (default: 300)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `PEDIGREE_ID_PREFIX` - Pedigree ID prefix (default: JCU)
    /// - `PEDIGREE_ID_WIDTH` - Pedigree ID digit width (default: 7)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            statistics_ttl: env_or("STATISTICS_TTL", defaults.statistics_ttl),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            pedigree_id_prefix: env::var("PEDIGREE_ID_PREFIX")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.pedigree_id_prefix),
            pedigree_id_width: env_or("PEDIGREE_ID_WIDTH", defaults.pedigree_id_width),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3001,
            default_ttl: 300,
            statistics_ttl: 300,
            cleanup_interval: 60,
            pedigree_id_prefix: "JCU".to_string(),
            pedigree_id_width: 7,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3001);
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.statistics_ttl, 300);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.pedigree_id_prefix, "JCU");
        assert_eq!(config.pedigree_id_width, 7);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("DEFAULT_TTL");
        env::remove_var("STATISTICS_TTL");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("PEDIGREE_ID_PREFIX");
        env::remove_var("PEDIGREE_ID_WIDTH");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3001);
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.pedigree_id_prefix, "JCU");
        assert_eq!(config.pedigree_id_width, 7);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("PEDIGREE_REGISTRY_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("PEDIGREE_REGISTRY_TEST_GARBAGE", 42u64), 42);
        env::remove_var("PEDIGREE_REGISTRY_TEST_GARBAGE");
    }
}
