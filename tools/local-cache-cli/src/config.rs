//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use local_cache::CacheConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cache behavior.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Where the simulated backends persist.
    #[serde(default)]
    pub store: StoreConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?
        };

        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Validate the cache section.
    pub fn validate(&self) -> Result<()> {
        self.cache.validate()?;
        Ok(())
    }
}

/// Backend persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding `durable.json` and `cookies.json`, relative to the
    /// working directory unless absolute.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Whether a durable store is available. `false` behaves like a host
    /// without one, so every call goes to cookies.
    #[serde(default = "default_durable")]
    pub durable: bool,
}

fn default_data_dir() -> String {
    ".lcache".to_string()
}

fn default_durable() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            durable: default_durable(),
        }
    }
}

/// Generate default config file content.
pub fn generate_default_config() -> String {
    r#"# lcache configuration

[cache]
# Durable-store key holding the expiration ledger
ledger_key = "localStorageExpirations"
# Path attribute on cookies
cookie_path = "/"
# Minutes east of UTC used for midnight and calendar arithmetic
utc_offset_minutes = 0

# Lifetime of values written without an expiration
[cache.default_expires]
days = 1

[store]
# Directory for the persisted durable store and cookie jar
data_dir = ".lcache"
# Set to false to simulate a host without a durable store
durable = true
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use local_cache::ExpirySpec;

    #[test]
    fn test_default_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.cache, CacheConfig::default());
        assert_eq!(config.store.data_dir, ".lcache");
        assert!(config.store.durable);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.cache.default_expires, ExpirySpec::one_day());
        assert!(config.store.durable);
    }

    #[test]
    fn test_load_toml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("lcache.toml");
        std::fs::write(&toml_path, "[store]\ndurable = false\n").unwrap();
        let config = CliConfig::load(&toml_path).unwrap();
        assert!(!config.store.durable);

        let json_path = dir.path().join("lcache.json");
        std::fs::write(
            &json_path,
            r#"{"cache": {"default_expires": {"hours": 2}}}"#,
        )
        .unwrap();
        let config = CliConfig::load(&json_path).unwrap();
        assert_eq!(
            config.cache.default_expires,
            ExpirySpec::default().with_hours(2)
        );
    }

    #[test]
    fn test_load_rejects_invalid_cache_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lcache.toml");
        std::fs::write(&path, "[cache]\nledger_key = \"a|b\"\n").unwrap();
        assert!(CliConfig::load(&path).is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lcache.toml");
        let mut config = CliConfig::default();
        config.store.data_dir = "/tmp/somewhere".into();

        config.save(&path).unwrap();
        let loaded = CliConfig::load(&path).unwrap();
        assert_eq!(loaded.store.data_dir, "/tmp/somewhere");
        assert_eq!(loaded.cache, config.cache);
    }
}
