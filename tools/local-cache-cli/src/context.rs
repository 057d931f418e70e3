//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::config::CliConfig;
use crate::output::Output;
use crate::store::{FileBackends, FileCache};

/// Config file names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["lcache.toml", ".lcache.toml", "lcache.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(Path::new(path))?
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some(path) => {
                    output.debug(&format!("Using config {}", path.display()));
                    CliConfig::load(&path)?
                }
                None => CliConfig::default(),
            }
        };

        Ok(Self {
            config,
            output,
            cwd,
        })
    }

    /// Find a config file in the directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    return Some(config_path);
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Backends persisted in the configured data directory.
    pub fn backends(&self) -> FileBackends {
        FileBackends::new(self.resolve_path(&self.config.store.data_dir))
    }

    /// Open the cache over the configured backends.
    pub fn open_cache(&self) -> Result<FileCache> {
        let cache = self.backends().open(&self.config)?;
        self.output
            .debug(&format!("Default backend: {}", cache.backend()));
        Ok(cache)
    }

    /// Persist the cache's backends.
    pub fn save_cache(&self, cache: &FileCache) -> Result<()> {
        self.backends().save(cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".lcache.toml"), "").unwrap();

        assert_eq!(
            Context::find_config(&nested),
            Some(dir.path().join(".lcache.toml"))
        );
    }

    #[test]
    fn test_resolve_path() {
        let ctx = Context {
            config: CliConfig::default(),
            output: Output::new(false, true),
            cwd: PathBuf::from("/work"),
        };
        assert_eq!(ctx.resolve_path(".lcache"), PathBuf::from("/work/.lcache"));
        assert_eq!(ctx.resolve_path("/abs"), PathBuf::from("/abs"));
    }
}
