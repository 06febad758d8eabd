use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "Stickyboard";
const APP_NAME: &str = "stickyboard";

pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn discover() -> Result<Self> {
        let paths = ConfigPaths::discover()?;
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn load_or_init(&self) -> Result<ClientConfig> {
        self.paths.ensure_directories()?;
        if !self.paths.config_file.exists() {
            let default_cfg = ClientConfig::default();
            self.write_default_config(&default_cfg)?;
            return Ok(default_cfg);
        }
        self.load()
    }

    pub fn load(&self) -> Result<ClientConfig> {
        let raw = fs::read_to_string(&self.paths.config_file)
            .with_context(|| format!("reading config {}", self.paths.config_file.display()))?;
        let cfg: ClientConfig = toml::from_str(&raw).context("parsing config toml")?;
        Ok(cfg)
    }

    fn write_default_config(&self, cfg: &ClientConfig) -> Result<()> {
        let toml = toml::to_string_pretty(cfg).context("serializing default config")?;
        if let Some(parent) = self.paths.config_file.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = fs::File::create(&self.paths.config_file)
            .with_context(|| format!("creating config {}", self.paths.config_file.display()))?;
        file.write_all(toml.as_bytes())
            .context("writing default config")?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub state_dir: PathBuf,
}

impl ConfigPaths {
    pub fn discover() -> Result<Self> {
        let override_config = env::var("STICKYBOARD_CONFIG").ok().map(PathBuf::from);
        let override_state = env::var("STICKYBOARD_STATE").ok().map(PathBuf::from);

        let project_dirs = ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
            .context("resolving XDG project directories")?;

        let config_dir = override_config
            .clone()
            .map(|p| {
                if p.is_dir() {
                    p
                } else {
                    p.parent().map(Path::to_path_buf).unwrap_or(p)
                }
            })
            .unwrap_or_else(|| project_dirs.config_dir().to_path_buf());

        let config_file = override_config
            .filter(|p| p.is_file() || p.extension().is_some())
            .unwrap_or_else(|| config_dir.join("config.toml"));

        let state_dir = override_state.unwrap_or_else(|| {
            project_dirs
                .state_dir()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| project_dirs.data_dir().join("state"))
        });

        Ok(Self {
            config_dir,
            config_file,
            state_dir,
        })
    }

    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.config_dir, &self.state_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating application directory {}", dir.display()))?;
        }
        Ok(())
    }
}

/// Client-side timing knobs. Defaults match the production web client; tests
/// shrink them freely since all polling takes explicit `now` values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Trailing debounce applied to search input before refiltering and
    /// syncing the URL.
    pub search_debounce_ms: u64,
    /// Coalescing window for resize-triggered relayout.
    pub resize_debounce_ms: u64,
    /// How long a deleted note can be brought back before the delete is
    /// committed to the server.
    pub undo_window_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 1000,
            resize_debounce_ms: 50,
            undo_window_ms: 4000,
        }
    }
}

impl ClientConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn undo_window(&self) -> Duration {
        Duration::from_millis(self.undo_window_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_paths(root: &TempDir) -> ConfigPaths {
        let base = root.path();
        ConfigPaths {
            config_dir: base.join("config"),
            config_file: base.join("config").join("config.toml"),
            state_dir: base.join("state"),
        }
    }

    #[test]
    fn load_or_init_writes_defaults_once() -> Result<()> {
        let temp = TempDir::new()?;
        let loader = ConfigLoader {
            paths: temp_paths(&temp),
        };
        let cfg = loader.load_or_init()?;
        assert_eq!(cfg.undo_window_ms, 4000);
        assert!(loader.paths().config_file.exists());

        // Second load reads the file it just wrote.
        let again = loader.load_or_init()?;
        assert_eq!(again.search_debounce_ms, cfg.search_debounce_ms);
        Ok(())
    }

    #[test]
    fn partial_config_fills_missing_fields_with_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let paths = temp_paths(&temp);
        fs::create_dir_all(&paths.config_dir)?;
        fs::write(&paths.config_file, "undo_window_ms = 2500\n")?;
        let loader = ConfigLoader { paths };
        let cfg = loader.load()?;
        assert_eq!(cfg.undo_window_ms, 2500);
        assert_eq!(cfg.search_debounce_ms, 1000);
        assert_eq!(cfg.resize_debounce_ms, 50);
        Ok(())
    }
}
