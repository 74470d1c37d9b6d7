use crate::error::{PaletteError, Result};
use crate::executor::ExecutionMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration settings for the palette
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory scanned for command definition files (defaults to
    /// `~/.claude/commands` when unset)
    pub commands_dir: Option<PathBuf>,

    /// How long a built catalog stays fresh, in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Hard ceiling for a single command execution, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Executable invoked in live mode
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Force simulation (`true`) or live (`false`) execution. When unset the
    /// `CLAUDE_PALETTE_TEST_MODE` environment variable decides at execution
    /// time.
    pub simulate: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            commands_dir: None,
            cache_ttl_secs: default_cache_ttl(),
            timeout_ms: default_timeout_ms(),
            binary: default_binary(),
            simulate: None,
        }
    }
}

impl Config {
    /// Load configuration from file, with fallback to defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            // Create default config file
            let config = Self::default();
            config.save_to_file(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            PaletteError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            PaletteError::configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "claude-palette").ok_or_else(|| {
            PaletteError::configuration("could not determine a config directory")
        })?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from_file(path)
    }

    /// Directory scanned for command definition files
    pub fn resolved_commands_dir(&self) -> PathBuf {
        self.commands_dir
            .clone()
            .unwrap_or_else(crate::default_commands_dir)
    }

    /// Execution mode after applying the `simulate` override
    pub fn execution_mode(&self) -> ExecutionMode {
        match self.simulate {
            Some(true) => ExecutionMode::Simulation,
            Some(false) => ExecutionMode::Live,
            None => ExecutionMode::from_env(),
        }
    }
}

// Helper functions for default values
fn default_cache_ttl() -> u64 {
    300
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_binary() -> String {
    "claude".to_string()
}
