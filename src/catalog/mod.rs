//! Slash command discovery and caching
//!
//! This module handles:
//! - Scanning the `~/.claude/commands` directory for command files
//! - Deriving a display label and description per file
//! - Merging scanned commands with a static fallback list
//! - Caching the merged catalog for a bounded duration

pub mod describe;


use crate::error::{PaletteError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// How long a built catalog stays fresh.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// One selectable slash command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashCommand {
    /// Command identifier, e.g. `/ask`.
    pub value: String,
    /// Display label, e.g. `/ask - Ask Claude a question`.
    pub label: String,
    /// Derived description text.
    pub description: String,
}

impl SlashCommand {
    /// Build a command from its bare name and description, deriving the
    /// identifier and display label.
    pub fn new(name: &str, description: impl Into<String>) -> Self {
        let description = description.into();
        let value = format!("/{}", name);
        Self {
            label: format!("{} - {}", value, description),
            value,
            description,
        }
    }
}

/// Injectable time source so cache freshness rules are testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CachedCatalog {
    commands: Vec<SlashCommand>,
    built_at: Instant,
}

/// Builds and caches the slash command catalog.
///
/// The cache is owned by this instance and guarded by a mutex held across
/// population, so concurrent lookups trigger at most one directory scan.
pub struct CommandCatalog {
    commands_dir: PathBuf,
    fallback: Vec<SlashCommand>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    cache: Mutex<Option<CachedCatalog>>,
}

impl CommandCatalog {
    /// Create a catalog over the given commands directory.
    pub fn new(commands_dir: impl Into<PathBuf>) -> Self {
        Self {
            commands_dir: commands_dir.into(),
            fallback: fallback_commands(),
            ttl: CACHE_TTL,
            clock: Arc::new(SystemClock),
            cache: Mutex::new(None),
        }
    }

    /// Replace the static fallback list.
    pub fn with_fallback(mut self, fallback: Vec<SlashCommand>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Override the cache freshness window.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Override the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current catalog, rebuilt when the cache is absent or stale.
    ///
    /// Never fails: a scan fault degrades the catalog to the fallback list.
    /// File-derived commands shadow fallback commands that share an
    /// identifier.
    pub async fn get_commands(&self) -> Vec<SlashCommand> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if self.clock.now().duration_since(cached.built_at) < self.ttl {
                debug!("using cached slash commands");
                return cached.commands.clone();
            }
        }

        debug!("fetching fresh slash commands");
        let commands = match scan_directory(&self.commands_dir).await {
            Ok(mut scanned) => {
                // Scanned commands precede fallback so they win the dedup.
                scanned.extend(self.fallback.iter().cloned());
                dedup_commands(scanned)
            }
            Err(err) => {
                warn!("command scan failed, using fallback only: {}", err);
                dedup_commands(self.fallback.clone())
            }
        };

        info!("cached {} slash commands", commands.len());
        *cache = Some(CachedCatalog {
            commands: commands.clone(),
            built_at: self.clock.now(),
        });
        commands
    }
}

/// Scan a directory for command definition files.
///
/// A missing directory yields an empty list, not an error. Directory entries
/// and hidden files are skipped, as is any entry whose metadata cannot be
/// read. Entries keep their enumeration order.
pub async fn scan_directory(dir: &Path) -> Result<Vec<SlashCommand>> {
    let mut commands = Vec::new();

    let exists = tokio::fs::try_exists(dir).await.map_err(|err| {
        PaletteError::discovery(format!("cannot stat {}: {}", dir.display(), err))
    })?;
    if !exists {
        debug!("commands directory {} does not exist", dir.display());
        return Ok(commands);
    }

    let mut entries = tokio::fs::read_dir(dir).await.map_err(|err| {
        PaletteError::discovery(format!("cannot read {}: {}", dir.display(), err))
    })?;

    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            warn!("skipping command file with a non-UTF-8 name");
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        match entry.file_type().await {
            Ok(file_type) if file_type.is_dir() => continue,
            Ok(_) => {}
            Err(err) => {
                warn!("error inspecting command file {}: {}", name, err);
                continue;
            }
        }

        // The file name is the command name, extension stripped.
        let command_name = Path::new(name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(name);
        let description = describe_file(&entry.path(), command_name).await;
        let command = SlashCommand::new(command_name, description);
        debug!("added command: {}", command.value);
        commands.push(command);
    }

    info!(
        "found {} command files in {}",
        commands.len(),
        dir.display()
    );
    Ok(commands)
}

/// Derive a human-readable description for one command file.
async fn describe_file(path: &Path, command_name: &str) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => describe::extract_description(&content)
            .unwrap_or_else(|| describe::placeholder_description(command_name)),
        Err(err) => {
            warn!("error reading command file {}: {}", path.display(), err);
            describe::UNREADABLE_DESCRIPTION.to_string()
        }
    }
}

/// Drop commands whose identifier was already seen, keeping the first.
pub fn dedup_commands(commands: Vec<SlashCommand>) -> Vec<SlashCommand> {
    let mut seen = HashSet::new();
    commands
        .into_iter()
        .filter(|command| seen.insert(command.value.clone()))
        .collect()
}

/// Commands offered when no definition files are available.
///
/// Currently empty: the palette ships no built-in commands and relies on the
/// user's own definition files.
pub fn fallback_commands() -> Vec<SlashCommand> {
    Vec::new()
}
