//! Headless core for Claude Palette, a macOS menu-bar launcher for Claude
//! Code slash commands.
//!
//! The palette UI is a thin shell; everything it needs lives here:
//! discovering command definition files under `~/.claude/commands`, caching
//! the resulting catalog, and executing a selected command through the
//! external `claude` binary (or a harmless echo in simulation mode).
//!
//! ```rust,no_run
//! use claude_palette::{CommandCatalog, CommandExecutor};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let catalog = CommandCatalog::new(claude_palette::default_commands_dir());
//! for command in catalog.get_commands().await {
//!     println!("{}", command.label);
//! }
//!
//! let executor = CommandExecutor::default();
//! let result = executor.execute("/summarize", "meeting notes from today").await;
//! println!("{result:?}");
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod ipc;

// Re-export commonly used types
pub use catalog::{CommandCatalog, SlashCommand};
pub use error::{PaletteError, Result};
pub use executor::{CommandExecutor, ExecutionMode, ExecutionResult};

/// Version information for the palette core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default directory scanned for command definition files
pub fn default_commands_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".claude")
        .join("commands")
}
