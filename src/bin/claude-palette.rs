use anyhow::Result;
use clap::{Parser, Subcommand};
use claude_palette::catalog::CommandCatalog;
use claude_palette::config::Config;
use claude_palette::executor::{CommandExecutor, ExecutionResult, ExecutorConfig};
use claude_palette::ipc::PaletteBridge;
use claude_palette::PaletteError;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};

/// Menu-bar palette backend for Claude Code slash commands
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory scanned for command definition files
    #[arg(long, global = true)]
    commands_dir: Option<PathBuf>,

    /// Timeout for command execution in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Run commands against the real Claude Code binary instead of the
    /// simulation echo
    #[arg(long, global = true)]
    live: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available slash commands
    List {
        /// Emit the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Execute one slash command with free-text input
    Run {
        /// Command identifier, e.g. /summarize
        command: String,
        /// Free-text input forwarded to the command
        input: Vec<String>,
    },

    /// Serve palette requests as JSON lines over stdin/stdout
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with environment-based filtering. Logs go to
    // stderr: stdout is the protocol channel in serve mode.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli).await {
        error!("command failed: {:?}", e);
        eprintln!("{} {}", "Error:".red().bold(), e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn execute(cli: Cli) -> claude_palette::Result<()> {
    let mut config = Config::load_default().unwrap_or_else(|e| {
        warn!("could not load config, using defaults: {}", e);
        Config::default()
    });

    // CLI args override config file settings
    if let Some(dir) = cli.commands_dir {
        config.commands_dir = Some(dir);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if cli.live {
        config.simulate = Some(false);
    }

    let bridge = build_bridge(&config);

    match cli.command {
        Commands::List { json } => list_commands(&bridge, json).await,
        Commands::Run { command, input } => run_command(&bridge, command, input).await,
        Commands::Serve => serve(&bridge).await,
    }
}

fn build_bridge(config: &Config) -> PaletteBridge {
    let catalog = CommandCatalog::new(config.resolved_commands_dir())
        .with_ttl(Duration::from_secs(config.cache_ttl_secs));
    let executor = CommandExecutor::new(ExecutorConfig {
        mode: config.execution_mode(),
        binary: config.binary.clone(),
        timeout: Duration::from_millis(config.timeout_ms),
    });
    PaletteBridge::new(catalog, executor)
}

async fn list_commands(bridge: &PaletteBridge, json: bool) -> claude_palette::Result<()> {
    let commands = bridge.catalog().get_commands().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&commands)?);
        return Ok(());
    }

    if commands.is_empty() {
        println!("No slash commands found.");
        return Ok(());
    }

    for command in commands {
        println!("{}  {}", command.value.cyan().bold(), command.description);
    }
    Ok(())
}

async fn run_command(
    bridge: &PaletteBridge,
    command: String,
    input: Vec<String>,
) -> claude_palette::Result<()> {
    // The executor does not validate; the caller must (see the palette UI,
    // which disables the run button until both fields are filled).
    let input = input.join(" ");
    if command.trim().is_empty() {
        return Err(PaletteError::invalid_input("command must not be empty"));
    }
    if input.trim().is_empty() {
        return Err(PaletteError::invalid_input("input text must not be empty"));
    }

    match bridge.executor().execute(&command, &input).await {
        ExecutionResult::Success { output } => {
            println!("{}", output);
            Ok(())
        }
        ExecutionResult::Failure { error } => Err(PaletteError::execution(error)),
    }
}

async fn serve(bridge: &PaletteBridge) -> claude_palette::Result<()> {
    info!("serving palette requests on stdin/stdout");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = bridge.handle_line(&line).await;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
