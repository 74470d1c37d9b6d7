//! Command execution engine
//!
//! This module handles:
//! - Spawning the external Claude Code binary (or a diagnostic echo in
//!   simulation mode) for one selected command plus free-text input
//! - Capturing stdout/stderr as they arrive
//! - Enforcing a hard timeout on the subprocess
//! - Reporting a structured success/failure outcome
//!
//! Faults never escape [`CommandExecutor::execute`]; spawn errors, non-zero
//! exits and timeouts are all folded into the failure branch of the result.

#[cfg(test)]
mod executor_test;

use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Hard ceiling for a single command execution.
pub const EXECUTION_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Executable invoked in live mode.
pub const DEFAULT_BINARY: &str = "claude";

/// Environment variable selecting the execution mode. Any value other than
/// `"false"` (including absence) keeps the executor in simulation mode.
pub const TEST_MODE_ENV: &str = "CLAUDE_PALETTE_TEST_MODE";

const TIMEOUT_MESSAGE: &str = "コマンドがタイムアウトしました";
const FAILURE_MESSAGE: &str = "コマンドの実行に失敗しました";

/// Outcome of one execution request. Exactly one branch per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// The process exited with code 0.
    Success { output: String },
    /// The process failed, timed out, or could not be spawned.
    Failure { error: String },
}

impl ExecutionResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self::Success {
            output: output.into(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Captured output, present on the success branch only.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Success { output } => Some(output),
            Self::Failure { .. } => None,
        }
    }

    /// Failure message, present on the failure branch only.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }
}

/// How [`CommandExecutor::execute`] reaches the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Echo the request through the shell instead of running the real tool.
    Simulation,
    /// Invoke the external Claude Code binary.
    Live,
}

impl ExecutionMode {
    /// Mode selected by the environment: simulation unless
    /// `CLAUDE_PALETTE_TEST_MODE` is exactly `"false"`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if value == "false" => Self::Live,
            _ => Self::Simulation,
        }
    }
}

/// Configuration for a [`CommandExecutor`].
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub mode: ExecutionMode,
    pub binary: String,
    pub timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::from_env(),
            binary: DEFAULT_BINARY.to_string(),
            timeout: EXECUTION_TIMEOUT,
        }
    }
}

/// Executes slash commands as external processes.
///
/// Each call owns its own subprocess and timer; concurrent calls are fully
/// independent.
#[derive(Debug, Clone, Default)]
pub struct CommandExecutor {
    config: ExecutorConfig,
}

impl CommandExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.config.mode
    }

    /// Run one command with the given free-text input.
    ///
    /// Resolves exactly once and never errors; every fault is reported
    /// through the failure branch of the result.
    pub async fn execute(&self, command: &str, input: &str) -> ExecutionResult {
        debug!("executing {} in {:?} mode", command, self.config.mode);

        let spawned = match self.config.mode {
            ExecutionMode::Simulation => self.spawn_simulation(command, input),
            ExecutionMode::Live => self.spawn_live(command, input),
        };

        let child = match spawned {
            Ok(child) => child,
            Err(err) => {
                warn!("failed to spawn command process: {}", err);
                return ExecutionResult::failure(err.to_string());
            }
        };

        self.supervise(child, command, input).await
    }

    fn spawn_simulation(&self, command: &str, input: &str) -> std::io::Result<Child> {
        let diagnostic = format!(
            "echo \"実行されたコマンド: {} | 入力: {}\"",
            command, input
        );
        let mut shell = Command::new("/bin/sh");
        shell.arg("-c").arg(diagnostic);
        spawn_piped(shell)
    }

    fn spawn_live(&self, command: &str, input: &str) -> std::io::Result<Child> {
        let mut claude = Command::new(&self.config.binary);
        claude.arg("-p").arg(format!("{} {}", command, input));
        spawn_piped(claude)
    }

    /// Wait for the child, racing its exit against the timeout.
    ///
    /// The timeout arm and the exit arm are the two branches of a single
    /// match, so a result is produced exactly once even when the process
    /// exits while the timer fires.
    async fn supervise(&self, mut child: Child, command: &str, input: &str) -> ExecutionResult {
        let stdout_task = tokio::spawn(drain(child.stdout.take()));
        let stderr_task = tokio::spawn(drain(child.stderr.take()));

        let status = match tokio::time::timeout(self.config.timeout, child.wait()).await {
            Err(_elapsed) => {
                // Buffered output is discarded along with the process.
                if let Err(err) = child.kill().await {
                    warn!("failed to kill timed-out process: {}", err);
                }
                stdout_task.abort();
                stderr_task.abort();
                return ExecutionResult::failure(TIMEOUT_MESSAGE);
            }
            Ok(Err(err)) => return ExecutionResult::failure(err.to_string()),
            Ok(Ok(status)) => status,
        };

        let output = stdout_task.await.unwrap_or_default();
        let error = stderr_task.await.unwrap_or_default();

        if status.success() {
            let output = if output.is_empty() {
                self.empty_output_message(command, input)
            } else {
                output
            };
            ExecutionResult::success(output)
        } else {
            let error = if error.is_empty() {
                FAILURE_MESSAGE.to_string()
            } else {
                error
            };
            ExecutionResult::failure(error)
        }
    }

    /// Message substituted when a successful run produced no stdout.
    fn empty_output_message(&self, command: &str, input: &str) -> String {
        match self.config.mode {
            ExecutionMode::Simulation => format!(
                "【テストモード】実際のコマンドは実行されていません。\n実行されたコマンド: {}\n入力: {}",
                command, input
            ),
            ExecutionMode::Live => {
                format!("{}コマンドが正常に実行されました。\n入力: {}", command, input)
            }
        }
    }
}

fn spawn_piped(mut command: Command) -> std::io::Result<Child> {
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
}

/// Accumulate a captured stream into a string as chunks arrive.
async fn drain<R>(stream: Option<R>) -> String
where
    R: tokio::io::AsyncRead + Unpin,
{
    let Some(mut stream) = stream else {
        return String::new();
    };
    let mut buf = Vec::new();
    if let Err(err) = stream.read_to_end(&mut buf).await {
        warn!("error draining process stream: {}", err);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
