//! Request/response boundary consumed by the palette UI
//!
//! Mirrors the three channels the popover frontend uses: fetching the slash
//! command catalog, executing a command, and hiding the window. Requests are
//! `op`-tagged JSON objects; execution outcomes cross the boundary as
//! `{success, output?/error?}` payloads.

use crate::catalog::{CommandCatalog, SlashCommand};
use crate::error::Result;
use crate::executor::{CommandExecutor, ExecutionResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One request from the UI collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Request {
    /// Fetch the slash command catalog.
    GetClaudeCommands,
    /// Execute one command with free-text input.
    ExecuteClaudeCommand { command: String, input: String },
    /// Hide the popover window. The effect belongs to the UI host; the core
    /// only acknowledges it.
    HideWindow,
}

impl Request {
    /// Parse one JSON-encoded request.
    pub fn parse(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Wire form of an execution outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPayload {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultPayload {
    fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(message.into()),
        }
    }
}

impl From<ExecutionResult> for ResultPayload {
    fn from(result: ExecutionResult) -> Self {
        match result {
            ExecutionResult::Success { output } => Self {
                success: true,
                output: Some(output),
                error: None,
            },
            ExecutionResult::Failure { error } => Self::error(error),
        }
    }
}

/// Response to one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Commands(Vec<SlashCommand>),
    Result(ResultPayload),
    /// Serialized as JSON `null`.
    Ack,
}

/// Routes UI requests to the catalog builder and the executor.
///
/// The two components never call each other; the bridge is the only place
/// they meet.
pub struct PaletteBridge {
    catalog: CommandCatalog,
    executor: CommandExecutor,
}

impl PaletteBridge {
    pub fn new(catalog: CommandCatalog, executor: CommandExecutor) -> Self {
        Self { catalog, executor }
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    /// Handle one request.
    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::GetClaudeCommands => {
                Response::Commands(self.catalog.get_commands().await)
            }
            Request::ExecuteClaudeCommand { command, input } => {
                Response::Result(self.executor.execute(&command, &input).await.into())
            }
            Request::HideWindow => {
                debug!("hide-window acknowledged");
                Response::Ack
            }
        }
    }

    /// Handle one JSON request line, yielding a JSON response line.
    ///
    /// A malformed request produces a failure payload instead of tearing
    /// down the caller's loop.
    pub async fn handle_line(&self, line: &str) -> String {
        let response = match Request::parse(line) {
            Ok(request) => self.handle(request).await,
            Err(err) => Response::Result(ResultPayload::error(format!("invalid request: {}", err))),
        };
        encode(&response)
    }
}

fn encode(response: &Response) -> String {
    serde_json::to_string(response).unwrap_or_else(|err| {
        // Our response types always serialize; keep the loop alive anyway.
        debug!("response encoding failed: {}", err);
        r#"{"success":false,"error":"response encoding failed"}"#.to_string()
    })
}
