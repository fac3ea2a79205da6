//! Model Context Protocol adapter.
//!
//! Maps newline-delimited JSON-RPC 2.0 messages onto a [`StateStore`]. This
//! module does no I/O of its own; the binary owns the stdio loop and feeds
//! each line to [`McpServer::handle_line`].

mod types;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::consts::{APP_NAME, LOG_FILENAME, STATE_FILENAME};
use crate::settings::Settings;
use crate::store::{StateStore, StoreError, saturating_num_chars};

pub use types::*;

/// Protocol version answered when the client does not ask for one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

pub fn instructions() -> String {
  format!(
    "State and log management for long-lived agents that may be interrupted so that a later \
     agent can resume the work.

Every tool takes an optional `directory`: the absolute path to your worktree or repository. \
When omitted, the server's default directory is used.

State: what the agent is currently trying to do. Replace it as you make progress.
Log: an append-only history of what the agent has done.

Tools:
- update_state(directory, state): save (replace) the current state
- load_state(directory): load the saved state
- log_event(directory, message): append an event to the log
- load_log(directory, num_chars): load the last num_chars characters of the log

Files saved in the directory: {STATE_FILENAME} (state), {LOG_FILENAME} (log)

Example: update_state(\"/path/to/worktree\", \"Working on feature X\")"
  )
}

fn directory_schema() -> Value {
  json!({
    "type": "string",
    "description": "Absolute path to the worktree or repository directory"
  })
}

pub fn tool_definitions() -> Value {
  json!([
    {
      "name": "update_state",
      "description": "Update the agent state file, replacing its contents.",
      "inputSchema": {
        "type": "object",
        "properties": {
          "directory": directory_schema(),
          "state": { "type": "string", "description": "What the agent is currently trying to do" }
        },
        "required": ["state"]
      }
    },
    {
      "name": "load_state",
      "description": "Load the current agent state, or an empty string if none was saved.",
      "inputSchema": {
        "type": "object",
        "properties": { "directory": directory_schema() }
      }
    },
    {
      "name": "log_event",
      "description": "Append an event message to the log file.",
      "inputSchema": {
        "type": "object",
        "properties": {
          "directory": directory_schema(),
          "message": { "type": "string", "description": "The event message to append" }
        },
        "required": ["message"]
      }
    },
    {
      "name": "load_log",
      "description": "Load the last num_chars characters from the log file, or the whole log if it is shorter.",
      "inputSchema": {
        "type": "object",
        "properties": {
          "directory": directory_schema(),
          "num_chars": { "type": "integer", "minimum": 0, "description": "Number of characters to return from the end of the log" }
        },
        "required": ["num_chars"]
      }
    }
  ])
}

/// Dispatches MCP requests to a store.
pub struct McpServer<S> {
  store: S,
  settings: Settings,
}

impl<S: StateStore> McpServer<S> {
  pub fn new(store: S, settings: Settings) -> Self {
    Self { store, settings }
  }

  /// Handle one line of input. Returns `None` when no reply is due.
  pub fn handle_line(&self, line: &str) -> Option<Response> {
    let line = line.trim();
    if line.is_empty() {
      return None;
    }

    let value: Value = match serde_json::from_str(line) {
      Ok(value) => value,
      Err(e) => {
        warn!(error = %e, "unparseable message");
        return Some(Response::failure(Value::Null, PARSE_ERROR, format!("Parse error: {}", e)));
      }
    };

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    match serde_json::from_value::<Request>(value) {
      Ok(request) => self.handle(request),
      Err(e) => Some(Response::failure(id, INVALID_REQUEST, format!("Invalid request: {}", e))),
    }
  }

  pub fn handle(&self, request: Request) -> Option<Response> {
    debug!(method = %request.method, "handling request");

    if request.is_notification() {
      return None;
    }
    let id = request.id.unwrap_or(Value::Null);
    if request.jsonrpc != JSONRPC_VERSION {
      return Some(Response::failure(
        id,
        INVALID_REQUEST,
        format!("Invalid request: unsupported jsonrpc version {:?}", request.jsonrpc),
      ));
    }

    let response = match request.method.as_str() {
      "initialize" => Response::success(id, self.initialize(request.params.as_ref())),
      "ping" => Response::success(id, json!({})),
      "tools/list" => Response::success(id, json!({ "tools": tool_definitions() })),
      "tools/call" => match request.params.map(serde_json::from_value::<CallParams>) {
        Some(Ok(params)) => {
          let result = self.call_tool(&params.name, params.arguments.unwrap_or_else(|| json!({})));
          match serde_json::to_value(result) {
            Ok(result) => Response::success(id, result),
            Err(e) => Response::failure(id, INVALID_PARAMS, e.to_string()),
          }
        }
        Some(Err(e)) => Response::failure(id, INVALID_PARAMS, format!("Invalid params: {}", e)),
        None => Response::failure(id, INVALID_PARAMS, "Invalid params: missing tool name"),
      },
      other => Response::failure(id, METHOD_NOT_FOUND, format!("Method not found: {}", other)),
    };

    Some(response)
  }

  fn initialize(&self, params: Option<&Value>) -> Value {
    let protocol_version = params
      .and_then(|p| p.get("protocolVersion"))
      .and_then(Value::as_str)
      .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    json!({
      "protocolVersion": protocol_version,
      "capabilities": { "tools": { "listChanged": false } },
      "serverInfo": {
        "name": APP_NAME,
        "version": env!("CARGO_PKG_VERSION")
      },
      "instructions": instructions()
    })
  }

  /// Run a tool by name. Failures are returned in-band, never as protocol errors.
  pub fn call_tool(&self, name: &str, arguments: Value) -> ToolResult {
    match self.dispatch(name, arguments) {
      Ok(result) => result,
      Err(e) => {
        debug!(tool = name, error = %e, "tool call failed");
        ToolResult::error(&e)
      }
    }
  }

  fn dispatch(&self, name: &str, arguments: Value) -> Result<ToolResult, ToolError> {
    match name {
      "update_state" => {
        let args: UpdateStateArgs = parse_args(name, arguments)?;
        self.store.update_state(&self.scope(args.directory)?, &args.state)?;
        Ok(ToolResult::empty())
      }
      "load_state" => {
        let args: LoadStateArgs = parse_args(name, arguments)?;
        let state = self.store.load_state(&self.scope(args.directory)?)?;
        Ok(ToolResult::text(state))
      }
      "log_event" => {
        let args: LogEventArgs = parse_args(name, arguments)?;
        self.store.log_event(&self.scope(args.directory)?, &args.message)?;
        Ok(ToolResult::empty())
      }
      "load_log" => {
        let args: LoadLogArgs = parse_args(name, arguments)?;
        let num_chars = saturating_num_chars(args.num_chars);
        let log = self.store.load_log(&self.scope(args.directory)?, num_chars)?;
        Ok(ToolResult::text(log))
      }
      other => Err(ToolError::UnknownTool(other.to_string())),
    }
  }

  fn scope(&self, directory: Option<PathBuf>) -> Result<PathBuf, StoreError> {
    match directory {
      Some(dir) => Ok(dir),
      None => self.settings.default_scope(),
    }
  }
}

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
  serde_json::from_value(arguments).map_err(|source| ToolError::Arguments {
    tool: tool.to_string(),
    source,
  })
}
