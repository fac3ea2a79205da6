use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::store::StoreError;

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// A JSON-RPC request or notification. Notifications carry no `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
  pub jsonrpc: String,
  pub method: String,
  #[serde(default)]
  pub params: Option<Value>,
  /// `None` only when the member is absent; `"id": null` is `Some(Value::Null)`.
  #[serde(default, deserialize_with = "present")]
  pub id: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
  Value::deserialize(deserializer).map(Some)
}

impl Request {
  pub fn is_notification(&self) -> bool {
    self.id.is_none()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
  pub code: i64,
  pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
  pub jsonrpc: String,
  pub id: Value,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub result: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<RpcError>,
}

impl Response {
  pub fn success(id: Value, result: Value) -> Self {
    Self {
      jsonrpc: JSONRPC_VERSION.to_string(),
      id,
      result: Some(result),
      error: None,
    }
  }

  pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
    Self {
      jsonrpc: JSONRPC_VERSION.to_string(),
      id,
      result: None,
      error: Some(RpcError {
        code,
        message: message.into(),
      }),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
  Text { text: String },
}

/// Result payload of `tools/call`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
  pub content: Vec<Content>,
  #[serde(rename = "isError")]
  pub is_error: bool,
}

impl ToolResult {
  pub fn text(text: impl Into<String>) -> Self {
    Self {
      content: vec![Content::Text { text: text.into() }],
      is_error: false,
    }
  }

  pub fn empty() -> Self {
    Self {
      content: Vec::new(),
      is_error: false,
    }
  }

  pub fn error(err: &ToolError) -> Self {
    Self {
      content: vec![Content::Text {
        text: format!("{}: {}", err.code(), err),
      }],
      is_error: true,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct CallParams {
  pub name: String,
  #[serde(default)]
  pub arguments: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStateArgs {
  pub directory: Option<PathBuf>,
  pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct LoadStateArgs {
  pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct LogEventArgs {
  pub directory: Option<PathBuf>,
  pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoadLogArgs {
  pub directory: Option<PathBuf>,
  /// Wide enough for any JSON integer a client sends, `u64::MAX` included.
  pub num_chars: i128,
}

/// Failure of a single tool call, reported in-band with `isError: true`.
#[derive(Debug, Error)]
pub enum ToolError {
  #[error(transparent)]
  Store(#[from] StoreError),

  #[error("invalid arguments for {tool}: {source}")]
  Arguments {
    tool: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("unknown tool: {0}")]
  UnknownTool(String),
}

impl ToolError {
  pub fn code(&self) -> &'static str {
    match self {
      ToolError::Store(e) => e.kind().as_str(),
      ToolError::Arguments { .. } => "invalid_argument",
      ToolError::UnknownTool(_) => "unknown_tool",
    }
  }
}
