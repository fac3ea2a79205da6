pub const APP_NAME: &str = "agent-state";

/// File holding the current state, relative to the scope directory.
pub const STATE_FILENAME: &str = ".agent-state.txt";

/// Append-only event log, relative to the scope directory.
pub const LOG_FILENAME: &str = ".agent-log.txt";

/// Environment variable naming the default scope directory.
pub const SCOPE_ENV: &str = "AGENT_STATE_DIR";
