mod log;
mod serve;
mod state;

pub use log::{cmd_load_log, cmd_log_event};
pub use serve::cmd_serve;
pub use state::{cmd_load_state, cmd_update_state};
