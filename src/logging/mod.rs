//! Logging infrastructure for console and file output.

mod subscriber;
mod utils;

pub use subscriber::{DRY_RUN_TARGET, LogSettings, STAGE_TARGET, init_subscriber};
pub use utils::{LOGS_DIR, prune_logs};
