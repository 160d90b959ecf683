pub mod keygen;
pub mod prove;
pub mod verify;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner for a long-running step, hidden in quiet and JSON modes
pub fn spinner(config: &crate::config::Config, message: &'static str) -> Result<Option<ProgressBar>> {
    if config.quiet || config.json_output {
        return Ok(None);
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg} ({elapsed})")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(Some(pb))
}
