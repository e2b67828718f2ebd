mod launch;
mod pipeline;
mod resolution;
mod types;

use std::io::{self, Write};

// Re-export public types
pub use launch::{ProcessHandle, launch};
pub use resolution::resolve;
pub use types::{Pipeline, Resolution, Stage};

use super::Session;
use pipeline::run_pipeline;

/// Public interface: execute one input line's pipeline against the session
///
/// Returns the pipeline's exit status, which is also stored as the session's last status.
/// Errors are limited to failures writing to `out`; command failures are reported on it.
pub fn execute(pipeline: &Pipeline, session: &mut Session, out: &mut dyn Write) -> io::Result<u8> {
    tracing::trace!(?pipeline, "executing");
    let status = run_pipeline(pipeline, session, out)?;
    out.flush()?;
    Ok(status)
}
