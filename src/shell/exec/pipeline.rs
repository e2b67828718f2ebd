use nix::fcntl::OFlag;
use nix::unistd::pipe2;
use std::io::{self, Write};
use std::os::fd::OwnedFd;

use super::super::Session;
use super::super::error::CommandError;
use super::launch::{ProcessHandle, launch};
use super::resolution::resolve;
use super::types::{Pipeline, Resolution, Stage};

/// Run every stage of a pipeline and wait for all of them.
///
/// Stage i reads from the pipe fed by stage i-1 (the shell's stdin for the first stage) and
/// writes to a fresh pipe read by stage i+1 (the shell's stdout for the last stage). Every stage
/// is launched before any is waited on.
///
/// Builtins run in the shell process wherever they appear and write to `out`; they neither read
/// from nor write into their pipes, so the next stage just sees end of input.
///
/// Per-stage failures are reported on `out` and do not stop the remaining stages. The returned
/// status is the last stage's.
pub fn run_pipeline(
    pipeline: &Pipeline,
    session: &mut Session,
    out: &mut dyn Write,
) -> io::Result<u8> {
    let stages: Vec<&Stage> = pipeline.runnable().collect();
    let mut handles: Vec<ProcessHandle> = Vec::with_capacity(stages.len());
    let mut last_status = session.last_status();
    // Position in `handles` of the final stage, if it was launched as a process
    let mut final_handle: Option<usize> = None;
    let mut upstream: Option<OwnedFd> = None;

    for (i, stage) in stages.iter().enumerate() {
        let is_last = i + 1 == stages.len();
        let (downstream, stdout) = if is_last {
            (None, None)
        } else {
            match pipe2(OFlag::O_CLOEXEC) {
                Ok((read, write)) => (Some(read), Some(write)),
                Err(errno) => {
                    let err = CommandError::Pipe(errno);
                    err.report(out)?;
                    last_status = err.exit_code();
                    break;
                }
            }
        };
        let stdin = upstream.take();

        // Child output lands on fd 1 directly, so anything buffered must go out first
        if let Err(err) = out.flush() {
            tracing::debug!(%err, "could not flush shell output");
        }

        last_status = match resolve(&stage.command, &session.env) {
            Resolution::Builtin(builtin) => {
                drop(stdin);
                drop(stdout);
                builtin.run(&stage.args, session, out)?
            }
            Resolution::External(program) => {
                match launch(&program, &stage.command, &stage.args, &session.env, stdin, stdout) {
                    Ok(handle) => {
                        if is_last {
                            final_handle = Some(handles.len());
                        }
                        handles.push(handle);
                        0
                    }
                    Err(err) => {
                        err.report(out)?;
                        err.exit_code()
                    }
                }
            }
            Resolution::NotFound => {
                let err = CommandError::NotFound(stage.command.clone());
                err.report(out)?;
                err.exit_code()
            }
        };
        upstream = downstream;
    }
    drop(upstream);

    for (position, handle) in handles.into_iter().enumerate() {
        let is_final = final_handle == Some(position);
        match handle.wait() {
            Ok(status) if is_final => last_status = status,
            Ok(_) => {}
            Err(err) => {
                err.report(out)?;
                if is_final {
                    last_status = err.exit_code();
                }
            }
        }
    }

    session.set_last_status(last_status);
    Ok(last_status)
}
