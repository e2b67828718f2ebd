use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::libc;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, execve, fork, pipe2};
use std::ffi::CString;
use std::fs::File;
use std::io::Read;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::path::Path;

use super::super::env::Environment;
use super::super::error::CommandError;

/// A spawned external program that has not been reaped yet
#[derive(Debug)]
pub struct ProcessHandle {
    pid: Pid,
    command: String,
}

impl ProcessHandle {
    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Block until the process terminates and return its exit status
    ///
    /// A process killed by a signal reports 128 + the signal number.
    pub fn wait(self) -> Result<u8, CommandError> {
        let status = wait_for_child(self.pid)?;
        tracing::debug!(pid = %self.pid, command = %self.command, status, "reaped");
        Ok(status)
    }
}

/// Wait for a child and convert its status to a shell exit status
fn wait_for_child(child: Pid) -> Result<u8, CommandError> {
    loop {
        match waitpid(child, None) {
            Ok(WaitStatus::Exited(_pid, exit_code)) => return Ok(exit_code as u8),
            Ok(WaitStatus::Signaled(_pid, signal, _core_dump)) => {
                return Ok(128u8.wrapping_add(signal as i32 as u8));
            }
            // Stop/continue notifications are not requested, but keep waiting if one shows up
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(errno) => return Err(CommandError::Wait(errno)),
        }
    }
}

/// Spawn `program` with the given argv tail, stdin and stdout.
///
/// `command` is the name as the user typed it; it becomes argv[0] and is used in diagnostics.
/// `stdin`/`stdout` of `None` inherit the shell's descriptors. Both are consumed: the parent's
/// copies are closed as soon as the child has been forked, so a pipe's write end only stays
/// open in the process that writes to it.
///
/// Returns once the child has successfully exec'd; exec failures come back as errors.
pub fn launch(
    program: &Path,
    command: &str,
    args: &[String],
    env: &Environment,
    stdin: Option<OwnedFd>,
    stdout: Option<OwnedFd>,
) -> Result<ProcessHandle, CommandError> {
    // Everything the child needs is built before fork so the child never allocates
    let invalid = || CommandError::InvalidArgument(command.to_string());
    let prog_cstr = CString::new(program.as_os_str().as_encoded_bytes()).map_err(|_| invalid())?;
    let mut argv: Vec<CString> = Vec::with_capacity(args.len() + 1);
    argv.push(CString::new(command).map_err(|_| invalid())?);
    for arg in args {
        argv.push(CString::new(arg.as_str()).map_err(|_| invalid())?);
    }
    let envp = env.to_envp();

    // The child writes its errno here if execve fails; a successful exec closes it
    let (status_read, status_write) = pipe2(OFlag::O_CLOEXEC).map_err(CommandError::Pipe)?;

    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => {
            drop(status_write);
            drop(stdin);
            drop(stdout);

            match read_exec_errno(status_read) {
                None => {
                    tracing::debug!(pid = %child, command, program = %program.display(), "launched");
                    Ok(ProcessHandle {
                        pid: child,
                        command: command.to_string(),
                    })
                }
                Some(errno) => {
                    // The child has already exited; reap it before reporting
                    let _ = wait_for_child(child);
                    tracing::debug!(command, %errno, "exec failed");
                    Err(CommandError::from_exec_errno(command, errno))
                }
            }
        }
        Ok(ForkResult::Child) => {
            drop(status_read);
            if let Some(fd) = &stdin {
                redirect(fd.as_raw_fd(), libc::STDIN_FILENO);
            }
            if let Some(fd) = &stdout {
                redirect(fd.as_raw_fd(), libc::STDOUT_FILENO);
            }

            // Rust ignores SIGPIPE and the shell catches SIGINT; children get the defaults
            unsafe {
                libc::signal(libc::SIGPIPE, libc::SIG_DFL);
                libc::signal(libc::SIGINT, libc::SIG_DFL);
            }

            let errno = match execve(&prog_cstr, &argv, &envp) {
                Err(errno) => errno,
                Ok(never) => match never {},
            };
            let bytes = (errno as i32).to_ne_bytes();
            unsafe {
                libc::write(
                    status_write.as_raw_fd(),
                    bytes.as_ptr().cast(),
                    bytes.len(),
                );
                libc::_exit(127)
            }
        }
        Err(errno) => Err(CommandError::Fork(errno)),
    }
}

/// Point `target` at `fd`, leaving it open across exec
fn redirect(fd: RawFd, target: RawFd) {
    unsafe {
        if fd == target {
            // dup2 onto itself keeps FD_CLOEXEC, so clear it by hand
            libc::fcntl(fd, libc::F_SETFD, 0);
        } else {
            libc::dup2(fd, target);
        }
    }
}

/// Read the errno a failed child reported, or None if exec succeeded
fn read_exec_errno(status_read: OwnedFd) -> Option<Errno> {
    let mut buf = Vec::with_capacity(4);
    if let Err(err) = File::from(status_read).read_to_end(&mut buf) {
        tracing::warn!(%err, "could not read exec status");
        return None;
    }
    let bytes: [u8; 4] = buf.get(..4)?.try_into().ok()?;
    Some(Errno::from_raw(i32::from_ne_bytes(bytes)))
}
