use nix::errno::Errno;
use std::io::{self, Write};
use thiserror::Error;

use super::SHELL_NAME;

/// Failures a single command can run into. None of them terminate the shell: each one is
/// printed as `intek-sh: <message>` and the REPL moves on.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Command not found in PATH, or a direct path that does not exist
    #[error("{0}: command not found")]
    NotFound(String),
    /// File exists but cannot be executed
    #[error("{0}: Permission denied")]
    PermissionDenied(String),
    /// execve failed for some other reason (ENOEXEC, E2BIG, ...)
    #[error("{command}: {}", .errno.desc())]
    Exec { command: String, errno: Errno },
    /// A NUL byte in the program path or one of its arguments
    #[error("{0}: argument contains a NUL byte")]
    InvalidArgument(String),
    #[error("fork: {}", .0.desc())]
    Fork(Errno),
    #[error("pipe: {}", .0.desc())]
    Pipe(Errno),
    #[error("wait: {}", .0.desc())]
    Wait(Errno),
    #[error("cd: HOME not set")]
    HomeNotSet,
    #[error("cd: {dir}: {}", .errno.desc())]
    ChangeDir { dir: String, errno: Errno },
    #[error("exit:")]
    ExitNumericArgument,
}

impl CommandError {
    /// Map an `execve` errno to the error reported for `command`
    pub fn from_exec_errno(command: &str, errno: Errno) -> Self {
        match errno {
            Errno::EACCES => CommandError::PermissionDenied(command.to_string()),
            Errno::ENOENT | Errno::ENOTDIR => CommandError::NotFound(command.to_string()),
            errno => CommandError::Exec {
                command: command.to_string(),
                errno,
            },
        }
    }

    /// Get the appropriate exit code for this error type
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandError::NotFound(_) => 127,
            CommandError::PermissionDenied(_) | CommandError::Exec { .. } => 126,
            CommandError::ExitNumericArgument => 2,
            _ => 1,
        }
    }

    /// Print the error with the shell prefix
    pub fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}: {}", SHELL_NAME, self)
    }
}
