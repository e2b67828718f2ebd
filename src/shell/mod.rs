pub mod builtins;
pub mod env;
pub mod error;
pub mod exec;

// Re-export commonly used types and functions
pub use builtins::Builtin;
pub use env::Environment;
pub use error::CommandError;
pub use exec::{Pipeline, Resolution, Stage, execute, resolve};

/// Prefix used on every diagnostic the shell prints
pub const SHELL_NAME: &str = "intek-sh";

/// Everything a REPL run mutates: the variable store, the exit request and the last status.
///
/// The working directory is not tracked here; `cd` changes the process CWD directly.
#[derive(Debug, Default)]
pub struct Session {
    pub env: Environment,
    exit_request: Option<u8>,
    last_status: u8,
}

impl Session {
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            exit_request: None,
            last_status: 0,
        }
    }

    /// Create a session whose environment is copied from the parent process
    pub fn from_parent() -> Self {
        Self::new(Environment::from_parent())
    }

    /// Ask the REPL to stop after the current pipeline with the given status
    pub fn request_exit(&mut self, status: u8) {
        self.exit_request = Some(status);
    }

    pub fn should_exit(&self) -> bool {
        self.exit_request.is_some()
    }

    pub fn last_status(&self) -> u8 {
        self.last_status
    }

    pub fn set_last_status(&mut self, status: u8) {
        self.last_status = status;
    }

    /// Status the shell process should exit with
    pub fn exit_status(&self) -> u8 {
        self.exit_request.unwrap_or(self.last_status)
    }
}
