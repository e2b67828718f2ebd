use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::ShellConfig;
use crate::input::{BufReadSource, EditorSource, LineSource, LogicalLine, read_logical_line};
use crate::shell::{self, Pipeline, Session};

/// The read-execute loop: one logical line in, one pipeline run, until `exit` or end of input
pub struct Repl<S, W> {
    session: Session,
    source: S,
    out: W,
    interrupted: Option<Arc<AtomicBool>>,
}

impl<S: LineSource, W: Write> Repl<S, W> {
    pub fn new(session: Session, source: S, out: W) -> Self {
        Self {
            session,
            source,
            out,
            interrupted: None,
        }
    }

    /// Keep the shell alive on SIGINT; the flag only records that one arrived
    pub fn catch_interrupts(mut self) -> io::Result<Self> {
        let flag = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&flag))?;
        self.interrupted = Some(flag);
        Ok(self)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Main REPL loop
    ///
    /// Returns the status the shell process should exit with.
    pub fn run(&mut self) -> u8 {
        while !self.session.should_exit() {
            let line = match read_logical_line(&mut self.source) {
                Ok(LogicalLine::Line(line)) => line,
                Ok(LogicalLine::EndOfInput) => break,
                // Undecodable bytes were consumed; carry on with the next line
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    tracing::debug!(%err, "skipping unreadable line");
                    continue;
                }
                Err(err) => {
                    tracing::debug!(%err, "input failed, stopping");
                    break;
                }
            };

            // Failures escaping one line are swallowed so the shell stays usable
            if let Err(err) = self.run_line(&line) {
                tracing::debug!(%err, line, "line failed");
            }
        }
        self.session.exit_status()
    }

    /// Split and execute one logical line
    pub fn run_line(&mut self, line: &str) -> anyhow::Result<u8> {
        let pipeline = Pipeline::split(line);
        let status = shell::execute(&pipeline, &mut self.session, &mut self.out)?;
        if let Some(flag) = &self.interrupted
            && flag.swap(false, Ordering::Relaxed)
        {
            tracing::debug!("pipeline interrupted");
        }
        Ok(status)
    }
}

/// Build the REPL for this process and run it
///
/// Interactive sessions read through the line editor and survive Ctrl-C; otherwise stdin is read
/// line by line without prompts.
pub fn run(config: &ShellConfig) -> anyhow::Result<u8> {
    let session = Session::from_parent();
    let out = io::stdout();

    if config.interactive {
        let mut repl = Repl::new(session, EditorSource::new(config), out).catch_interrupts()?;
        Ok(repl.run())
    } else {
        let source = BufReadSource::new(io::stdin().lock());
        Ok(Repl::new(session, source, out).run())
    }
}
