use std::io::{self, Write};

use nix::unistd::chdir;

use super::Session;
use super::error::CommandError;

/// Commands implemented inside the shell process.
///
/// These must never be forked: `cd`, `export`, `unset` and `exit` only make sense if their effect
/// outlives the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Printenv,
    Export,
    Unset,
    Exit,
}

impl Builtin {
    /// Get a builtin by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cd" => Some(Builtin::Cd),
            "printenv" => Some(Builtin::Printenv),
            "export" => Some(Builtin::Export),
            "unset" => Some(Builtin::Unset),
            "exit" => Some(Builtin::Exit),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Cd => "cd",
            Builtin::Printenv => "printenv",
            Builtin::Export => "export",
            Builtin::Unset => "unset",
            Builtin::Exit => "exit",
        }
    }

    /// Run the builtin against the session, writing output and diagnostics to `out`.
    ///
    /// Returns the command's exit status. Only failures to write to `out` are errors.
    pub fn run(self, args: &[String], session: &mut Session, out: &mut dyn Write) -> io::Result<u8> {
        tracing::debug!(builtin = self.name(), ?args, "running builtin");
        match self {
            Builtin::Cd => cd(args, session, out),
            Builtin::Printenv => printenv(args, session, out),
            Builtin::Export => Ok(export(args, session)),
            Builtin::Unset => Ok(unset(args, session)),
            Builtin::Exit => exit(args, session, out),
        }
    }
}

/// Change the current working directory
///
/// Args:
///   - [] -> change to HOME
///   - [path, ...] -> change to path, extra arguments are ignored
fn cd(args: &[String], session: &mut Session, out: &mut dyn Write) -> io::Result<u8> {
    let target = match args.first() {
        Some(dir) => dir.as_str(),
        None => match session.env.get("HOME") {
            Some(home) => home,
            None => return fail(CommandError::HomeNotSet, out),
        },
    };

    match chdir(target) {
        Ok(()) => Ok(0),
        Err(errno) => fail(
            CommandError::ChangeDir {
                dir: target.to_string(),
                errno,
            },
            out,
        ),
    }
}

/// Print environment variables
///
/// Args:
///   - [] -> every variable as KEY=VALUE, in insertion order
///   - [name, ...] -> the value of each name that exists; missing names print nothing
fn printenv(args: &[String], session: &Session, out: &mut dyn Write) -> io::Result<u8> {
    if args.is_empty() {
        for (key, value) in session.env.iter() {
            writeln!(out, "{}={}", key, value)?;
        }
        return Ok(0);
    }

    let mut all_found = true;
    for name in args {
        match session.env.get(name) {
            Some(value) => writeln!(out, "{}", value)?,
            None => all_found = false,
        }
    }
    Ok(if all_found { 0 } else { 1 })
}

/// Set variables: `NAME=VALUE` splits on the first `=`, a bare `NAME` sets an empty value
fn export(args: &[String], session: &mut Session) -> u8 {
    for arg in args {
        let (name, value) = arg.split_once('=').unwrap_or((arg.as_str(), ""));
        if name.is_empty() {
            tracing::debug!(arg, "ignoring export with empty name");
            continue;
        }
        session.env.set(name, value);
    }
    0
}

/// Remove variables; names that are not set are ignored
fn unset(args: &[String], session: &mut Session) -> u8 {
    for name in args {
        session.env.unset(name);
    }
    0
}

/// Exit the shell
///
/// Args:
///   - [] -> exit with the last command's status
///   - [code] -> exit with code (mod 256); a non-numeric code prints a diagnostic and exits 2
fn exit(args: &[String], session: &mut Session, out: &mut dyn Write) -> io::Result<u8> {
    let parsed = match args {
        [code] => parse_exit_code(code).ok_or(CommandError::ExitNumericArgument),
        [code, ..] => Ok(parse_exit_code(code).unwrap_or(session.last_status())),
        [] => Ok(session.last_status()),
    };
    let status = match &parsed {
        Ok(status) => *status,
        Err(err) => err.exit_code(),
    };
    // The shell terminates even if the farewell cannot be written
    session.request_exit(status);

    writeln!(out, "exit")?;
    if let Err(err) = parsed {
        err.report(out)?;
    }
    Ok(status)
}

/// Parse a non-negative integer literal, wrapping it into the 0..=255 exit status range
fn parse_exit_code(code: &str) -> Option<u8> {
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let status = code
        .bytes()
        .fold(0u32, |acc, digit| (acc * 10 + u32::from(digit - b'0')) % 256);
    u8::try_from(status).ok()
}

fn fail(err: CommandError, out: &mut dyn Write) -> io::Result<u8> {
    err.report(out)?;
    Ok(err.exit_code())
}
