//! `intek-sh`: a small interactive shell.
//!
//! Lines are read through [`input`], split into a [`shell::Pipeline`], and executed by
//! [`shell::execute`], which runs builtins in-process and forks/execs everything else with pipes
//! between the stages. [`repl::Repl`] ties the pieces together.

pub mod config;
pub mod input;
pub mod logging;
pub mod repl;
pub mod shell;

pub use config::ShellConfig;
pub use repl::Repl;
