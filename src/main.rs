use anyhow::Result;

use intek_sh::{ShellConfig, logging, repl};

fn main() -> Result<()> {
    logging::init();

    let config = ShellConfig::detect();
    tracing::debug!(?config, "starting");

    // The editor restores the terminal when the REPL is dropped inside `run`
    let status = repl::run(&config)?;
    std::process::exit(i32::from(status));
}
