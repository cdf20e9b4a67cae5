//! `profiledir` command-line entry point.
//!
//! Every command is routed through the same request handler the REST surface
//! uses, then printed as `<status>` followed by the pretty JSON body.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use log::info;
use profiledir_api::ProfileApi;
use profiledir_core::init_logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the response status was 2xx.
fn run(cli: &Cli) -> Result<bool> {
    let config = cli.config();
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, &log_dir.to_string_lossy())
            .map_err(anyhow::Error::msg)
            .context("failed to initialize logging")?;
    }

    let request = cli.command.to_request()?;
    let mut api = ProfileApi::open(&config).with_context(|| {
        format!(
            "failed to open profile database `{}`",
            config.db_path.display()
        )
    })?;

    let response = api.handle(&request);
    info!(
        "event=cli_command module=cli status=ok command={} http_status={}",
        cli.command.name(),
        response.status
    );

    println!("{}", response.status);
    println!(
        "{}",
        serde_json::to_string_pretty(&response.body).context("failed to render response")?
    );
    Ok(response.is_success())
}
