//! happyart-admin: terminal front end for the Happy Art Town admin console.
//! Command output is JSON on stdout; toasts, banners and logs go to stderr.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod ctx;
mod handlers;
mod io;
mod print;

#[cfg(test)]
mod tests;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use happyart::application::error::ErrorReport;
use happyart::{config, infra::telemetry};

use args::{Cli, Commands};
use ctx::{CliError, Ctx, TerminalConfirm};
use handlers::{auth, content, settings, status};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", ErrorReport::from_error("happyart-admin", &err).render());
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = config::load(&cli.config)?;
    telemetry::init(&settings.logging)?;
    let ctx = Ctx::new(settings, Arc::new(TerminalConfirm::new(cli.yes)));

    match cli.command {
        Commands::Auth(cmd) => auth::handle(&ctx, cmd.action).await,
        Commands::Courses(cmd) => content::handle_courses(&ctx, cmd.action).await,
        Commands::Articles(cmd) => content::handle_articles(&ctx, cmd.action).await,
        Commands::Settings(cmd) => settings::handle(&ctx, cmd.action).await,
        Commands::Stats => status::stats(&ctx).await,
        Commands::Status => status::status(&ctx).await,
    }
}
