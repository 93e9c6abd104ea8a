//! CLI for kafkacli
//!
//! Subcommands:
//! - `topic list|create|delete|read`: administer and tail topics
//! - `connection get|set`: inspect or change the settings file

use std::io;
use std::process::ExitCode;

use clap::Parser;
use kafkacli::client::KafkaClient;
use kafkacli::commands::{Cli, Dispatcher};
use kafkacli::utils::logging;
use tracing::error;

fn main() -> ExitCode {
    // a missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let dispatcher = Dispatcher::new(&cli.settings, KafkaClient::connect);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match dispatcher.run(cli.command, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
