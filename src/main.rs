//! asset-relay - static asset delivery
//!
//! Runs the asset cache, the dispatcher, or both as supervised children.

use asset_relay::cli::{self, Cli};
use asset_relay::logging;
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
	let cli = Cli::parse();
	logging::init(cli.verbosity);

	match cli::run(cli).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			tracing::error!("{:#}", err);
			ExitCode::FAILURE
		}
	}
}
