//! Command line interface

use crate::launcher::{LaunchOutcome, Launcher};
use crate::shutdown::shutdown_signal;
use anyhow::Context;
use asset_relay_cache::{AssetCache, AssetRoot};
use asset_relay_conf::{ErrorMode, Settings};
use asset_relay_dispatcher::{Dispatcher, GrpcFetcher, HttpServer};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(name = "asset-relay")]
#[command(about = "Static asset delivery through an HTTP dispatcher and an RPC asset cache", long_about = None)]
#[command(version)]
pub struct Cli {
	/// TOML settings file
	#[arg(short, long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Verbosity level (can be repeated for more verbosity)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	pub verbosity: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run the asset cache RPC server
	Cache {
		/// Address to listen on
		#[arg(long, value_name = "ADDR")]
		listen: Option<SocketAddr>,

		/// Directory assets are served from
		#[arg(long, value_name = "DIR")]
		asset_root: Option<PathBuf>,
	},

	/// Run the HTTP dispatcher
	Dispatch {
		/// Address to listen on
		#[arg(long, value_name = "ADDR")]
		listen: Option<SocketAddr>,

		/// URL of the asset cache, e.g. http://127.0.0.1:7525
		#[arg(long, value_name = "URL")]
		cache_endpoint: Option<String>,

		/// Answer 500 for missing assets too
		#[arg(long)]
		legacy_errors: bool,
	},

	/// Run the asset cache and the dispatcher as child processes
	Launch {
		/// Working directory of both children
		#[arg(long, value_name = "DIR")]
		workdir: Option<PathBuf>,
	},
}

impl Commands {
	/// Writes command line flags over `settings`
	pub fn apply_overrides(&self, settings: &mut Settings) {
		match self {
			Commands::Cache { listen, asset_root } => {
				if let Some(listen) = listen {
					settings.cache.listen = *listen;
				}
				if let Some(asset_root) = asset_root {
					settings.cache.asset_root = asset_root.clone();
				}
			}
			Commands::Dispatch {
				listen,
				cache_endpoint,
				legacy_errors,
			} => {
				if let Some(listen) = listen {
					settings.dispatcher.listen = *listen;
				}
				if let Some(endpoint) = cache_endpoint {
					settings.dispatcher.cache_endpoint = endpoint.clone();
				}
				if *legacy_errors {
					settings.dispatcher.error_mode = ErrorMode::LegacyParity;
				}
			}
			Commands::Launch { .. } => {}
		}
	}
}

/// Resolves settings for `cli` and runs the selected command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
	let mut settings = Settings::load(cli.config.as_deref()).context("cannot load settings")?;
	cli.command.apply_overrides(&mut settings);
	settings.validate().context("invalid settings")?;

	match cli.command {
		Commands::Cache { .. } => run_cache(&settings).await,
		Commands::Dispatch { .. } => run_dispatcher(&settings).await,
		Commands::Launch { workdir } => run_launcher(cli.config, cli.verbosity, workdir).await,
	}
}

async fn run_cache(settings: &Settings) -> anyhow::Result<()> {
	let root = AssetRoot::new(&settings.cache.asset_root).with_context(|| {
		format!(
			"asset root {} is not a readable directory",
			settings.cache.asset_root.display()
		)
	})?;
	let cache = Arc::new(AssetCache::new(root));

	asset_relay_cache::serve_addr(cache.clone(), settings.cache.listen, shutdown_signal())
		.await
		.with_context(|| format!("asset cache failed on {}", settings.cache.listen))?;

	let stats = cache.statistics();
	tracing::info!(
		hits = stats.hits,
		misses = stats.misses,
		disk_reads = stats.disk_reads,
		entries = stats.entries,
		"asset cache statistics"
	);
	Ok(())
}

async fn run_dispatcher(settings: &Settings) -> anyhow::Result<()> {
	let dispatcher_settings = &settings.dispatcher;

	let mut fetcher = GrpcFetcher::new(dispatcher_settings.cache_endpoint.clone())
		.context("invalid cache endpoint")?;
	if let Some(timeout) = dispatcher_settings.connect_timeout() {
		fetcher = fetcher.with_connect_timeout(timeout);
	}
	if let Some(timeout) = dispatcher_settings.request_timeout() {
		fetcher = fetcher.with_request_timeout(timeout);
	}

	let dispatcher =
		Dispatcher::new(Arc::new(fetcher)).with_error_mode(dispatcher_settings.error_mode);
	let listener = TcpListener::bind(dispatcher_settings.listen)
		.await
		.with_context(|| format!("cannot bind {}", dispatcher_settings.listen))?;
	tracing::info!(
		cache_endpoint = %dispatcher_settings.cache_endpoint,
		error_mode = %dispatcher_settings.error_mode,
		"dispatcher configured"
	);

	HttpServer::new(Arc::new(dispatcher))
		.listen_with_shutdown(listener, shutdown_signal())
		.await
		.context("dispatcher failed")?;
	Ok(())
}

async fn run_launcher(
	config: Option<PathBuf>,
	verbosity: u8,
	workdir: Option<PathBuf>,
) -> anyhow::Result<()> {
	let mut launcher = Launcher::for_current_exe(config.as_deref(), verbosity)?;
	if let Some(workdir) = workdir {
		launcher = launcher.with_workdir(workdir);
	}

	match launcher.run(shutdown_signal()).await? {
		LaunchOutcome::Shutdown => Ok(()),
		LaunchOutcome::Exited { name, status } => {
			anyhow::bail!("{} exited unexpectedly ({})", name, status)
		}
	}
}
