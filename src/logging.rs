//! Log output for the `asset-relay` binary

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the `-v` count picks the level:
/// none is `info`, one is `debug`, more is `trace`. Calling this twice keeps
/// the first subscriber.
pub fn init(verbosity: u8) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.try_init();
}

fn default_directive(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "info",
		1 => "debug",
		_ => "trace",
	}
}
