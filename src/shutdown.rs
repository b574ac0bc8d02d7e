//! Process shutdown signal

/// Resolves on Ctrl-C, or on SIGTERM on Unix.
///
/// If a handler cannot be installed the corresponding branch never fires;
/// the process then only stops by being killed.
pub async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(err) = tokio::signal::ctrl_c().await {
			tracing::warn!(error = %err, "cannot listen for Ctrl-C");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(err) => {
				tracing::warn!(error = %err, "cannot listen for SIGTERM");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => tracing::info!("Ctrl-C received"),
		_ = terminate => tracing::info!("SIGTERM received"),
	}
}
