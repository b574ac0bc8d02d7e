//! Server loop for the asset cache

use crate::cache::AssetCache;
use crate::service::CacheService;
use asset_relay_rpc::AssetCacheServer;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;

#[derive(Debug, Error)]
pub enum ServerError {
	#[error("Bind error: {0}")]
	Io(#[from] io::Error),

	#[error("Transport error: {0}")]
	Transport(#[from] tonic::transport::Error),
}

/// Serves `cache` on an already bound listener until `shutdown` resolves.
///
/// Each accepted connection is driven on its own task; a failing call only
/// fails that call.
pub async fn serve<F>(
	cache: Arc<AssetCache>,
	listener: TcpListener,
	shutdown: F,
) -> Result<(), ServerError>
where
	F: Future<Output = ()> + Send,
{
	let addr = listener.local_addr()?;
	tracing::info!(
		%addr,
		root = %cache.root().path().display(),
		"asset cache listening"
	);

	tonic::transport::Server::builder()
		.add_service(AssetCacheServer::new(CacheService::new(cache)))
		.serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
		.await?;

	tracing::info!(%addr, "asset cache stopped");
	Ok(())
}

/// Binds `addr` and serves `cache` until `shutdown` resolves
pub async fn serve_addr<F>(
	cache: Arc<AssetCache>,
	addr: SocketAddr,
	shutdown: F,
) -> Result<(), ServerError>
where
	F: Future<Output = ()> + Send,
{
	let listener = TcpListener::bind(addr).await?;
	serve(cache, listener, shutdown).await
}
