//! # asset-relay
//!
//! Static asset delivery split into two processes:
//!
//! - the **asset cache** owns a directory of files and answers
//!   `GetStaticFile(key)` over RPC, keeping file contents in memory for as
//!   long as the file's modification time is unchanged;
//! - the **dispatcher** answers HTTP requests by asking the asset cache for
//!   the key named by the request path.
//!
//! The `asset-relay` binary runs either one, or launches both as child
//! processes.
//!
//! ## Example
//!
//! ```no_run
//! use asset_relay::{AssetCache, AssetRoot, Dispatcher, GrpcFetcher, HttpServer};
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let cache = Arc::new(AssetCache::new(AssetRoot::new("static")?));
//! let cache_listener = TcpListener::bind("127.0.0.1:7525").await?;
//! tokio::spawn(asset_relay::cache::serve(
//! 	cache,
//! 	cache_listener,
//! 	std::future::pending(),
//! ));
//!
//! let fetcher = GrpcFetcher::new("http://127.0.0.1:7525")?;
//! let dispatcher = Dispatcher::new(Arc::new(fetcher));
//! let listener = TcpListener::bind("0.0.0.0:8000").await?;
//! HttpServer::new(Arc::new(dispatcher)).listen(listener).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod launcher;
pub mod logging;
pub mod shutdown;

pub use asset_relay_cache as cache;
pub use asset_relay_conf as conf;
pub use asset_relay_dispatcher as dispatcher;
pub use asset_relay_rpc as rpc;

pub use asset_relay_cache::{AssetCache, AssetRoot, CacheEntry, CacheStatistics};
pub use asset_relay_conf::{ErrorMode, Settings};
pub use asset_relay_dispatcher::{AssetFetcher, Dispatcher, GrpcFetcher, HttpServer};
pub use asset_relay_rpc::{AssetError, AssetResult};
pub use launcher::{Component, LaunchOutcome, Launcher};
