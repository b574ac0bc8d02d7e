//! # asset-relay dispatcher
//!
//! The front end of asset-relay. Accepts HTTP requests, treats the request
//! path as an asset key and makes one `GetStaticFile` call to the asset cache
//! per request.
//!
//! ```text
//! GET /<key> → Dispatcher → GetStaticFile(key) → asset cache
//!                  ↓
//!   200 + bytes | 404 (missing, unless legacy parity) | 500
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use asset_relay_dispatcher::{Dispatcher, GrpcFetcher, HttpServer};
//! use std::sync::Arc;
//!
//! let fetcher = GrpcFetcher::new("http://127.0.0.1:7525")?;
//! let dispatcher = Dispatcher::new(Arc::new(fetcher));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! HttpServer::new(Arc::new(dispatcher)).listen(listener).await?;
//! ```

pub mod dispatcher;
pub mod fetcher;
pub mod key;
pub mod server;

pub use asset_relay_conf::ErrorMode;
pub use dispatcher::{Dispatcher, NOT_FOUND_BODY, SERVER_ERROR_BODY};
pub use fetcher::{AssetFetcher, GrpcFetcher};
pub use key::asset_key;
pub use server::HttpServer;
