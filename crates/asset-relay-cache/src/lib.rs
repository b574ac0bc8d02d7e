//! # asset-relay cache
//!
//! The back end of asset-relay: owns the asset directory and answers
//! `GetStaticFile` calls from an in-memory cache that is kept coherent with
//! the files' modification times.
//!
//! ## Validation
//!
//! For every request the file is stat'ed first. The cached bytes are
//! returned only if the entry's recorded modification time equals the one on
//! disk; any difference, in either direction, triggers a full re-read that
//! replaces the entry. A failed stat or read leaves the cache untouched.
//!
//! Symlinks are followed, but only to targets beneath the asset root.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use asset_relay_cache::{AssetCache, AssetRoot, serve_addr};
//! use std::sync::Arc;
//!
//! let cache = Arc::new(AssetCache::new(AssetRoot::new("static")?));
//! serve_addr(cache, "127.0.0.1:7525".parse()?, std::future::pending()).await?;
//! ```

pub mod cache;
pub mod entry;
pub mod fs;
pub mod root;
pub mod server;
pub mod service;
pub mod statistics;

pub use cache::AssetCache;
pub use entry::CacheEntry;
pub use fs::{FileSystem, LocalFileSystem};
pub use root::AssetRoot;
pub use server::{ServerError, serve, serve_addr};
pub use service::CacheService;
pub use statistics::CacheStatistics;
