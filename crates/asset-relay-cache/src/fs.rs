//! Filesystem access used by the asset cache

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

/// The filesystem operations [`AssetCache`](crate::AssetCache) performs.
///
/// Paths passed in are already resolved beneath the asset root. Errors keep
/// their [`io::ErrorKind`] so the cache can tell a missing file from a
/// failing one.
#[async_trait]
pub trait FileSystem: Debug + Send + Sync {
	/// Stats `path`, following symlinks
	async fn metadata(&self, path: &Path) -> io::Result<Metadata>;

	/// Resolves `path` to its absolute form with every symlink followed
	async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

	/// Reads the whole file
	async fn read(&self, path: &Path) -> io::Result<Bytes>;
}

/// [`FileSystem`] backed by the local disk through `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
	async fn metadata(&self, path: &Path) -> io::Result<Metadata> {
		tokio::fs::metadata(path).await
	}

	async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
		tokio::fs::canonicalize(path).await
	}

	async fn read(&self, path: &Path) -> io::Result<Bytes> {
		tokio::fs::read(path).await.map(Bytes::from)
	}
}
