//! Filesystem-coherent content cache

use crate::entry::CacheEntry;
use crate::fs::{FileSystem, LocalFileSystem};
use crate::root::AssetRoot;
use crate::statistics::{CacheStatistics, Counters};
use asset_relay_rpc::{AssetError, AssetResult};
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::SystemTime;

/// In-memory cache of asset contents keyed by asset key.
///
/// Every lookup stats the file first. A cached entry is returned only when
/// its recorded modification time equals the current one; otherwise the
/// file is read again and the entry replaced. Entries are never evicted.
///
/// The map lock is held only for the lookup and for the final insert, never
/// across filesystem I/O. Two concurrent misses on the same key may both
/// read the file; the last insert wins.
#[derive(Debug)]
pub struct AssetCache {
	root: AssetRoot,
	fs: Arc<dyn FileSystem>,
	entries: RwLock<HashMap<String, CacheEntry>>,
	counters: Counters,
}

impl AssetCache {
	/// Creates an empty cache over `root` on the local disk
	///
	/// # Example
	///
	/// ```rust,no_run
	/// use asset_relay_cache::{AssetCache, AssetRoot};
	///
	/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
	/// let cache = AssetCache::new(AssetRoot::new("static")?);
	/// let content = cache.get_static_file("index.html").await?;
	/// # Ok(())
	/// # }
	/// ```
	pub fn new(root: AssetRoot) -> Self {
		Self::with_file_system(root, Arc::new(LocalFileSystem))
	}

	/// Creates an empty cache over `root` that goes through `fs` for every
	/// stat and read
	pub fn with_file_system(root: AssetRoot, fs: Arc<dyn FileSystem>) -> Self {
		Self {
			root,
			fs,
			entries: RwLock::new(HashMap::new()),
			counters: Counters::default(),
		}
	}

	pub fn root(&self) -> &AssetRoot {
		&self.root
	}

	/// Returns the current content of the file at `key`.
	///
	/// # Errors
	///
	/// - [`AssetError::InvalidKey`] if the key is malformed, or names a path
	///   (symlinks included) that leads outside the asset root
	/// - [`AssetError::NotFound`] if nothing, or something other than a regular
	///   file, exists at the key
	/// - [`AssetError::Io`] if the stat fails for another reason or the read
	///   fails after a successful stat
	///
	/// No failure changes the cache.
	pub async fn get_static_file(&self, key: &str) -> AssetResult<Bytes> {
		let path = self.root.resolve(key)?;

		let metadata = self
			.fs
			.metadata(&path)
			.await
			.map_err(|err| classify(key, err))?;
		if !metadata.is_file() {
			return Err(AssetError::NotFound(key.to_string()));
		}
		let modified = metadata.modified().map_err(|err| AssetError::io(key, err))?;

		let real_path = self
			.fs
			.canonicalize(&path)
			.await
			.map_err(|err| classify(key, err))?;
		if !self.root.contains(&real_path) {
			tracing::warn!(key, resolved = %real_path.display(), "key leads outside the asset root");
			return Err(AssetError::InvalidKey(key.to_string()));
		}

		if let Some(content) = self.lookup(key, modified) {
			self.counters.hit();
			tracing::debug!(key, "cache hit");
			return Ok(content);
		}
		self.counters.miss();

		self.counters.disk_read();
		let content = self
			.fs
			.read(&real_path)
			.await
			.map_err(|err| AssetError::io(key, err))?;
		tracing::debug!(key, size = content.len(), "cache refreshed from disk");

		// The recorded time is the one stat'ed before the read. If the file
		// changed in between, the next lookup sees a newer time and reads again.
		self.entries.write().insert(
			key.to_string(),
			CacheEntry::new(key, content.clone(), modified),
		);
		Ok(content)
	}

	fn lookup(&self, key: &str, modified: SystemTime) -> Option<Bytes> {
		self.entries
			.read()
			.get(key)
			.filter(|entry| entry.is_fresh(modified))
			.map(|entry| entry.content.clone())
	}

	/// Returns a copy of the entry currently held for `key`
	pub fn entry(&self, key: &str) -> Option<CacheEntry> {
		self.entries.read().get(key).cloned()
	}

	pub fn contains(&self, key: &str) -> bool {
		self.entries.read().contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn statistics(&self) -> CacheStatistics {
		self.counters.snapshot(self.len())
	}
}

fn classify(key: &str, err: io::Error) -> AssetError {
	match err.kind() {
		io::ErrorKind::NotFound => AssetError::NotFound(key.to_string()),
		_ => AssetError::io(key, err),
	}
}
