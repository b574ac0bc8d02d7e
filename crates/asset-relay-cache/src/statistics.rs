//! Cache counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of the cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatistics {
	/// Lookups answered from memory
	pub hits: u64,
	/// Lookups that went to disk (absent or stale entry)
	pub misses: u64,
	/// Full-file reads started
	pub disk_reads: u64,
	/// Number of entries currently held
	pub entries: u64,
}

impl CacheStatistics {
	/// Calculate hit rate (0.0 to 1.0)
	///
	/// # Examples
	///
	/// ```
	/// use asset_relay_cache::CacheStatistics;
	///
	/// let stats = CacheStatistics { hits: 3, misses: 1, ..Default::default() };
	/// assert_eq!(stats.hit_rate(), 0.75);
	/// ```
	pub fn hit_rate(&self) -> f64 {
		let total = self.hits + self.misses;
		if total == 0 {
			0.0
		} else {
			self.hits as f64 / total as f64
		}
	}
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
	hits: AtomicU64,
	misses: AtomicU64,
	disk_reads: AtomicU64,
}

impl Counters {
	pub(crate) fn hit(&self) {
		self.hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn miss(&self) {
		self.misses.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn disk_read(&self) {
		self.disk_reads.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn snapshot(&self, entries: usize) -> CacheStatistics {
		CacheStatistics {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
			disk_reads: self.disk_reads.load(Ordering::Relaxed),
			entries: entries as u64,
		}
	}
}
