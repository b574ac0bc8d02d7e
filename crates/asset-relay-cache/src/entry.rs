//! Cached file content

use bytes::Bytes;
use std::time::SystemTime;

/// The content of one asset as last read from disk, together with the
/// modification time observed for that read.
///
/// Entries are immutable. A refresh replaces the whole entry, so readers
/// never see content paired with another read's timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
	/// Key relative to the asset root
	pub key: String,

	/// File bytes
	pub content: Bytes,

	/// Modification time of the file when `content` was read
	pub last_modified: SystemTime,
}

impl CacheEntry {
	pub fn new(key: impl Into<String>, content: Bytes, last_modified: SystemTime) -> Self {
		Self {
			key: key.into(),
			content,
			last_modified,
		}
	}

	/// An entry is fresh only when the on-disk timestamp is exactly the one
	/// recorded. A clock moved backwards counts as a change too.
	pub fn is_fresh(&self, modified: SystemTime) -> bool {
		self.last_modified == modified
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::time::Duration;

	#[rstest]
	fn test_freshness_is_timestamp_equality() {
		let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
		let entry = CacheEntry::new("a.txt", Bytes::from_static(b"a"), t);

		assert!(entry.is_fresh(t));
		assert!(!entry.is_fresh(t + Duration::from_nanos(1)));
		assert!(!entry.is_fresh(t - Duration::from_secs(60)));
	}
}
