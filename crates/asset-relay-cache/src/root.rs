//! Asset root directory and key resolution

use asset_relay_rpc::AssetError;
use std::io;
use std::path::{Component, Path, PathBuf};

/// The directory every asset key is resolved against.
///
/// Fixed at startup. All filesystem access of the cache happens beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoot {
	path: PathBuf,
}

impl AssetRoot {
	/// Creates an asset root from an existing directory.
	///
	/// The path is canonicalized so that later joins cannot be redirected by
	/// a relative root and the process working directory.
	///
	/// # Errors
	///
	/// Returns an error if the path does not exist or is not a directory.
	///
	/// # Example
	///
	/// ```rust,no_run
	/// use asset_relay_cache::AssetRoot;
	///
	/// let root = AssetRoot::new("static")?;
	/// assert!(root.path().is_absolute());
	/// # Ok::<(), std::io::Error>(())
	/// ```
	pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
		let path = path.as_ref().canonicalize()?;
		if !path.is_dir() {
			return Err(io::Error::new(
				io::ErrorKind::InvalidInput,
				format!("asset root {} is not a directory", path.display()),
			));
		}
		Ok(Self { path })
	}

	/// Absolute path of the root directory
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Whether `path`, already canonical, lies beneath the root
	pub fn contains(&self, path: &Path) -> bool {
		path.starts_with(&self.path)
	}

	/// Resolves a key to a path beneath the root.
	///
	/// Keys are relative paths made of `/`-separated file names. Empty keys,
	/// absolute paths, NUL bytes, and empty, `.` or `..` segments are
	/// rejected, which includes a trailing `/`. Every accepted key therefore
	/// names one path in exactly one spelling.
	///
	/// Only the text is checked here; symlinks are followed by the caller.
	pub fn resolve(&self, key: &str) -> Result<PathBuf, AssetError> {
		let invalid = || AssetError::InvalidKey(key.to_string());
		if key.is_empty() || key.contains('\0') {
			return Err(invalid());
		}

		let mut resolved = self.path.clone();
		for segment in key.split('/') {
			if matches!(segment, "" | "." | "..") {
				return Err(invalid());
			}
			let mut components = Path::new(segment).components();
			match (components.next(), components.next()) {
				(Some(Component::Normal(part)), None) => resolved.push(part),
				_ => return Err(invalid()),
			}
		}
		Ok(resolved)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use tempfile::TempDir;

	#[rstest]
	fn test_new_rejects_missing_directory() {
		let temp_dir = TempDir::new().unwrap();
		let missing = temp_dir.path().join("nope");
		assert!(AssetRoot::new(&missing).is_err());
	}

	#[rstest]
	fn test_new_rejects_regular_file() {
		let temp_dir = TempDir::new().unwrap();
		let file = temp_dir.path().join("file.txt");
		std::fs::write(&file, "x").unwrap();
		let err = AssetRoot::new(&file).unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
	}

	#[rstest]
	#[case("hello.txt", "hello.txt")]
	#[case("css/app.css", "css/app.css")]
	#[case("css/.hidden", "css/.hidden")]
	fn test_resolve_accepts_relative_keys(#[case] key: &str, #[case] expected: &str) {
		let temp_dir = TempDir::new().unwrap();
		let root = AssetRoot::new(temp_dir.path()).unwrap();
		assert_eq!(root.resolve(key).unwrap(), root.path().join(expected));
	}

	#[rstest]
	#[case("")]
	#[case(".")]
	#[case("../secret")]
	#[case("css/../../secret")]
	#[case("/etc/passwd")]
	#[case("bad\0key")]
	#[case("hello.txt/")]
	#[case("./hello.txt")]
	#[case("css//app.css")]
	#[case("css/./app.css")]
	fn test_resolve_rejects_malformed_keys(#[case] key: &str) {
		let temp_dir = TempDir::new().unwrap();
		let root = AssetRoot::new(temp_dir.path()).unwrap();
		assert_eq!(
			root.resolve(key),
			Err(AssetError::InvalidKey(key.to_string()))
		);
	}

	#[rstest]
	fn test_contains_checks_canonical_prefix() {
		let temp_dir = TempDir::new().unwrap();
		let root = AssetRoot::new(temp_dir.path()).unwrap();

		assert!(root.contains(&root.path().join("css/app.css")));
		assert!(!root.contains(root.path().parent().unwrap()));
		assert!(!root.contains(Path::new("/etc/passwd")));
	}
}
