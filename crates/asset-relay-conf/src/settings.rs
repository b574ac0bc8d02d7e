//! Settings structures

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// How the dispatcher reports a key that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorMode {
	/// Missing assets answer 404; every other failure answers 500.
	#[default]
	Distinguished,
	/// Every failure answers 500, missing assets included.
	LegacyParity,
}

impl FromStr for ErrorMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"distinguished" => Ok(ErrorMode::Distinguished),
			"legacy-parity" | "legacy" => Ok(ErrorMode::LegacyParity),
			other => Err(format!(
				"expected 'distinguished' or 'legacy-parity', got '{}'",
				other
			)),
		}
	}
}

impl fmt::Display for ErrorMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ErrorMode::Distinguished => f.write_str("distinguished"),
			ErrorMode::LegacyParity => f.write_str("legacy-parity"),
		}
	}
}

/// Asset cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
	/// Address the RPC listener binds
	pub listen: SocketAddr,
	/// Directory assets are served from
	pub asset_root: PathBuf,
}

impl Default for CacheSettings {
	fn default() -> Self {
		Self {
			listen: SocketAddr::from((Ipv4Addr::LOCALHOST, 7525)),
			asset_root: PathBuf::from("static"),
		}
	}
}

/// Dispatcher settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherSettings {
	/// Address the HTTP listener binds
	pub listen: SocketAddr,
	/// URL of the asset cache RPC listener
	pub cache_endpoint: String,
	pub error_mode: ErrorMode,
	/// Bound on dialing the asset cache; unbounded when unset
	pub connect_timeout_ms: Option<u64>,
	/// Bound on a whole call to the asset cache; unbounded when unset
	pub request_timeout_ms: Option<u64>,
}

impl Default for DispatcherSettings {
	fn default() -> Self {
		Self {
			listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8000)),
			cache_endpoint: "http://127.0.0.1:7525".to_string(),
			error_mode: ErrorMode::default(),
			connect_timeout_ms: None,
			request_timeout_ms: None,
		}
	}
}

impl DispatcherSettings {
	pub fn connect_timeout(&self) -> Option<Duration> {
		self.connect_timeout_ms.map(Duration::from_millis)
	}

	pub fn request_timeout(&self) -> Option<Duration> {
		self.request_timeout_ms.map(Duration::from_millis)
	}
}

/// All startup parameters of both components
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
	pub cache: CacheSettings,
	pub dispatcher: DispatcherSettings,
}

impl Settings {
	/// Parses settings from TOML text. Missing keys keep their defaults.
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(content)?)
	}

	/// Reads settings from a TOML file
	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}

	/// Defaults, then `path` if given, then the process environment.
	///
	/// The result is not validated; call [`Settings::validate`] once every
	/// override has been applied.
	pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		let mut settings = match path {
			Some(path) => Self::from_file(path)?,
			None => Self::default(),
		};
		settings.apply_env(std::env::vars())?;
		Ok(settings)
	}

	/// Checks values that parse but cannot work
	pub fn validate(&self) -> Result<(), ConfigError> {
		let endpoint = &self.dispatcher.cache_endpoint;
		if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
			return Err(ConfigError::invalid(
				"dispatcher.cache_endpoint",
				format!("'{}' must start with http:// or https://", endpoint),
			));
		}
		if self.dispatcher.connect_timeout_ms == Some(0) {
			return Err(ConfigError::invalid(
				"dispatcher.connect_timeout_ms",
				"must be greater than zero",
			));
		}
		if self.dispatcher.request_timeout_ms == Some(0) {
			return Err(ConfigError::invalid(
				"dispatcher.request_timeout_ms",
				"must be greater than zero",
			));
		}
		if self.cache.asset_root.as_os_str().is_empty() {
			return Err(ConfigError::invalid("cache.asset_root", "must not be empty"));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	#[rstest]
	fn test_defaults() {
		let settings = Settings::default();
		assert_eq!(settings.cache.listen.port(), 7525);
		assert_eq!(settings.dispatcher.listen.port(), 8000);
		assert_eq!(settings.dispatcher.error_mode, ErrorMode::Distinguished);
		assert!(settings.dispatcher.request_timeout().is_none());
		assert!(settings.validate().is_ok());
	}

	#[rstest]
	fn test_partial_toml_keeps_defaults() {
		let settings = Settings::from_toml_str(
			r#"
			[cache]
			asset_root = "/srv/static"

			[dispatcher]
			error_mode = "legacy-parity"
			request_timeout_ms = 2500
			"#,
		)
		.unwrap();

		assert_eq!(settings.cache.asset_root, PathBuf::from("/srv/static"));
		assert_eq!(settings.cache.listen.port(), 7525);
		assert_eq!(settings.dispatcher.error_mode, ErrorMode::LegacyParity);
		assert_eq!(
			settings.dispatcher.request_timeout(),
			Some(Duration::from_millis(2500))
		);
	}

	#[rstest]
	fn test_unknown_key_is_rejected() {
		let err = Settings::from_toml_str("[cache]\nport = 1\n").unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}

	#[rstest]
	fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[dispatcher]\nlisten = \"127.0.0.1:9000\"").unwrap();

		let settings = Settings::from_file(file.path()).unwrap();
		assert_eq!(settings.dispatcher.listen.port(), 9000);
	}

	#[rstest]
	fn test_missing_file_names_path() {
		let err = Settings::from_file(Path::new("/nonexistent/asset-relay.toml")).unwrap_err();
		assert!(err.to_string().contains("/nonexistent/asset-relay.toml"));
	}

	#[rstest]
	#[case("ftp://cache:7525")]
	#[case("127.0.0.1:7525")]
	fn test_validate_rejects_endpoint_without_http_scheme(#[case] endpoint: &str) {
		let mut settings = Settings::default();
		settings.dispatcher.cache_endpoint = endpoint.to_string();

		let err = settings.validate().unwrap_err();
		assert!(matches!(
			err,
			ConfigError::InvalidValue { ref key, .. } if key == "dispatcher.cache_endpoint"
		));
	}

	#[rstest]
	fn test_validate_rejects_zero_timeout() {
		let mut settings = Settings::default();
		settings.dispatcher.connect_timeout_ms = Some(0);
		assert!(settings.validate().is_err());
	}

	#[rstest]
	#[case("distinguished", ErrorMode::Distinguished)]
	#[case("legacy-parity", ErrorMode::LegacyParity)]
	#[case("LEGACY", ErrorMode::LegacyParity)]
	fn test_error_mode_from_str(#[case] input: &str, #[case] expected: ErrorMode) {
		assert_eq!(input.parse::<ErrorMode>().unwrap(), expected);
	}

	#[rstest]
	fn test_error_mode_from_str_rejects_unknown() {
		assert!("strict".parse::<ErrorMode>().is_err());
	}
}
