//! Environment variable overrides

use crate::error::ConfigError;
use crate::settings::Settings;
use std::path::PathBuf;
use std::str::FromStr;

/// Prefix of every environment variable read by [`Settings::apply_env`]
pub const ENV_PREFIX: &str = "ASSET_RELAY_";

fn parse<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	value
		.trim()
		.parse::<T>()
		.map_err(|e| ConfigError::invalid(key, e.to_string()))
}

impl Settings {
	/// Applies `ASSET_RELAY_*` overrides from `vars`.
	///
	/// Takes the variables as pairs so callers decide the source, usually
	/// `std::env::vars()`. Variables without the prefix, and unknown names
	/// with it, are ignored.
	pub fn apply_env<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		for (key, value) in vars {
			let (key, value) = (key.as_ref(), value.as_ref());
			let Some(name) = key.strip_prefix(ENV_PREFIX) else {
				continue;
			};

			match name {
				"CACHE_LISTEN" => self.cache.listen = parse(key, value)?,
				"ASSET_ROOT" => self.cache.asset_root = PathBuf::from(value),
				"DISPATCHER_LISTEN" => self.dispatcher.listen = parse(key, value)?,
				"CACHE_ENDPOINT" => self.dispatcher.cache_endpoint = value.trim().to_string(),
				"ERROR_MODE" => self.dispatcher.error_mode = parse(key, value)?,
				"CONNECT_TIMEOUT_MS" => self.dispatcher.connect_timeout_ms = Some(parse(key, value)?),
				"REQUEST_TIMEOUT_MS" => self.dispatcher.request_timeout_ms = Some(parse(key, value)?),
				_ => {}
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::settings::ErrorMode;
	use rstest::rstest;

	#[rstest]
	fn test_env_overrides_defaults() {
		let mut settings = Settings::default();
		settings
			.apply_env([
				("ASSET_RELAY_ASSET_ROOT", "/var/www"),
				("ASSET_RELAY_CACHE_LISTEN", "0.0.0.0:17525"),
				("ASSET_RELAY_CACHE_ENDPOINT", "http://cache:17525"),
				("ASSET_RELAY_ERROR_MODE", "legacy-parity"),
				("ASSET_RELAY_REQUEST_TIMEOUT_MS", "750"),
			])
			.unwrap();

		assert_eq!(settings.cache.asset_root, PathBuf::from("/var/www"));
		assert_eq!(settings.cache.listen.port(), 17525);
		assert_eq!(settings.dispatcher.cache_endpoint, "http://cache:17525");
		assert_eq!(settings.dispatcher.error_mode, ErrorMode::LegacyParity);
		assert_eq!(settings.dispatcher.request_timeout_ms, Some(750));
	}

	#[rstest]
	fn test_unrelated_variables_are_ignored() {
		let mut settings = Settings::default();
		settings
			.apply_env([("PATH", "/usr/bin"), ("ASSET_RELAY_UNKNOWN", "x")])
			.unwrap();
		assert_eq!(settings, Settings::default());
	}

	#[rstest]
	#[case("ASSET_RELAY_DISPATCHER_LISTEN", "not-an-addr")]
	#[case("ASSET_RELAY_CONNECT_TIMEOUT_MS", "-1")]
	#[case("ASSET_RELAY_ERROR_MODE", "loud")]
	fn test_bad_value_names_variable(#[case] key: &str, #[case] value: &str) {
		let mut settings = Settings::default();
		let err = settings.apply_env([(key, value)]).unwrap_err();
		assert!(matches!(
			err,
			ConfigError::InvalidValue { key: ref k, .. } if k == key
		));
	}
}
