use std::path::PathBuf;
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("Cannot read settings file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Invalid settings file: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("Invalid value for '{key}': {message}")]
	InvalidValue { key: String, message: String },
}

impl ConfigError {
	pub(crate) fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
		ConfigError::InvalidValue {
			key: key.into(),
			message: message.into(),
		}
	}
}
