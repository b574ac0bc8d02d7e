use std::fmt::Display;
use thiserror::Error;

/// Failure classes shared by both ends of the `GetStaticFile` call.
///
/// `NotFound`, `InvalidKey` and `Io` originate in the asset cache and travel
/// as gRPC status codes. `Transport` is only ever produced on the calling side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Invalid key: {0}")]
	InvalidKey(String),

	#[error("I/O error: {0}")]
	Io(String),

	#[error("Transport error: {0}")]
	Transport(String),
}

pub type AssetResult<T> = Result<T, AssetError>;

impl AssetError {
	/// Builds an `Io` error that names the key it failed on.
	pub fn io(key: &str, cause: impl Display) -> Self {
		AssetError::Io(format!("{}: {}", key, cause))
	}

	/// Whether the caller asked for something that does not exist, as
	/// opposed to the backend failing to answer.
	pub fn is_not_found(&self) -> bool {
		matches!(self, AssetError::NotFound(_) | AssetError::InvalidKey(_))
	}
}

impl From<AssetError> for tonic::Status {
	fn from(error: AssetError) -> Self {
		match error {
			AssetError::NotFound(key) => tonic::Status::not_found(key),
			AssetError::InvalidKey(key) => tonic::Status::invalid_argument(key),
			AssetError::Io(message) => tonic::Status::internal(message),
			AssetError::Transport(message) => tonic::Status::unavailable(message),
		}
	}
}

impl From<tonic::Status> for AssetError {
	fn from(status: tonic::Status) -> Self {
		match status.code() {
			tonic::Code::NotFound => AssetError::NotFound(status.message().to_string()),
			tonic::Code::InvalidArgument => AssetError::InvalidKey(status.message().to_string()),
			tonic::Code::Internal => AssetError::Io(status.message().to_string()),
			_ => AssetError::Transport(format!("{:?}: {}", status.code(), status.message())),
		}
	}
}

impl From<tonic::transport::Error> for AssetError {
	fn from(error: tonic::transport::Error) -> Self {
		AssetError::Transport(error.to_string())
	}
}
