//! Calls from the dispatcher to the asset cache

use asset_relay_rpc::{AssetCacheClient, AssetError, AssetResult, GetStaticFileRequest};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tonic::transport::Endpoint;

/// One lookup of an asset by key.
///
/// Implementations make exactly one attempt per call and never retry.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
	async fn fetch(&self, key: &str) -> AssetResult<Bytes>;
}

/// Fetches assets from the asset cache over gRPC.
///
/// A fresh connection is dialed for every call and dropped when the call
/// returns; no connection is shared between requests.
#[derive(Debug, Clone)]
pub struct GrpcFetcher {
	endpoint: Endpoint,
}

impl GrpcFetcher {
	/// Creates a fetcher for the cache at `url`, e.g. `http://127.0.0.1:7525`
	///
	/// # Errors
	///
	/// Returns [`AssetError::Transport`] if the URL is not a valid endpoint.
	pub fn new(url: impl Into<String>) -> AssetResult<Self> {
		let endpoint = Endpoint::from_shared(url.into())
			.map_err(|e| AssetError::Transport(e.to_string()))?;
		Ok(Self { endpoint })
	}

	/// Bounds the time spent dialing the cache
	pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
		self.endpoint = self.endpoint.connect_timeout(timeout);
		self
	}

	/// Bounds the time spent on the call once connected
	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.endpoint = self.endpoint.timeout(timeout);
		self
	}

	pub fn uri(&self) -> &http::Uri {
		self.endpoint.uri()
	}
}

#[async_trait]
impl AssetFetcher for GrpcFetcher {
	async fn fetch(&self, key: &str) -> AssetResult<Bytes> {
		let channel = self.endpoint.connect().await?;
		let mut client = AssetCacheClient::new(channel).max_decoding_message_size(usize::MAX);

		let reply = client
			.get_static_file(GetStaticFileRequest {
				key: key.to_string(),
			})
			.await?;

		Ok(reply.into_inner().content)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_new_rejects_invalid_url() {
		let err = GrpcFetcher::new("not a url").unwrap_err();
		assert!(matches!(err, AssetError::Transport(_)));
	}

	#[rstest]
	#[tokio::test]
	async fn test_unreachable_cache_is_transport_error() {
		// Bind then drop to get a port with nothing listening.
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		drop(listener);

		let fetcher = GrpcFetcher::new(format!("http://{}", addr))
			.unwrap()
			.with_connect_timeout(Duration::from_secs(2));
		let err = fetcher.fetch("hello.txt").await.unwrap_err();

		assert!(matches!(err, AssetError::Transport(_)));
		assert!(!err.is_not_found());
	}

	#[rstest]
	fn test_uri_is_the_configured_endpoint() {
		let fetcher = GrpcFetcher::new("http://127.0.0.1:7525").unwrap();
		assert_eq!(fetcher.uri().port_u16(), Some(7525));
		assert_eq!(fetcher.uri().host(), Some("127.0.0.1"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_silent_cache_times_out_as_transport_error() {
		// Accepts connections and never answers on them.
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		let silent = tokio::spawn(async move {
			let mut held = Vec::new();
			while let Ok((stream, _)) = listener.accept().await {
				held.push(stream);
			}
		});

		let fetcher = GrpcFetcher::new(format!("http://{}", addr))
			.unwrap()
			.with_connect_timeout(Duration::from_millis(300))
			.with_request_timeout(Duration::from_millis(300));
		let err = tokio::time::timeout(Duration::from_secs(10), fetcher.fetch("hello.txt"))
			.await
			.expect("request timeout did not fire")
			.unwrap_err();

		assert!(matches!(err, AssetError::Transport(_)));
		silent.abort();
	}
}
