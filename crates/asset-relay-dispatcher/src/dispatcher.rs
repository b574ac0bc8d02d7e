//! HTTP request to asset lookup translation

use crate::fetcher::AssetFetcher;
use crate::key::asset_key;
use asset_relay_conf::ErrorMode;
use asset_relay_rpc::AssetError;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use std::sync::Arc;

/// Body sent with every 404
pub const NOT_FOUND_BODY: &str = "404 - Not Found";

/// Body sent with every 500
pub const SERVER_ERROR_BODY: &str = "500 - Something bad happened!";

/// Turns each HTTP request into one asset lookup.
///
/// Holds no state between requests. The failure cause is logged and never
/// sent to the client.
#[derive(Clone)]
pub struct Dispatcher {
	fetcher: Arc<dyn AssetFetcher>,
	error_mode: ErrorMode,
}

impl Dispatcher {
	pub fn new(fetcher: Arc<dyn AssetFetcher>) -> Self {
		Self {
			fetcher,
			error_mode: ErrorMode::default(),
		}
	}

	pub fn with_error_mode(mut self, error_mode: ErrorMode) -> Self {
		self.error_mode = error_mode;
		self
	}

	pub fn error_mode(&self) -> ErrorMode {
		self.error_mode
	}

	/// Handles one request. Only the path is looked at; method, headers,
	/// query and body are ignored.
	pub async fn handle<B>(&self, request: Request<B>) -> Response<Full<Bytes>> {
		let key = asset_key(request.uri());

		match self.fetcher.fetch(&key).await {
			Ok(content) => asset_response(&key, content),
			Err(err) => self.error_response(&key, err),
		}
	}

	fn error_response(&self, key: &str, err: AssetError) -> Response<Full<Bytes>> {
		let status = match (&err, self.error_mode) {
			(err, ErrorMode::Distinguished) if err.is_not_found() => StatusCode::NOT_FOUND,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		};

		match &err {
			AssetError::Transport(_) => {
				tracing::error!(key, error = %err, "asset cache unreachable");
			}
			_ => tracing::warn!(key, error = %err, status = status.as_u16(), "asset lookup failed"),
		}

		let body = if status == StatusCode::NOT_FOUND {
			NOT_FOUND_BODY
		} else {
			SERVER_ERROR_BODY
		};
		text_response(status, body)
	}
}

fn asset_response(key: &str, content: Bytes) -> Response<Full<Bytes>> {
	let mime = mime_guess::from_path(key).first_or_octet_stream();

	let mut response = Response::new(Full::new(content));
	if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
		response.headers_mut().insert(CONTENT_TYPE, value);
	}
	response
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
	let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
	*response.status_mut() = status;
	response.headers_mut().insert(
		CONTENT_TYPE,
		HeaderValue::from_static("text/plain; charset=utf-8"),
	);
	response
}
