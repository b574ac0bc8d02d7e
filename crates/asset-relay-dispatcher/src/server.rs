//! HTTP/1.1 accept loop for the dispatcher

use crate::dispatcher::Dispatcher;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

/// HTTP/1.1 server in front of a [`Dispatcher`]
///
/// Every accepted connection runs on its own task. A failed lookup or a
/// broken connection never ends the accept loop.
pub struct HttpServer {
	dispatcher: Arc<Dispatcher>,
}

impl HttpServer {
	/// Create a new server with the given dispatcher
	///
	/// # Examples
	///
	/// ```
	/// use std::sync::Arc;
	/// use asset_relay_dispatcher::{Dispatcher, GrpcFetcher, HttpServer};
	///
	/// let fetcher = GrpcFetcher::new("http://127.0.0.1:7525").unwrap();
	/// let server = HttpServer::new(Arc::new(Dispatcher::new(Arc::new(fetcher))));
	/// ```
	pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
		Self { dispatcher }
	}

	/// Accept connections on `listener` forever
	pub async fn listen(self, listener: TcpListener) -> io::Result<()> {
		self.listen_with_shutdown(listener, std::future::pending())
			.await
	}

	/// Accept connections on `listener` until `shutdown` resolves.
	///
	/// In-flight connections are left to finish on their own tasks.
	///
	/// # Examples
	///
	/// ```no_run
	/// use std::sync::Arc;
	/// use asset_relay_dispatcher::{Dispatcher, GrpcFetcher, HttpServer};
	/// use tokio::net::TcpListener;
	///
	/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
	/// let fetcher = GrpcFetcher::new("http://127.0.0.1:7525")?;
	/// let server = HttpServer::new(Arc::new(Dispatcher::new(Arc::new(fetcher))));
	/// let listener = TcpListener::bind("127.0.0.1:8000").await?;
	/// server
	///     .listen_with_shutdown(listener, async {
	///         let _ = tokio::signal::ctrl_c().await;
	///     })
	///     .await?;
	/// # Ok(())
	/// # }
	/// ```
	pub async fn listen_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> io::Result<()>
	where
		F: Future<Output = ()>,
	{
		let addr = listener.local_addr()?;
		tracing::info!(%addr, "dispatcher listening on http://{}", addr);

		tokio::pin!(shutdown);

		loop {
			tokio::select! {
				result = listener.accept() => {
					let (stream, remote_addr) = match result {
						Ok(accepted) => accepted,
						Err(err) => {
							// Usually descriptor exhaustion; back off instead of spinning.
							tracing::warn!(error = %err, "failed to accept connection");
							tokio::time::sleep(Duration::from_millis(50)).await;
							continue;
						}
					};
					let dispatcher = self.dispatcher.clone();

					tokio::task::spawn(async move {
						if let Err(err) = Self::handle_connection(stream, remote_addr, dispatcher).await {
							tracing::debug!(%remote_addr, error = %err, "connection ended with error");
						}
					});
				}
				_ = &mut shutdown => {
					tracing::info!(%addr, "shutdown signal received, dispatcher stops accepting");
					break;
				}
			}
		}

		Ok(())
	}

	/// Serve HTTP/1.1 requests on a single accepted connection
	pub async fn handle_connection(
		stream: TcpStream,
		remote_addr: SocketAddr,
		dispatcher: Arc<Dispatcher>,
	) -> Result<(), hyper::Error> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			dispatcher,
			remote_addr,
		};

		http1::Builder::new().serve_connection(io, service).await
	}
}

/// Service implementation for hyper
struct RequestService {
	dispatcher: Arc<Dispatcher>,
	remote_addr: SocketAddr,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = Infallible;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let dispatcher = self.dispatcher.clone();
		let remote_addr = self.remote_addr;

		Box::pin(async move {
			let method = req.method().clone();
			let path = req.uri().path().to_string();

			let response = dispatcher.handle(req).await;

			tracing::debug!(
				%remote_addr,
				%method,
				path,
				status = response.status().as_u16(),
				"request served"
			);
			Ok(response)
		})
	}
}
