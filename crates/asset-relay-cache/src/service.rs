//! gRPC front of the asset cache

use crate::cache::AssetCache;
use asset_relay_rpc::{AssetCacheRpc, GetStaticFileReply, GetStaticFileRequest};
use std::sync::Arc;
use tonic::{Request, Response, Status};

/// Implementation of the `AssetCache` RPC service over a shared [`AssetCache`]
#[derive(Debug, Clone)]
pub struct CacheService {
	cache: Arc<AssetCache>,
}

impl CacheService {
	pub fn new(cache: Arc<AssetCache>) -> Self {
		Self { cache }
	}
}

#[tonic::async_trait]
impl AssetCacheRpc for CacheService {
	async fn get_static_file(
		&self,
		request: Request<GetStaticFileRequest>,
	) -> Result<Response<GetStaticFileReply>, Status> {
		let key = request.into_inner().key;

		match self.cache.get_static_file(&key).await {
			Ok(content) => Ok(Response::new(GetStaticFileReply { content })),
			Err(err) => {
				if err.is_not_found() {
					tracing::info!(key = %key, error = %err, "asset not served");
				} else {
					tracing::warn!(key = %key, error = %err, "asset read failed");
				}
				Err(err.into())
			}
		}
	}
}
