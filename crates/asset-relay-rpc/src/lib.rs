//! RPC contract between the asset-relay dispatcher and the asset cache
//!
//! The contract is a single unary gRPC method, `assetrelay.AssetCache/GetStaticFile`,
//! which takes an asset key and answers with the full file content.
//!
//! # Usage
//!
//! ```rust,ignore
//! use asset_relay_rpc::proto::{GetStaticFileRequest, asset_cache_client::AssetCacheClient};
//!
//! let mut client = AssetCacheClient::connect("http://127.0.0.1:7525").await?;
//! let reply = client
//!     .get_static_file(GetStaticFileRequest { key: "index.html".to_string() })
//!     .await?;
//! ```

pub mod error;

pub mod proto {
	/// Request for one asset, addressed by its key relative to the asset root.
	#[derive(Clone, PartialEq, ::prost::Message)]
	pub struct GetStaticFileRequest {
		#[prost(string, tag = "1")]
		pub key: ::prost::alloc::string::String,
	}

	/// Full content of the requested asset.
	#[derive(Clone, PartialEq, ::prost::Message)]
	pub struct GetStaticFileReply {
		#[prost(bytes = "bytes", tag = "1")]
		pub content: bytes::Bytes,
	}

	include!(concat!(env!("OUT_DIR"), "/assetrelay.AssetCache.rs"));
}

pub use error::{AssetError, AssetResult};
pub use proto::asset_cache_client::AssetCacheClient;
pub use proto::asset_cache_server::{AssetCache as AssetCacheRpc, AssetCacheServer};
pub use proto::{GetStaticFileReply, GetStaticFileRequest};

/// Port the asset cache listens on unless configured otherwise.
pub const DEFAULT_CACHE_PORT: u16 = 7525;
