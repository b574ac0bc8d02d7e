//! Settings for asset-relay
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `ASSET_RELAY_*` environment variables
//! 4. command-line flags (applied by the binary)
//!
//! ```toml
//! [cache]
//! listen = "127.0.0.1:7525"
//! asset_root = "/srv/static"
//!
//! [dispatcher]
//! listen = "0.0.0.0:8000"
//! cache_endpoint = "http://127.0.0.1:7525"
//! error_mode = "legacy-parity"
//! request_timeout_ms = 5000
//! ```

pub mod env;
pub mod error;
pub mod settings;

pub use env::ENV_PREFIX;
pub use error::ConfigError;
pub use settings::{CacheSettings, DispatcherSettings, ErrorMode, Settings};
