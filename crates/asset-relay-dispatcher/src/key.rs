//! Request path to asset key translation

use http::Uri;
use percent_encoding::percent_decode_str;

/// Returns the asset key addressed by `uri`.
///
/// The key is the path with one leading `/` removed, percent-decoded. The
/// query string is ignored. Invalid UTF-8 after decoding is replaced rather
/// than rejected, so every request still produces exactly one lookup and the
/// asset cache decides whether the key exists.
///
/// # Examples
///
/// ```
/// use asset_relay_dispatcher::asset_key;
/// use http::Uri;
///
/// let uri: Uri = "/css/site%20main.css?v=3".parse().unwrap();
/// assert_eq!(asset_key(&uri), "css/site main.css");
/// ```
pub fn asset_key(uri: &Uri) -> String {
	let path = uri.path();
	let path = path.strip_prefix('/').unwrap_or(path);
	percent_decode_str(path).decode_utf8_lossy().into_owned()
}
