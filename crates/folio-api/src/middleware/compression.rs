//! Response compression layer.

use tower_http::compression::CompressionLayer;

/// Gzip for the JSON responses; the editor content can be large.
pub fn build_compression_layer() -> CompressionLayer {
    CompressionLayer::new().gzip(true)
}
