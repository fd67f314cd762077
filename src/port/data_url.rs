//! Blob decoder: base64 `data:` URLs.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{BlobDecoderPort, PortError};
use crate::writer::value::Blob;

/// MIME type used when a blob declares none.
const OCTET_STREAM: &str = "application/octet-stream";

/// Encodes blobs in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlDecoder;

/// `data:<mime>;base64,<payload>` for the given blob.
pub fn to_data_url(blob: &Blob) -> String {
    let mime = blob.mime().unwrap_or(OCTET_STREAM);
    format!("data:{mime};base64,{}", STANDARD.encode(blob.data()))
}

#[async_trait]
impl BlobDecoderPort for DataUrlDecoder {
    async fn read_as_data_url(&self, blob: &Blob) -> Result<String, PortError> {
        // Large images take a while to encode; keep the runtime responsive.
        let blob = blob.clone();
        tokio::task::spawn_blocking(move || to_data_url(&blob))
            .await
            .map_err(|e| PortError::Rejected(format!("data URL encoder panicked: {e}")))
    }
}
