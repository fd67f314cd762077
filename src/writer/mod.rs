//! Clipboard writer: format dispatch and the fallback chain.
//!
//! [`write`] performs one best-effort copy. Each format has an ordered
//! list of strategies; a failed strategy hands over to the next one only
//! when [`WriteOptions::fallback`] is set, otherwise its error is
//! returned as-is. The writer holds no state between calls.

pub mod markup;
pub mod value;

use bytes::Bytes;

use crate::port::{ClipboardItem, OffscreenField, PortError, Ports};

pub use value::{Blob, CopyFormat, CopyValue, WriteOptions};

const TEXT_PLAIN: &str = "text/plain";
const TEXT_HTML: &str = "text/html";
const APPLICATION_JSON: &str = "application/json";
const IMAGE_PNG: &str = "image/png";

/// Coarse classification of a [`CopyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ClipboardUnavailable,
    UnsupportedValue,
    InvalidInput,
    FallbackCopyFailed,
    /// A strategy's own failure, surfaced unchanged.
    Underlying,
}

/// Why a copy failed.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("no clipboard available in this environment")]
    ClipboardUnavailable,

    #[error("cannot copy a {shape} value as {format}")]
    UnsupportedValue {
        format: CopyFormat,
        shape: &'static str,
    },

    #[error("image copy needs binary data or a string, got {0}")]
    InvalidInput(&'static str),

    #[error("fallback copy failed")]
    FallbackCopyFailed,

    #[error("clipboard: {0}")]
    Port(#[from] PortError),

    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CopyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CopyError::ClipboardUnavailable => ErrorKind::ClipboardUnavailable,
            CopyError::UnsupportedValue { .. } => ErrorKind::UnsupportedValue,
            CopyError::InvalidInput(_) => ErrorKind::InvalidInput,
            CopyError::FallbackCopyFailed => ErrorKind::FallbackCopyFailed,
            CopyError::Port(_) | CopyError::Serialize(_) => ErrorKind::Underlying,
        }
    }
}

/// Copy `value` to the clipboard in the requested format.
///
/// # Errors
///
/// - [`CopyError::ClipboardUnavailable`] before anything else when the
///   clipboard port reports no facility.
/// - [`CopyError::UnsupportedValue`] / [`CopyError::InvalidInput`] when
///   the value's shape does not fit the format.
/// - [`CopyError::FallbackCopyFailed`] when the legacy copy command
///   itself fails.
/// - [`CopyError::Port`] carrying the last attempted strategy's failure.
pub async fn write(
    ports: &Ports,
    value: &CopyValue,
    options: &WriteOptions,
) -> Result<(), CopyError> {
    if !ports.clipboard.is_available() {
        return Err(CopyError::ClipboardUnavailable);
    }

    tracing::debug!(format = %options.format, shape = value.shape(), "copy requested");

    match options.format {
        CopyFormat::Text => write_text(ports, value).await,
        CopyFormat::Html => write_html(ports, value, options).await,
        CopyFormat::Json => write_json(ports, value, options).await,
        CopyFormat::Image => write_image(ports, value, options).await,
    }
}

async fn write_text(ports: &Ports, value: &CopyValue) -> Result<(), CopyError> {
    let text = value.as_str().ok_or(CopyError::UnsupportedValue {
        format: CopyFormat::Text,
        shape: value.shape(),
    })?;
    ports.clipboard.write_text(text).await?;
    Ok(())
}

async fn write_html(
    ports: &Ports,
    value: &CopyValue,
    options: &WriteOptions,
) -> Result<(), CopyError> {
    let html = value.as_str().ok_or(CopyError::UnsupportedValue {
        format: CopyFormat::Html,
        shape: value.shape(),
    })?;
    let plain = markup::strip_tags(html);

    let item = ClipboardItem::new()
        .with(TEXT_HTML, Bytes::copy_from_slice(html.as_bytes()))
        .with(TEXT_PLAIN, plain.clone());

    match write_structured(ports, &item).await {
        Ok(()) if !options.force_legacy => Ok(()),
        Ok(()) => {
            tracing::debug!("structured html write done, legacy copy forced");
            legacy_copy(ports, &plain)
        }
        Err(e) if options.fallback => {
            tracing::warn!(error = %e, "structured html write failed, trying legacy copy");
            legacy_copy(ports, &plain)
        }
        Err(e) => Err(e.into()),
    }
}

async fn write_json(
    ports: &Ports,
    value: &CopyValue,
    options: &WriteOptions,
) -> Result<(), CopyError> {
    let json = match value {
        CopyValue::Text(s) | CopyValue::Markup(s) => s.clone(),
        CopyValue::Record(record) => serde_json::to_string_pretty(record)?,
        CopyValue::Blob(_) => {
            return Err(CopyError::UnsupportedValue {
                format: CopyFormat::Json,
                shape: value.shape(),
            });
        }
    };

    let item = ClipboardItem::new()
        .with(APPLICATION_JSON, json.clone())
        .with(TEXT_PLAIN, json.clone());

    match write_structured(ports, &item).await {
        Ok(()) => Ok(()),
        Err(e) if options.fallback => {
            tracing::warn!(error = %e, "structured json write failed, trying legacy copy");
            legacy_copy(ports, &json)
        }
        Err(e) => Err(e.into()),
    }
}

async fn write_image(
    ports: &Ports,
    value: &CopyValue,
    options: &WriteOptions,
) -> Result<(), CopyError> {
    let blob = match value {
        CopyValue::Text(url) | CopyValue::Markup(url) => {
            // Already a URL or an encoded payload.
            ports.clipboard.write_text(url).await?;
            return Ok(());
        }
        CopyValue::Blob(blob) => blob,
        CopyValue::Record(_) => {
            return Err(CopyError::InvalidInput(value.shape()));
        }
    };

    if ports.clipboard.supports_structured() {
        let mime = options
            .mime_type
            .as_deref()
            .or(blob.mime())
            .unwrap_or(IMAGE_PNG);
        let item = ClipboardItem::new().with(mime, blob.data().clone());
        match ports.clipboard.write_structured(&item).await {
            Ok(()) => return Ok(()),
            Err(e) if options.fallback => {
                tracing::warn!(error = %e, mime, "binary image write failed, copying as data URL");
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        tracing::debug!("structured writes unsupported, copying image as data URL");
    }

    let data_url = ports.decoder.read_as_data_url(blob).await?;
    ports.clipboard.write_text(&data_url).await?;
    Ok(())
}

/// Structured write, reported as unsupported when the port cannot do it.
async fn write_structured(ports: &Ports, item: &ClipboardItem) -> Result<(), PortError> {
    if !ports.clipboard.supports_structured() {
        return Err(PortError::Unsupported("structured clipboard writes".into()));
    }
    ports.clipboard.write_structured(item).await
}

/// Legacy synthetic-selection copy. The field is removed on every path.
fn legacy_copy(ports: &Ports, content: &str) -> Result<(), CopyError> {
    let field = OffscreenField::create(ports.legacy.as_ref())?;
    if field.copy(content) {
        Ok(())
    } else {
        Err(CopyError::FallbackCopyFailed)
    }
}
