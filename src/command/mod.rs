//! Command implementations for the `copyx` binary.
//!
//! `copy` performs one write through the system ports and exits.
//! `demo` drives the four demo buttons through a [`Copier`] and prints
//! the observable state after each, the way a front-end would render it.

mod format;

use std::path::{Path, PathBuf};
use std::time::Duration;

use copyx::{Blob, Copier, CopyError, CopyFormat, CopyOptions, CopyValue, Ports, WriteOptions};
use serde::Serialize;
use tokio::io::AsyncReadExt;

/// Command error type.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Copy(#[from] CopyError),
    #[error("{path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Arguments of `copyx copy`.
#[derive(Debug)]
pub struct CopyRequest {
    pub value: Option<String>,
    pub file: Option<PathBuf>,
    pub format: CopyFormat,
    pub fallback: bool,
    pub mime_type: Option<String>,
    pub force_legacy: bool,
}

impl CopyRequest {
    fn write_options(&self) -> WriteOptions {
        WriteOptions {
            format: self.format,
            fallback: self.fallback,
            mime_type: self.mime_type.clone(),
            force_legacy: self.force_legacy,
        }
    }
}

/// Arguments of `copyx demo`.
#[derive(Debug)]
pub struct DemoConfig {
    pub reset_delay: Duration,
    pub keep_history: bool,
    pub image: Option<PathBuf>,
}

/// Run `copyx copy`.
pub async fn run_copy(request: CopyRequest) -> Result<(), CommandError> {
    let value = match (&request.value, &request.file) {
        (Some(text), _) => text_value(request.format, text.clone()),
        (None, Some(path)) => file_value(request.format, path).await?,
        (None, None) => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            text_value(request.format, input)
        }
    };

    let options = request.write_options();
    copyx::write(&Ports::system(), &value, &options).await?;
    format::print_copied(&value, options.format);
    Ok(())
}

/// Interpret a command-line string for the requested format.
///
/// JSON strings that parse are copied as records (and so re-indented);
/// anything else is copied verbatim.
fn text_value(format: CopyFormat, text: String) -> CopyValue {
    match format {
        CopyFormat::Html => CopyValue::Markup(text),
        CopyFormat::Json => match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(record @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) => {
                CopyValue::Record(record)
            }
            _ => CopyValue::Text(text),
        },
        CopyFormat::Text | CopyFormat::Image => CopyValue::Text(text),
    }
}

async fn file_value(format: CopyFormat, path: &Path) -> Result<CopyValue, CommandError> {
    let read_err = |source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    };
    if format == CopyFormat::Image {
        let data = tokio::fs::read(path).await.map_err(read_err)?;
        return Ok(CopyValue::Blob(Blob::new(data, image_mime(path))));
    }
    let text = tokio::fs::read_to_string(path).await.map_err(read_err)?;
    Ok(text_value(format, text))
}

/// MIME type for common image file extensions.
fn image_mime(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime.to_string())
}

/// 1x1 transparent PNG used when the demo has no image file.
const DEMO_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae,
    0x42, 0x60, 0x82,
];

const DEMO_HTML: &str = concat!(
    r#"<b style="color: red">Hello from copyx!</b>"#,
    "<p>This is a paragraph with <i>formatted text</i>.</p>",
);

#[derive(Serialize)]
struct DemoRecord {
    user: &'static str,
    project: &'static str,
    downloads: u32,
}

/// Run `copyx demo`.
pub async fn run_demo(config: DemoConfig) -> Result<(), CommandError> {
    let image = match &config.image {
        Some(path) => file_value(CopyFormat::Image, path).await?,
        None => CopyValue::Blob(Blob::new(DEMO_PNG, Some("image/png".into()))),
    };
    let record = serde_json::to_value(DemoRecord {
        user: "demo",
        project: "copyx",
        downloads: 67,
    })
    .map_err(CopyError::Serialize)?;

    let options = CopyOptions {
        reset_delay: config.reset_delay,
        keep_history: config.keep_history,
        ..CopyOptions::default()
    }
    .on_error(|e| tracing::debug!(kind = ?e.kind(), "demo copy failed"));
    let copier = Copier::new(Ports::system(), options);

    let buttons = [
        ("Copy Text", CopyValue::from("Hello from copyx!"), CopyFormat::Text),
        ("Copy HTML", CopyValue::Markup(DEMO_HTML.into()), CopyFormat::Html),
        ("Copy JSON", CopyValue::Record(record), CopyFormat::Json),
        ("Copy Image", image, CopyFormat::Image),
    ];

    for (label, value, as_format) in buttons {
        let result = copier.copy(value, &WriteOptions::format(as_format)).await;
        format::print_button(label, &result, &copier.snapshot());
    }

    if !config.reset_delay.is_zero() {
        tokio::time::sleep(config.reset_delay).await;
        format::print_state(&copier.snapshot());
    }
    if config.keep_history {
        format::print_history(&copier.snapshot());
    }
    Ok(())
}
