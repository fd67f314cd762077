//! Port abstraction: injectable clipboard capabilities.
//!
//! The writer never touches a platform clipboard directly. Everything it
//! needs is split into three sub-interfaces: the clipboard itself, the
//! legacy synthetic-copy facility, and the blob-to-data-URL decoder.
//! Platform adapters implement one or more of them; [`Ports`] composes
//! them for a single writer call.

pub mod data_url;
#[cfg(test)]
pub(crate) mod fake;
pub mod osc52;
pub mod xclip;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::writer::value::Blob;

pub use data_url::DataUrlDecoder;
pub use osc52::Osc52LegacyCopy;
pub use xclip::XclipClipboard;

/// Errors returned by port adapters.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The capability exists but cannot handle this request (e.g. no
    /// structured writes, unknown MIME target).
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// The platform refused the write (e.g. permission denied, helper
    /// exited non-zero).
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One MIME-typed representation of a clipboard item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representation {
    pub mime: String,
    pub data: Bytes,
}

/// A structured clipboard item: several representations of the same
/// logical content, in order of preference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardItem {
    representations: Vec<Representation>,
}

impl ClipboardItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a representation. Later entries are less preferred.
    pub fn with(mut self, mime: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.representations.push(Representation {
            mime: mime.into(),
            data: data.into(),
        });
        self
    }

    pub fn representations(&self) -> &[Representation] {
        &self.representations
    }

    /// Payload for a given MIME type, if present.
    pub fn get(&self, mime: &str) -> Option<&Bytes> {
        self.representations
            .iter()
            .find(|r| r.mime == mime)
            .map(|r| &r.data)
    }
}

/// Writes the system clipboard.
///
/// `Send + Sync` because the adapter drives writes from spawned tasks.
#[async_trait]
pub trait ClipboardPort: Send + Sync {
    /// Whether any clipboard facility exists in this runtime.
    fn is_available(&self) -> bool;

    /// Whether [`write_structured`](Self::write_structured) can be used.
    /// Probed at call time, not inferred from the type.
    fn supports_structured(&self) -> bool;

    /// Replace the clipboard with a plain-text entry.
    async fn write_text(&self, text: &str) -> Result<(), PortError>;

    /// Replace the clipboard with a multi-representation item.
    async fn write_structured(&self, item: &ClipboardItem) -> Result<(), PortError>;
}

/// Handle to an off-screen text field created by a [`LegacyCopyPort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(pub uuid::Uuid);

/// Legacy synthetic-copy facility.
///
/// Mirrors the old select-then-copy technique: create a hidden field,
/// fill it, select it, fire the copy command, remove the field. Callers
/// should hold the field through [`OffscreenField`] so removal happens
/// on every exit path.
pub trait LegacyCopyPort: Send + Sync {
    fn create_field(&self) -> Result<FieldId, PortError>;

    fn set_content(&self, field: FieldId, content: &str);

    fn select_all(&self, field: FieldId);

    /// Run the copy command against the current selection. Returns
    /// whether the platform reported success.
    fn exec_copy(&self) -> bool;

    fn remove_field(&self, field: FieldId);
}

/// Converts binary data into a base64 `data:` URL.
#[async_trait]
pub trait BlobDecoderPort: Send + Sync {
    async fn read_as_data_url(&self, blob: &Blob) -> Result<String, PortError>;
}

/// Scoped off-screen field. Removed from the port when dropped.
pub struct OffscreenField<'a> {
    port: &'a dyn LegacyCopyPort,
    id: FieldId,
}

impl<'a> OffscreenField<'a> {
    pub fn create(port: &'a dyn LegacyCopyPort) -> Result<Self, PortError> {
        let id = port.create_field()?;
        Ok(Self { port, id })
    }

    /// Fill the field, select it and fire the legacy copy command.
    pub fn copy(&self, content: &str) -> bool {
        self.port.set_content(self.id, content);
        self.port.select_all(self.id);
        self.port.exec_copy()
    }
}

impl Drop for OffscreenField<'_> {
    fn drop(&mut self) {
        self.port.remove_field(self.id);
    }
}

/// A composed set of ports for one writer.
///
/// Cheap to clone; the adapter hands a clone to every copy call.
#[derive(Clone)]
pub struct Ports {
    pub clipboard: Arc<dyn ClipboardPort>,
    pub legacy: Arc<dyn LegacyCopyPort>,
    pub decoder: Arc<dyn BlobDecoderPort>,
}

impl Ports {
    /// The system ports: xclip for the clipboard, OSC 52 on stdout for
    /// the legacy path, and the in-process data-URL encoder.
    pub fn system() -> Self {
        Self {
            clipboard: Arc::new(XclipClipboard::new()),
            legacy: Arc::new(Osc52LegacyCopy::new(std::io::stdout())),
            decoder: Arc::new(DataUrlDecoder),
        }
    }
}
