//! OSC 52 legacy copy: synthetic-selection copy for terminals.
//!
//! Keeps a tiny in-memory document of off-screen fields. Selecting a
//! field and firing the copy command writes the selected text to the
//! terminal as `ESC ] 52 ; c ; <base64> BEL`, which most terminal
//! emulators (and tmux with `set-clipboard on`) forward to the host
//! clipboard. In the system port set it only runs after an xclip
//! rejection, since a missing X display fails the copy up front.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{FieldId, LegacyCopyPort, PortError};

/// Terminals silently drop OSC 52 payloads past roughly this size.
pub const MAX_OSC52_BYTES: usize = 100_000;

#[derive(Debug, Default)]
struct Document {
    fields: HashMap<FieldId, String>,
    selection: Option<FieldId>,
}

/// [`LegacyCopyPort`] that emits OSC 52 sequences to `W`.
pub struct Osc52LegacyCopy<W> {
    doc: Mutex<Document>,
    out: Mutex<W>,
}

impl<W: Write + Send> Osc52LegacyCopy<W> {
    pub fn new(out: W) -> Self {
        Self {
            doc: Mutex::new(Document::default()),
            out: Mutex::new(out),
        }
    }

    /// Number of fields currently attached to the document.
    pub fn field_count(&self) -> usize {
        self.doc.lock().map(|d| d.fields.len()).unwrap_or(0)
    }

    /// Consume the port and return the output sink.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Build the OSC 52 sequence that sets the clipboard selection.
pub fn osc52_sequence(content: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(content))
}

impl<W: Write + Send> LegacyCopyPort for Osc52LegacyCopy<W> {
    fn create_field(&self) -> Result<FieldId, PortError> {
        let mut doc = self
            .doc
            .lock()
            .map_err(|_| PortError::Rejected("legacy document poisoned".into()))?;
        let id = FieldId(uuid::Uuid::new_v4());
        doc.fields.insert(id, String::new());
        Ok(id)
    }

    fn set_content(&self, field: FieldId, content: &str) {
        if let Ok(mut doc) = self.doc.lock()
            && let Some(value) = doc.fields.get_mut(&field)
        {
            content.clone_into(value);
        }
    }

    fn select_all(&self, field: FieldId) {
        if let Ok(mut doc) = self.doc.lock()
            && doc.fields.contains_key(&field)
        {
            doc.selection = Some(field);
        }
    }

    fn exec_copy(&self) -> bool {
        let selected = match self.doc.lock() {
            Ok(doc) => doc
                .selection
                .and_then(|id| doc.fields.get(&id))
                .cloned(),
            Err(_) => None,
        };
        let Some(text) = selected else {
            tracing::debug!("legacy copy with empty selection");
            return false;
        };
        if text.len() > MAX_OSC52_BYTES {
            tracing::warn!(bytes = text.len(), "selection too large for OSC 52");
            return false;
        }

        let Ok(mut out) = self.out.lock() else {
            return false;
        };
        match out
            .write_all(osc52_sequence(&text).as_bytes())
            .and_then(|()| out.flush())
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to emit OSC 52 sequence");
                false
            }
        }
    }

    fn remove_field(&self, field: FieldId) {
        if let Ok(mut doc) = self.doc.lock() {
            doc.fields.remove(&field);
            if doc.selection == Some(field) {
                doc.selection = None;
            }
        }
    }
}
