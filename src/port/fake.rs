//! In-memory port doubles for tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{BlobDecoderPort, ClipboardItem, ClipboardPort, FieldId, LegacyCopyPort, PortError};
use crate::writer::value::Blob;

/// A clipboard write observed by [`FakeClipboard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    Text(String),
    Structured(ClipboardItem),
}

/// Clipboard that records writes and fails on demand.
#[derive(Debug)]
pub struct FakeClipboard {
    pub available: bool,
    pub structured: bool,
    pub fail_text: bool,
    pub fail_structured: bool,
    /// Text write that sleeps before completing.
    pub slow_text: Option<(&'static str, Duration)>,
    /// Text write that is rejected.
    pub reject_text: Option<&'static str>,
    writes: Mutex<Vec<Write>>,
}

impl FakeClipboard {
    pub fn working() -> Self {
        Self {
            available: true,
            structured: true,
            fail_text: false,
            fail_structured: false,
            slow_text: None,
            reject_text: None,
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::working()
        }
    }

    pub fn rejecting_structured() -> Self {
        Self {
            fail_structured: true,
            ..Self::working()
        }
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.writes().into_iter().rev().find_map(|w| match w {
            Write::Text(t) => Some(t),
            Write::Structured(_) => None,
        })
    }

    pub fn last_item(&self) -> Option<ClipboardItem> {
        self.writes().into_iter().rev().find_map(|w| match w {
            Write::Structured(item) => Some(item),
            Write::Text(_) => None,
        })
    }
}

#[async_trait]
impl ClipboardPort for FakeClipboard {
    fn is_available(&self) -> bool {
        self.available
    }

    fn supports_structured(&self) -> bool {
        self.structured
    }

    async fn write_text(&self, text: &str) -> Result<(), PortError> {
        if let Some((slow, delay)) = self.slow_text
            && slow == text
        {
            tokio::time::sleep(delay).await;
        }
        if self.fail_text || self.reject_text == Some(text) {
            return Err(PortError::Rejected("text write denied".into()));
        }
        self.writes.lock().unwrap().push(Write::Text(text.to_string()));
        Ok(())
    }

    async fn write_structured(&self, item: &ClipboardItem) -> Result<(), PortError> {
        if self.fail_structured {
            return Err(PortError::Rejected("structured write denied".into()));
        }
        self.writes
            .lock()
            .unwrap()
            .push(Write::Structured(item.clone()));
        Ok(())
    }
}

/// Legacy copy facility that tracks field lifetimes.
#[derive(Debug)]
pub struct FakeLegacy {
    succeed: bool,
    live: Mutex<HashSet<FieldId>>,
    contents: Mutex<Vec<(FieldId, String)>>,
    selection: Mutex<Option<FieldId>>,
    copied: Mutex<Vec<String>>,
    created: AtomicUsize,
}

impl FakeLegacy {
    fn with_result(succeed: bool) -> Self {
        Self {
            succeed,
            live: Mutex::new(HashSet::new()),
            contents: Mutex::new(Vec::new()),
            selection: Mutex::new(None),
            copied: Mutex::new(Vec::new()),
            created: AtomicUsize::new(0),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_result(true)
    }

    pub fn failing() -> Self {
        Self::with_result(false)
    }

    pub fn live_fields(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Texts the copy command ran against (successful or not).
    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }
}

impl LegacyCopyPort for FakeLegacy {
    fn create_field(&self) -> Result<FieldId, PortError> {
        let id = FieldId(uuid::Uuid::new_v4());
        self.live.lock().unwrap().insert(id);
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    fn set_content(&self, field: FieldId, content: &str) {
        self.contents
            .lock()
            .unwrap()
            .push((field, content.to_string()));
    }

    fn select_all(&self, field: FieldId) {
        *self.selection.lock().unwrap() = Some(field);
    }

    fn exec_copy(&self) -> bool {
        let selected = *self.selection.lock().unwrap();
        if let Some(id) = selected {
            let text = self
                .contents
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(f, _)| *f == id)
                .map(|(_, t)| t.clone());
            if let Some(text) = text {
                self.copied.lock().unwrap().push(text);
            }
        }
        self.succeed
    }

    fn remove_field(&self, field: FieldId) {
        self.live.lock().unwrap().remove(&field);
    }
}

/// Decoder that counts invocations.
#[derive(Debug, Default)]
pub struct CountingDecoder {
    calls: AtomicUsize,
}

impl CountingDecoder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobDecoderPort for CountingDecoder {
    async fn read_as_data_url(&self, blob: &Blob) -> Result<String, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(super::data_url::to_data_url(blob))
    }
}
