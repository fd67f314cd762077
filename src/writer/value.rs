//! Copy values, formats and per-call options.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

/// Binary data with an optional declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    data: Bytes,
    mime: Option<String>,
}

impl Blob {
    pub fn new(data: impl Into<Bytes>, mime: Option<String>) -> Self {
        Self {
            data: data.into(),
            mime: mime.filter(|m| !m.is_empty()),
        }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }
}

/// A value to copy. The variant states what the caller holds; the
/// requested [`CopyFormat`] decides how it is written.
#[derive(Debug, Clone, PartialEq)]
pub enum CopyValue {
    Text(String),
    Markup(String),
    Record(serde_json::Value),
    Blob(Blob),
}

impl CopyValue {
    /// Short name of the variant, for errors and logs.
    pub fn shape(&self) -> &'static str {
        match self {
            CopyValue::Text(_) => "text",
            CopyValue::Markup(_) => "markup",
            CopyValue::Record(_) => "record",
            CopyValue::Blob(_) => "blob",
        }
    }

    /// The string source of textual variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CopyValue::Text(s) | CopyValue::Markup(s) => Some(s),
            CopyValue::Record(_) | CopyValue::Blob(_) => None,
        }
    }
}

impl From<&str> for CopyValue {
    fn from(s: &str) -> Self {
        CopyValue::Text(s.to_string())
    }
}

impl From<String> for CopyValue {
    fn from(s: String) -> Self {
        CopyValue::Text(s)
    }
}

impl From<serde_json::Value> for CopyValue {
    fn from(v: serde_json::Value) -> Self {
        CopyValue::Record(v)
    }
}

impl From<Blob> for CopyValue {
    fn from(b: Blob) -> Self {
        CopyValue::Blob(b)
    }
}

/// Requested clipboard format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CopyFormat {
    #[default]
    Text,
    Html,
    Json,
    Image,
}

impl fmt::Display for CopyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CopyFormat::Text => "text",
            CopyFormat::Html => "html",
            CopyFormat::Json => "json",
            CopyFormat::Image => "image",
        })
    }
}

impl FromStr for CopyFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(CopyFormat::Text),
            "html" => Ok(CopyFormat::Html),
            "json" => Ok(CopyFormat::Json),
            "image" => Ok(CopyFormat::Image),
            other => Err(format!(
                "unknown format: {other} (expected: text, html, json, image)"
            )),
        }
    }
}

/// Options for a single write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    pub format: CopyFormat,
    /// Degrade to the next strategy when one fails.
    pub fallback: bool,
    /// MIME type for binary image writes, overriding the blob's own.
    pub mime_type: Option<String>,
    /// Run the legacy synthetic copy after a successful HTML write too.
    pub force_legacy: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            format: CopyFormat::Text,
            fallback: true,
            mime_type: None,
            force_legacy: false,
        }
    }
}

impl WriteOptions {
    pub fn format(format: CopyFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn without_fallback(mut self) -> Self {
        self.fallback = false;
        self
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    pub fn with_forced_legacy(mut self) -> Self {
        self.force_legacy = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_known_names() {
        for name in ["text", "html", "json", "image"] {
            let format: CopyFormat = name.parse().unwrap();
            assert_eq!(format.to_string(), name);
        }
    }

    #[test]
    fn format_rejects_unknown_names() {
        let err = "rtf".parse::<CopyFormat>().unwrap_err();
        assert!(err.contains("unknown format"));
    }

    #[test]
    fn default_options_enable_fallback() {
        let opts = WriteOptions::default();
        assert_eq!(opts.format, CopyFormat::Text);
        assert!(opts.fallback);
        assert!(opts.mime_type.is_none());
        assert!(!opts.force_legacy);
    }

    #[test]
    fn empty_blob_mime_is_treated_as_missing() {
        let blob = Blob::new(&b"x"[..], Some(String::new()));
        assert_eq!(blob.mime(), None);
    }

    #[test]
    fn textual_variants_expose_source() {
        assert_eq!(CopyValue::from("a").as_str(), Some("a"));
        assert_eq!(CopyValue::Markup("<b>a</b>".into()).as_str(), Some("<b>a</b>"));
        assert_eq!(CopyValue::Record(serde_json::json!({})).as_str(), None);
    }
}
