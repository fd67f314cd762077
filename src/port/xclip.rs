//! X11 clipboard port: writes via `xclip`.
//!
//! Wraps `xclip -selection clipboard` and pipes the payload to stdin.
//! Availability is probed by opening a connection to the X display;
//! without one xclip cannot own a selection.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use x11rb::rust_connection::RustConnection;

use super::{ClipboardItem, ClipboardPort, PortError};

/// X11 implementation of [`ClipboardPort`] via `xclip`.
#[derive(Debug, Clone)]
pub struct XclipClipboard {
    program: String,
}

impl XclipClipboard {
    pub fn new() -> Self {
        Self {
            program: "xclip".to_string(),
        }
    }

    /// Use a different xclip-compatible binary.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Spawn xclip for `target`, pipe `content`, and wait for exit.
    async fn pipe(&self, target: &str, content: &[u8]) -> Result<(), PortError> {
        let mut child = Command::new(&self.program)
            .args(["-selection", "clipboard", "-t", target])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(content).await?;
            // Drop stdin to close the pipe so xclip can finish.
        }

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(PortError::Rejected(format!(
                "{} exited with status {status}",
                self.program
            )))
        }
    }
}

impl Default for XclipClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipboardPort for XclipClipboard {
    fn is_available(&self) -> bool {
        match RustConnection::connect(None) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "no X display, clipboard unavailable");
                false
            }
        }
    }

    fn supports_structured(&self) -> bool {
        true
    }

    async fn write_text(&self, text: &str) -> Result<(), PortError> {
        self.pipe("UTF8_STRING", text.as_bytes()).await
    }

    /// xclip serves a single target per process, so only the most
    /// preferred representation reaches the selection.
    async fn write_structured(&self, item: &ClipboardItem) -> Result<(), PortError> {
        let Some(first) = item.representations().first() else {
            return Err(PortError::Unsupported("empty clipboard item".into()));
        };
        if item.representations().len() > 1 {
            tracing::debug!(
                mime = %first.mime,
                dropped = item.representations().len() - 1,
                "xclip serves one target, extra representations dropped"
            );
        }
        self.pipe(&first.mime, &first.data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_io_error() {
        let port = XclipClipboard::with_program("/nonexistent/xclip-binary");
        let err = port.write_text("hello").await.unwrap_err();
        assert!(matches!(err, PortError::Io(_)));
    }

    #[tokio::test]
    async fn empty_item_is_unsupported() {
        let port = XclipClipboard::new();
        let err = port
            .write_structured(&ClipboardItem::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Unsupported(_)));
    }

    #[tokio::test]
    async fn non_zero_exit_is_rejected() {
        // `false` ignores its arguments and exits 1.
        let port = XclipClipboard::with_program("false");
        match port.write_text("hello").await {
            Err(PortError::Rejected(msg)) => assert!(msg.contains("false")),
            // Closed pipe races the exit on some systems.
            Err(PortError::Io(_)) => {}
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
