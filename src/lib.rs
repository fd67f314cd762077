//! Copy text, HTML, JSON and images to the clipboard with layered
//! fallbacks.
//!
//! [`writer::write`] is the core: one call, one best-effort copy through
//! the strategies for the requested format. [`state::Copier`] wraps it
//! with observable state for interactive front-ends. Platform access
//! goes through the [`port`] traits so both run without a real
//! clipboard in tests.

pub mod port;
pub mod state;
pub mod writer;

pub use port::Ports;
pub use state::{Copier, CopyOptions, CopyState, HistoryEntry};
pub use writer::{Blob, CopyError, CopyFormat, CopyValue, ErrorKind, WriteOptions, write};
