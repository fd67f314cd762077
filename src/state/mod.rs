//! Copy-state adapter: observable state around the clipboard writer.
//!
//! [`Copier`] runs [`writer::write`](crate::writer::write) and publishes
//! a [`CopyState`] snapshot through a `watch` channel after every
//! transition. After a successful copy the in-flight flag stays up for
//! the reset delay. A single reset timer per adapter is kept: each new
//! copy aborts the previous one, and only the latest started call may
//! schedule a reset, so an older call finishing late never touches the
//! timer of a newer one.

pub mod snapshot;

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::port::Ports;
use crate::writer::{self, CopyError, CopyValue, WriteOptions};

pub use snapshot::{CopyEvent, CopyState, HistoryEntry};

/// Default time the in-flight flag stays up after a successful copy.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(2000);

type SuccessCallback = Arc<dyn Fn(&CopyValue) + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(&CopyError) + Send + Sync>;

/// Adapter configuration.
#[derive(Clone)]
pub struct CopyOptions {
    /// How long `is_copying` stays true after a successful copy. Zero
    /// clears it as soon as the write finishes.
    pub reset_delay: Duration,
    pub keep_history: bool,
    pub on_success: Option<SuccessCallback>,
    pub on_error: Option<ErrorCallback>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            reset_delay: DEFAULT_RESET_DELAY,
            keep_history: false,
            on_success: None,
            on_error: None,
        }
    }
}

impl fmt::Debug for CopyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyOptions")
            .field("reset_delay", &self.reset_delay)
            .field("keep_history", &self.keep_history)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl CopyOptions {
    pub fn on_success(mut self, f: impl Fn(&CopyValue) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&CopyError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }
}

/// Clipboard writer with observable state.
pub struct Copier {
    ports: Ports,
    options: CopyOptions,
    state: Arc<watch::Sender<CopyState>>,
    reset_timer: Mutex<Option<JoinHandle<()>>>,
}

impl Copier {
    pub fn new(ports: Ports, options: CopyOptions) -> Self {
        let (state, _) = watch::channel(CopyState::default());
        Self {
            ports,
            options,
            state: Arc::new(state),
            reset_timer: Mutex::new(None),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> CopyState {
        self.state.borrow().clone()
    }

    /// Receiver that sees every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<CopyState> {
        self.state.subscribe()
    }

    pub fn is_copying(&self) -> bool {
        self.state.borrow().is_copying
    }

    pub fn last_copied(&self) -> Option<HistoryEntry> {
        self.state.borrow().last_copied.clone()
    }

    pub fn copy_count(&self) -> u64 {
        self.state.borrow().copy_count
    }

    /// Whether the last successful copy is younger than the reset delay.
    pub fn has_copied_recently(&self) -> bool {
        self.state
            .borrow()
            .has_copied_recently(Instant::now(), self.options.reset_delay)
    }

    /// Copy `value` and update the observable state.
    ///
    /// Failures are reported to `on_error` and returned; nothing panics
    /// or escapes otherwise.
    pub async fn copy(
        &self,
        value: impl Into<CopyValue>,
        options: &WriteOptions,
    ) -> Result<(), CopyError> {
        let value = value.into();

        self.cancel_reset();
        let mut attempt = 0;
        self.state.send_modify(|s| {
            *s = s.apply(CopyEvent::Started);
            attempt = s.attempts;
        });

        match writer::write(&self.ports, &value, options).await {
            Ok(()) => {
                let entry = HistoryEntry::now(value);
                let keep_history = self.options.keep_history;
                self.state.send_modify(|s| {
                    *s = s.apply(CopyEvent::Succeeded {
                        attempt,
                        entry: entry.clone(),
                        keep_history,
                    })
                });
                tracing::debug!(attempt, format = %options.format, "copy succeeded");
                if let Some(cb) = &self.options.on_success {
                    cb(&entry.value);
                }
                self.schedule_reset(attempt);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(attempt, format = %options.format, error = %e, "copy failed");
                self.state
                    .send_modify(|s| *s = s.apply(CopyEvent::Failed { attempt }));
                if let Some(cb) = &self.options.on_error {
                    cb(&e);
                }
                Err(e)
            }
        }
    }

    /// Clear the in-flight flag after the reset delay.
    fn schedule_reset(&self, attempt: u64) {
        let delay = self.options.reset_delay;
        if delay.is_zero() {
            self.state
                .send_modify(|s| *s = s.apply(CopyEvent::ResetElapsed { attempt }));
            return;
        }

        let Ok(mut slot) = self.reset_timer.lock() else {
            return;
        };
        // A newer call started while this one was writing; it owns the timer.
        if self.state.borrow().attempts != attempt {
            tracing::trace!(attempt, "superseded, reset left to newer call");
            return;
        }

        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.send_modify(|s| *s = s.apply(CopyEvent::ResetElapsed { attempt }));
            tracing::trace!(attempt, "copy flag reset");
        });
        if let Some(stale) = slot.replace(handle) {
            stale.abort();
        }
    }

    /// Abort the pending reset timer, if any.
    fn cancel_reset(&self) {
        if let Ok(mut slot) = self.reset_timer.lock()
            && let Some(stale) = slot.take()
        {
            stale.abort();
        }
    }
}

impl Drop for Copier {
    fn drop(&mut self) {
        self.cancel_reset();
    }
}
