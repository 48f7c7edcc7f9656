//! Progress events emitted while generating.
//!
//! Events arrive in completion order. Senders never block and never fail:
//! once the receiving side is gone, events are silently discarded.

use std::path::PathBuf;

use tokio::sync::mpsc;

use super::Artifact;

/// Something observable that happened during a generation run.
#[derive(Debug, Clone)]
pub enum Event {
    /// A source was measured and its variants are being written.
    Started {
        source: PathBuf,
        width: u32,
        height: u32,
    },
    /// One variant was written.
    Created(Artifact),
    /// A batch source does not exist and was skipped.
    Missing { source: PathBuf },
    /// A source could not be processed.
    Failed { source: PathBuf, message: String },
}

/// Sending half of a progress channel. `Progress::default()` discards
/// everything.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    tx: Option<mpsc::UnboundedSender<Event>>,
}

impl Progress {
    /// A sink that ignores all events.
    pub fn silent() -> Self {
        Self::default()
    }

    /// A connected pair. The receiver yields `None` once every clone of the
    /// returned `Progress` has been dropped.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn emit(&self, event: Event) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
