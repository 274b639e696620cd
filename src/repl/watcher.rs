//! Pattern-file watching on notify's background thread.

use crossbeam_channel::Sender;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};

/// What the REPL and `file --watch` react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    /// Contents of a watched file may have changed
    Changed(PathBuf),
    Failed(String),
}

/// Reduce a raw notify result to the file events worth a reload.
/// Access and metadata-only events produce nothing.
pub fn file_events(res: notify::Result<Event>) -> Vec<FileEvent> {
    match res {
        Ok(event) => match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) => {
                event.paths.into_iter().map(FileEvent::Changed).collect()
            }
            _ => Vec::new(),
        },
        Err(e) => vec![FileEvent::Failed(e.to_string())],
    }
}

pub struct FileWatcher {
    watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a watcher that forwards [`FileEvent`]s to `tx`
    pub fn new(tx: Sender<FileEvent>) -> notify::Result<Self> {
        let watcher = notify::recommended_watcher(move |res| {
            for event in file_events(res) {
                tracing::trace!(?event, "file event");
                // A dropped receiver means the session is shutting down
                let _ = tx.send(event);
            }
        })?;

        Ok(Self { watcher })
    }

    /// Watch a single pattern file
    pub fn watch<P: AsRef<Path>>(&mut self, path: P) -> notify::Result<()> {
        self.watcher
            .watch(path.as_ref(), RecursiveMode::NonRecursive)
    }
}
