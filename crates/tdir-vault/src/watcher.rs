//! Template folder watcher, used to keep a [`crate::TemplateCatalog`] fresh.
//!
//! Uses the `notify` crate for cross-platform file system events.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use tdir_core::error::{Result, TdirError};

/// Changes observed under the template folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateEvent {
    /// An entry was created or modified.
    Changed(PathBuf),
    /// An entry was deleted.
    Removed(PathBuf),
}

/// Watches a template folder recursively and emits events.
pub struct TemplateWatcher {
    _watcher: RecommendedWatcher,
    receiver: mpsc::Receiver<TemplateEvent>,
}

/// True if any component of `path` below `root` starts with a dot.
/// Paths outside `root` only have their file name checked.
fn is_hidden_under(root: &Path, path: &Path) -> bool {
    let dotted = |s: Option<&str>| s.is_some_and(|s| s.starts_with('.'));
    match path.strip_prefix(root) {
        Ok(rel) => rel.components().any(|c| dotted(c.as_os_str().to_str())),
        Err(_) => dotted(path.file_name().and_then(|n| n.to_str())),
    }
}

impl TemplateWatcher {
    /// Start watching `template_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`TdirError::Watch`] if the watcher cannot be created.
    pub fn start(template_dir: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        // Events carry canonical paths on some platforms.
        let root = template_dir
            .canonicalize()
            .unwrap_or_else(|_| template_dir.to_path_buf());

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };
            for path in &event.paths {
                if is_hidden_under(&root, path) {
                    continue;
                }
                let template_event = match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) => {
                        TemplateEvent::Changed(path.clone())
                    }
                    EventKind::Remove(_) => TemplateEvent::Removed(path.clone()),
                    _ => continue,
                };
                let _ = tx.send(template_event);
            }
        })
        .map_err(|e| TdirError::Watch(e.to_string()))?;

        watcher
            .watch(template_dir, RecursiveMode::Recursive)
            .map_err(|e| TdirError::Watch(e.to_string()))?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Wait up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TemplateEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Drain every event that is already queued. Returns how many there were.
    pub fn drain(&self) -> usize {
        self.receiver.try_iter().count()
    }
}
