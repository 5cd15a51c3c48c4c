use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use playground::TextDocument;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shader file on disk that reports every change through a callback.
///
/// The parent directory is watched rather than the file itself so editors
/// that save by writing a temp file and renaming it are still seen.
pub struct WatchedDocument {
    path: PathBuf,
    _watcher: PollWatcher,
}

impl std::fmt::Debug for WatchedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchedDocument")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl WatchedDocument {
    pub fn open<F>(path: &Path, on_edit: F) -> Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let path = path
            .canonicalize()
            .with_context(|| format!("shader file not found: {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_os_string())
            .with_context(|| format!("shader path has no file name: {}", path.display()))?;
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .with_context(|| format!("shader path has no parent: {}", path.display()))?;

        let mut watcher = PollWatcher::new(
            move |result: notify::Result<Event>| match result {
                Ok(event) => {
                    if touches_file(&event, &filename) {
                        tracing::trace!(kind = ?event.kind, "shader file changed");
                        on_edit();
                    }
                }
                Err(err) => tracing::warn!("file watcher error: {err}"),
            },
            Config::default()
                .with_poll_interval(POLL_INTERVAL)
                .with_compare_contents(true),
        )
        .context("failed to create file watcher")?;
        watcher
            .watch(&directory, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {}", directory.display()))?;

        tracing::info!(path = %path.display(), "watching shader");
        Ok(Self {
            path,
            _watcher: watcher,
        })
    }
}

impl TextDocument for WatchedDocument {
    fn text(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))
    }
}

/// Matches by file name so renames onto the watched path count as edits.
fn touches_file(event: &Event, filename: &OsString) -> bool {
    let relevant = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    );
    relevant
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(filename.as_os_str()))
}
