use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use tokio::sync::mpsc;

use crate::event::Event;
use crate::source::Source;

/// Watches the treemap input and asks the app to reload when it changes.
///
/// A JSON document is watched through its parent directory (editors tend to
/// replace files by rename), filtered down to the file itself. A scanned
/// directory is watched recursively, minus ignored components.
pub struct InputWatcher {
    /// Whether the watcher is currently forwarding events.
    active: Arc<AtomicBool>,
    /// Handle to the debouncer (dropped to stop watching).
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl InputWatcher {
    pub fn new(
        source: &Source,
        debounce_duration: Duration,
        ignore_patterns: Vec<String>,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> notify::Result<Self> {
        let active = Arc::new(AtomicBool::new(true));
        let active_clone = active.clone();

        let (watch_root, mode, only_file) = match source {
            Source::Json(file) => {
                let parent = file
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                (parent, notify::RecursiveMode::NonRecursive, Some(file.clone()))
            }
            Source::Directory(dir) => (dir.clone(), notify::RecursiveMode::Recursive, None),
        };

        // Event paths are absolute; only the part below the root is checked
        // against the ignore list.
        let root_abs = watch_root
            .canonicalize()
            .unwrap_or_else(|_| watch_root.clone());

        let mut debouncer = new_debouncer(
            debounce_duration,
            move |result: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
                if !active_clone.load(Ordering::Relaxed) {
                    return;
                }

                match result {
                    Ok(events) => {
                        let paths: Vec<PathBuf> = events
                            .iter()
                            .filter(|e| e.kind == DebouncedEventKind::Any)
                            .map(|e| e.path.clone())
                            .filter(|p| {
                                is_relevant(p, &root_abs, only_file.as_deref(), &ignore_patterns)
                            })
                            .collect();

                        if paths.is_empty() {
                            return;
                        }
                        let _ = event_tx.send(Event::InputChanged(paths));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "input watcher error");
                    }
                }
            },
        )?;

        debouncer.watcher().watch(&watch_root, mode)?;
        tracing::debug!(path = %watch_root.display(), "watching input");

        Ok(Self {
            active,
            _debouncer: debouncer,
        })
    }

    /// Pause event forwarding (watcher stays alive to avoid re-creating inotify watches).
    pub fn pause(&self) {
        self.active.store(false, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.active.store(true, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

/// Whether a changed path should trigger a reload.
fn is_relevant(
    path: &Path,
    root: &Path,
    only_file: Option<&Path>,
    ignore_patterns: &[String],
) -> bool {
    match only_file {
        Some(file) => same_file_name(path, file),
        None => !should_ignore(path.strip_prefix(root).unwrap_or(path), ignore_patterns),
    }
}

/// Compare by file name under the same parent; watcher paths are absolute
/// while the input path may be relative.
fn same_file_name(changed: &Path, file: &Path) -> bool {
    changed == file || (changed.is_absolute() && changed.file_name() == file.file_name())
}

/// A path is ignored if any of its components match any ignore pattern exactly.
pub fn should_ignore(path: &Path, patterns: &[String]) -> bool {
    path.components().any(|component| match component {
        std::path::Component::Normal(name) => {
            let name_str = name.to_string_lossy();
            patterns.iter().any(|pattern| name_str == *pattern)
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> Vec<String> {
        vec![".git".to_string(), "node_modules".to_string()]
    }

    #[test]
    fn should_ignore_matching_component() {
        assert!(should_ignore(Path::new("/repo/.git/HEAD"), &patterns()));
        assert!(should_ignore(
            Path::new("/repo/web/node_modules/x/index.js"),
            &patterns()
        ));
    }

    #[test]
    fn should_not_ignore_partial_names() {
        assert!(!should_ignore(Path::new("/repo/.github/ci.yml"), &patterns()));
        assert!(!should_ignore(Path::new("/repo/src/main.rs"), &patterns()));
    }

    #[test]
    fn json_input_only_reacts_to_its_file() {
        let file = Path::new("data/app.json");
        let root = Path::new("/abs/data");
        assert!(is_relevant(Path::new("/abs/data/app.json"), root, Some(file), &[]));
        assert!(!is_relevant(Path::new("/abs/data/other.json"), root, Some(file), &[]));
    }

    #[test]
    fn directory_input_uses_ignore_list() {
        let root = Path::new("/repo");
        assert!(is_relevant(Path::new("/repo/src/a.rs"), root, None, &patterns()));
        assert!(!is_relevant(Path::new("/repo/.git/index"), root, None, &patterns()));
    }

    #[test]
    fn ignored_names_above_the_root_do_not_count() {
        let ignore = vec!["target".to_string()];
        let root = Path::new("/home/u/proj/target/release");
        assert!(is_relevant(
            Path::new("/home/u/proj/target/release/app.bin"),
            root,
            None,
            &ignore
        ));
        assert!(!is_relevant(
            Path::new("/home/u/proj/target/release/target/x.o"),
            root,
            None,
            &ignore
        ));
    }

    #[test]
    fn watcher_starts_on_directory_and_pauses() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let watcher = InputWatcher::new(
            &Source::Directory(dir.path().to_path_buf()),
            Duration::from_millis(50),
            patterns(),
            tx,
        )
        .unwrap();
        assert!(watcher.is_active());
        watcher.pause();
        assert!(!watcher.is_active());
        watcher.resume();
        assert!(watcher.is_active());
    }
}
