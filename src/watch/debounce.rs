use std::path::{Path, PathBuf};
use std::time::Duration;

use rustc_hash::FxHashMap;

pub(super) const DEBOUNCE_MS: u64 = 300;
pub(super) const RECOMPUTE_COOLDOWN_MS: u64 = 800;

/// What happened to a watched file within the current debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) const fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Pure debouncer: only handles timing and event deduplication.
/// No business logic, no global state access.
pub(super) struct Debouncer {
    /// Path → ChangeKind (dedup is free via HashMap key uniqueness)
    pub(super) changes: FxHashMap<PathBuf, ChangeKind>,
    pub(super) last_event: Option<std::time::Instant>,
    pub(super) last_recompute: Option<std::time::Instant>,
}

impl Debouncer {
    pub(super) fn new() -> Self {
        Self {
            changes: FxHashMap::default(),
            last_event: None,
            last_recompute: None,
        }
    }

    /// Add a notify event, applying dedup rules:
    /// - Remove + Create/Modify → Create/Modify (file was restored)
    /// - Create/Modify + Remove → Remove (file was deleted)
    /// - Same type events: first event wins
    pub(super) fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Modify(modify) => {
                // Ignore metadata-only changes (mtime/atime/chmod noise)
                // may trigger endless recompute loops
                if matches!(modify, notify::event::ModifyKind::Metadata(_)) {
                    return;
                }
                ChangeKind::Modified
            }
            _ => return,
        };

        crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }

            let path = path.clone();

            if let Some(&existing) = self.changes.get(&path) {
                // State transitions:
                // - Removed -> Created/Modified: restored, use new event
                // - Modified -> Removed: deleted, upgrade to Removed
                // - Created -> Removed: appeared then vanished, discard (no-op)
                // - otherwise: first event wins
                match (existing, kind) {
                    (ChangeKind::Removed, ChangeKind::Created | ChangeKind::Modified) => {
                        crate::debug!("watch"; "restore {}->created: {}", existing.label(), path.display());
                        self.changes.insert(path, kind);
                    }
                    (ChangeKind::Modified, ChangeKind::Removed) => {
                        crate::debug!("watch"; "upgrade modified->removed: {}", path.display());
                        self.changes.insert(path, ChangeKind::Removed);
                    }
                    (ChangeKind::Created, ChangeKind::Removed) => {
                        crate::debug!("watch"; "discard created+removed: {}", path.display());
                        self.changes.remove(&path);
                    }
                    _ => {
                        // Same kind or other combos (Created+Modified, etc.) → first wins
                        continue;
                    }
                }
                self.last_event = Some(std::time::Instant::now());
                continue;
            }

            crate::debug!("watch"; "event {}: {}", kind.label(), path.display());
            self.changes.insert(path, kind);
            self.last_event = Some(std::time::Instant::now());
        }
    }

    /// Take raw events if debounce + cooldown elapsed.
    /// Returns raw events without any business logic applied.
    pub(super) fn take_if_ready(&mut self) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        if !self.is_ready() {
            return None;
        }

        let changes = std::mem::take(&mut self.changes);
        self.last_event = None;

        if changes.is_empty() {
            return None;
        }

        self.last_recompute = Some(std::time::Instant::now());
        Some(changes)
    }

    pub(super) fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };

        if last_event.elapsed() < Duration::from_millis(DEBOUNCE_MS) {
            return false;
        }

        if let Some(last_recompute) = self.last_recompute
            && last_recompute.elapsed() < Duration::from_millis(RECOMPUTE_COOLDOWN_MS)
        {
            return false;
        }

        !self.changes.is_empty()
    }

    /// Precise sleep duration until next possible ready time.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };

        let debounce_remaining =
            Duration::from_millis(DEBOUNCE_MS).saturating_sub(last_event.elapsed());

        let cooldown_remaining = self
            .last_recompute
            .map(|t| Duration::from_millis(RECOMPUTE_COOLDOWN_MS).saturating_sub(t.elapsed()))
            .unwrap_or(Duration::ZERO);

        debounce_remaining
            .max(cooldown_remaining)
            .max(Duration::from_millis(1))
    }
}

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
        notify::Event {
            kind,
            paths: paths.into_iter().map(PathBuf::from).collect(),
            attrs: notify::event::EventAttributes::new(),
        }
    }

    fn modify_kind() -> notify::EventKind {
        notify::EventKind::Modify(notify::event::ModifyKind::Data(
            notify::event::DataChange::Any,
        ))
    }

    fn create_kind() -> notify::EventKind {
        notify::EventKind::Create(notify::event::CreateKind::File)
    }

    fn remove_kind() -> notify::EventKind {
        notify::EventKind::Remove(notify::event::RemoveKind::File)
    }

    /// Force the debouncer into a ready state without sleeping.
    fn make_ready(debouncer: &mut Debouncer) {
        debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS + 50));
        debouncer.last_recompute = None;
    }

    #[test]
    fn test_two_events_coalesce_into_one_batch() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(vec!["/src/a.pug"], modify_kind()));
        debouncer.add_event(&make_event(vec!["/src/b.pug"], modify_kind()));

        make_ready(&mut debouncer);
        let changes = debouncer.take_if_ready().unwrap();
        assert_eq!(changes.len(), 2);

        // Exactly one batch: a second take yields nothing
        make_ready(&mut debouncer);
        debouncer.last_event = None;
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_duplicate_path_dedups() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(vec!["/src/a.pug"], modify_kind()));
        debouncer.add_event(&make_event(vec!["/src/a.pug"], modify_kind()));

        make_ready(&mut debouncer);
        let changes = debouncer.take_if_ready().unwrap();
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_created_then_removed_discarded() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(vec!["/src/tmp.pug"], create_kind()));
        debouncer.add_event(&make_event(vec!["/src/tmp.pug"], remove_kind()));

        make_ready(&mut debouncer);
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_modified_then_removed_upgrades() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(vec!["/src/a.pug"], modify_kind()));
        debouncer.add_event(&make_event(vec!["/src/a.pug"], remove_kind()));

        make_ready(&mut debouncer);
        let changes = debouncer.take_if_ready().unwrap();
        assert_eq!(
            changes.get(&PathBuf::from("/src/a.pug")),
            Some(&ChangeKind::Removed)
        );
    }

    #[test]
    fn test_removed_then_created_restores() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(vec!["/src/a.pug"], remove_kind()));
        debouncer.add_event(&make_event(vec!["/src/a.pug"], create_kind()));

        make_ready(&mut debouncer);
        let changes = debouncer.take_if_ready().unwrap();
        assert_eq!(
            changes.get(&PathBuf::from("/src/a.pug")),
            Some(&ChangeKind::Created)
        );
    }

    #[test]
    fn test_temp_files_ignored() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(vec!["/src/.a.pug.swp"], modify_kind()));
        debouncer.add_event(&make_event(vec!["/src/a.pug~"], modify_kind()));
        debouncer.add_event(&make_event(vec!["/src/a.tmp"], modify_kind()));

        assert!(debouncer.changes.is_empty());
    }

    #[test]
    fn test_metadata_changes_ignored() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(
            vec!["/src/a.pug"],
            notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
                notify::event::MetadataKind::Any,
            )),
        ));
        assert!(debouncer.changes.is_empty());
    }

    #[test]
    fn test_not_ready_within_debounce_window() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(vec!["/src/a.pug"], modify_kind()));
        // Event just arrived: still inside the debounce window
        assert!(!debouncer.is_ready());
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_cooldown_blocks_ready() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(vec!["/src/a.pug"], modify_kind()));
        make_ready(&mut debouncer);
        debouncer.last_recompute = Some(Instant::now());

        assert!(!debouncer.is_ready());
    }

    #[test]
    fn test_sleep_duration_idle() {
        let debouncer = Debouncer::new();
        // Nothing pending: sleep effectively forever
        assert!(debouncer.sleep_duration() >= Duration::from_secs(3600));
    }
}
