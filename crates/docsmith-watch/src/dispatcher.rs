//! Applies change batches to a [`Docsmith`] pipeline.
//!
//! | Change                                   | Action             |
//! |------------------------------------------|--------------------|
//! | source created or modified               | `process_file`     |
//! | excluded, hidden or shadowed source      | ignored            |
//! | source removed                           | full `initialize`  |
//! | config file created, modified or removed | full `initialize`  |
//! | directory created or removed             | full `initialize`  |
//!
//! After a batch that changed anything, the snapshot is rebuilt with
//! `get_docs_data` and handed to the publish callback.

use std::path::{Path, PathBuf};

use docsmith_core::{DocsData, Docsmith};

use crate::error::WatchError;
use crate::event::{ChangeEvent, ChangeKind, ChangeReceiver};

/// What a batch did to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Nothing relevant changed.
    Unchanged,
    /// Individual files were re-parsed.
    Updated(usize),
    /// State was rebuilt from disk.
    Reinitialized,
}

/// Drives incremental updates from change events.
pub struct Dispatcher {
    docsmith: Docsmith,
    root_dir: PathBuf,
}

impl Dispatcher {
    /// Wrap an (ideally initialized) pipeline rooted at `root_dir`.
    pub fn new(docsmith: Docsmith, root_dir: impl Into<PathBuf>) -> Self {
        Self {
            docsmith,
            root_dir: root_dir.into(),
        }
    }

    pub fn docsmith(&self) -> &Docsmith {
        &self.docsmith
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Apply one batch of changes.
    ///
    /// A file that fails to re-parse keeps its previous document and is
    /// logged; the rest of the batch still applies. A failed full
    /// initialization is returned as an error and leaves the previous
    /// state in place.
    pub fn apply(&mut self, events: &[ChangeEvent]) -> Result<BatchOutcome, WatchError> {
        if events.iter().any(|e| self.needs_reinitialize(e)) {
            tracing::info!(events = events.len(), "Reinitializing content");
            self.docsmith.initialize(&self.root_dir)?;
            return Ok(BatchOutcome::Reinitialized);
        }

        let mut updated = 0;
        for event in events {
            if !self.docsmith.is_source_file(&event.path) {
                continue;
            }
            match self.docsmith.process_file(&self.root_dir, &event.path) {
                Ok(()) => {
                    tracing::info!(path = %event.path.display(), "Document updated");
                    updated += 1;
                }
                Err(e) if e.is_ignored_source() => {
                    tracing::debug!(path = %event.path.display(), reason = %e, "Ignoring file");
                }
                Err(e) => {
                    tracing::warn!(path = %event.path.display(), error = %e, "Keeping previous document");
                }
            }
        }

        Ok(if updated == 0 {
            BatchOutcome::Unchanged
        } else {
            BatchOutcome::Updated(updated)
        })
    }

    /// Apply a batch and return the fresh snapshot if anything changed.
    pub fn apply_and_snapshot(
        &mut self,
        events: &[ChangeEvent],
    ) -> Result<Option<DocsData>, WatchError> {
        match self.apply(events)? {
            BatchOutcome::Unchanged => Ok(None),
            BatchOutcome::Updated(_) | BatchOutcome::Reinitialized => {
                Ok(Some(self.docsmith.get_docs_data()?))
            }
        }
    }

    /// Process batches until the receiver closes, publishing each new snapshot.
    pub fn run(&mut self, receiver: &ChangeReceiver, mut publish: impl FnMut(&DocsData)) {
        while let Some(batch) = receiver.recv_batch() {
            tracing::debug!(events = batch.len(), "Change batch");
            match self.apply_and_snapshot(&batch) {
                Ok(Some(data)) => publish(&data),
                Ok(None) => {}
                Err(e) => tracing::error!(error = %e, "Update failed; previous snapshot kept"),
            }
        }
    }

    fn needs_reinitialize(&self, event: &ChangeEvent) -> bool {
        if self.docsmith.is_config_file(&event.path) {
            return true;
        }
        match event.kind {
            ChangeKind::Removed => true,
            ChangeKind::Created => event.path.is_dir(),
            ChangeKind::Modified => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use docsmith_core::{DocsmithOptions, RawProcessor};
    use pretty_assertions::assert_eq;

    use super::*;

    fn create_test_dir() -> tempfile::TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("docs")).unwrap();
        temp_dir
    }

    fn dispatcher(root: &Path) -> Dispatcher {
        let mut docsmith = Docsmith::builder().processor(RawProcessor).build().unwrap();
        docsmith.initialize(root).unwrap();
        Dispatcher::new(docsmith, root)
    }

    #[test]
    fn test_modified_source_is_reprocessed() {
        let temp_dir = create_test_dir();
        let root = temp_dir.path();
        fs::write(root.join("docs/a.md"), "old").unwrap();
        let mut dispatcher = dispatcher(root);

        fs::write(root.join("docs/a.md"), "new").unwrap();
        let outcome = dispatcher
            .apply(&[ChangeEvent::new(root.join("docs/a.md"), ChangeKind::Modified)])
            .unwrap();

        assert_eq!(outcome, BatchOutcome::Updated(1));
        assert_eq!(dispatcher.docsmith().get_doc("a").unwrap().content, "new");
    }

    #[test]
    fn test_removed_source_reinitializes() {
        let temp_dir = create_test_dir();
        let root = temp_dir.path();
        fs::write(root.join("docs/a.md"), "a").unwrap();
        fs::write(root.join("docs/b.md"), "b").unwrap();
        let mut dispatcher = dispatcher(root);

        fs::remove_file(root.join("docs/b.md")).unwrap();
        let data = dispatcher
            .apply_and_snapshot(&[ChangeEvent::new(root.join("docs/b.md"), ChangeKind::Removed)])
            .unwrap()
            .unwrap();

        assert_eq!(data.docs.len(), 1);
        assert!(dispatcher.docsmith().get_doc("b").is_none());
        assert!(data.docs[0].navigation.next.is_none());
    }

    #[test]
    fn test_config_change_reinitializes() {
        let temp_dir = create_test_dir();
        let root = temp_dir.path();
        fs::write(root.join("docs/a.md"), "a").unwrap();
        fs::write(root.join("docs/b.md"), "b").unwrap();
        let mut dispatcher = dispatcher(root);

        let config = root.join("docs/docs.config.json");
        fs::write(&config, r#"{"order": ["b"]}"#).unwrap();
        let data = dispatcher
            .apply_and_snapshot(&[ChangeEvent::new(config, ChangeKind::Created)])
            .unwrap()
            .unwrap();

        let names: Vec<&str> = data.tree.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_irrelevant_batch_unchanged() {
        let temp_dir = create_test_dir();
        let root = temp_dir.path();
        let mut dispatcher = dispatcher(root);

        let result = dispatcher
            .apply_and_snapshot(&[ChangeEvent::new(root.join("docs/img.png"), ChangeKind::Modified)])
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_bad_file_keeps_previous_document() {
        let temp_dir = create_test_dir();
        let root = temp_dir.path();
        fs::write(root.join("docs/a.md"), "---\ntitle: Good\n---\n").unwrap();
        let mut dispatcher = dispatcher(root);

        fs::write(root.join("docs/a.md"), "---\ntitle: [bad\n---\n").unwrap();
        let outcome = dispatcher
            .apply(&[ChangeEvent::new(root.join("docs/a.md"), ChangeKind::Modified)])
            .unwrap();

        assert_eq!(outcome, BatchOutcome::Unchanged);
        assert_eq!(dispatcher.docsmith().get_doc("a").unwrap().title, "Good");
    }

    #[test]
    fn test_excluded_source_not_published() {
        let temp_dir = create_test_dir();
        let root = temp_dir.path();
        fs::write(root.join("docs/a.md"), "a").unwrap();
        let options = DocsmithOptions {
            exclude: vec!["drafts/**".to_owned()],
            ..DocsmithOptions::default()
        };
        let mut docsmith = Docsmith::builder()
            .options(options)
            .processor(RawProcessor)
            .build()
            .unwrap();
        docsmith.initialize(root).unwrap();
        let mut dispatcher = Dispatcher::new(docsmith, root);

        fs::create_dir_all(root.join("docs/drafts")).unwrap();
        fs::write(root.join("docs/drafts/wip.md"), "wip").unwrap();
        let result = dispatcher
            .apply_and_snapshot(&[ChangeEvent::new(
                root.join("docs/drafts/wip.md"),
                ChangeKind::Created,
            )])
            .unwrap();

        assert!(result.is_none());
        let slugs: Vec<&str> = dispatcher.docsmith().docs().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a"]);
    }

    #[test]
    fn test_shadowed_source_edit_ignored() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("first")).unwrap();
        fs::create_dir_all(root.join("second")).unwrap();
        fs::write(root.join("first/a.md"), "from first").unwrap();
        fs::write(root.join("second/a.md"), "from second").unwrap();
        let options = DocsmithOptions {
            folders: vec!["first".into(), "second".into()],
            ..DocsmithOptions::default()
        };
        let mut docsmith = Docsmith::builder()
            .options(options)
            .processor(RawProcessor)
            .build()
            .unwrap();
        docsmith.initialize(root).unwrap();
        let mut dispatcher = Dispatcher::new(docsmith, root);

        fs::write(root.join("second/a.md"), "from second, edited").unwrap();
        let outcome = dispatcher
            .apply(&[ChangeEvent::new(root.join("second/a.md"), ChangeKind::Modified)])
            .unwrap();

        assert_eq!(outcome, BatchOutcome::Unchanged);
        assert_eq!(dispatcher.docsmith().get_doc("a").unwrap().content, "from first");
    }

    #[test]
    fn test_run_publishes_until_closed() {
        let temp_dir = create_test_dir();
        let root = temp_dir.path();
        fs::write(root.join("docs/a.md"), "a").unwrap();
        let mut dispatcher = dispatcher(root);

        let (tx, rx) = std::sync::mpsc::channel();
        let receiver = ChangeReceiver::new(rx);
        fs::write(root.join("docs/b.md"), "b").unwrap();
        tx.send(ChangeEvent::new(root.join("docs/b.md"), ChangeKind::Created))
            .unwrap();
        drop(tx);

        let mut published = Vec::new();
        dispatcher.run(&receiver, |data| published.push(data.docs.len()));

        assert_eq!(published, vec![2]);
    }
}
