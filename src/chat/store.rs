//! The archive of past sessions plus the one session being appended to.

use crate::chat::session::{Session, Welcome};
use crate::error::{Error, Result};
use crate::observability::{SESSIONS_ARCHIVED, SESSIONS_DELETED};

/// Archived sessions plus exactly one current session.
///
/// The current session is never a member of the archive.  Opening an
/// archived session copies it into `current` and remembers the slot it came
/// from; archiving it again writes it back to that slot instead of appending
/// a duplicate.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    archived: Vec<Session>,
    current: Session,
    origin: Option<usize>,
}

impl SessionStore {
    /// An empty archive and an empty, untitled current session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The session receiving new interactions.
    pub fn current(&self) -> &Session {
        &self.current
    }

    pub(crate) fn current_mut(&mut self) -> &mut Session {
        &mut self.current
    }

    /// Archived sessions in the order they were archived.
    pub fn archived(&self) -> &[Session] {
        &self.archived
    }

    /// The archive slot the current session was opened from, if any.
    pub fn origin(&self) -> Option<usize> {
        self.origin
    }

    /// Ordinal for the fallback title of the session being started now.
    pub fn next_ordinal(&self) -> usize {
        self.archived.len() + 1
    }

    /// Archives the current session if it has any interactions and replaces
    /// it with a fresh draft holding only `welcome`.
    pub fn start_new(&mut self, welcome: &Welcome) {
        self.archive_current();
        self.current = Session::initialize(welcome);
    }

    /// Removes and returns the archived session at `index`.
    ///
    /// The current session is untouched; if it was opened from `index` it is
    /// detached and will be appended when next archived.
    pub fn delete(&mut self, index: usize) -> Result<Session> {
        self.check_index(index)?;
        let removed = self.archived.remove(index);
        self.origin = match self.origin {
            Some(origin) if origin == index => None,
            Some(origin) if origin > index => Some(origin - 1),
            origin => origin,
        };
        SESSIONS_DELETED.click();
        Ok(removed)
    }

    /// Archives the current session and makes a copy of the archived
    /// session at `index` current.
    ///
    /// An untitled draft that was not itself opened from the archive holds
    /// nothing the user asked, so it is discarded instead of archived.
    pub fn open(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if self.origin.is_none() && self.current.title().is_none() {
            self.current = Session::new();
        }
        // Archiving either writes back in place or appends, so `index` stays valid.
        self.archive_current();
        self.current = self.archived[index].clone();
        self.origin = Some(index);
        Ok(())
    }

    fn archive_current(&mut self) {
        let current = std::mem::take(&mut self.current);
        match self.origin.take() {
            Some(slot) => {
                self.archived[slot] = current;
                SESSIONS_ARCHIVED.click();
            }
            None if !current.is_empty() => {
                self.archived.push(current);
                SESSIONS_ARCHIVED.click();
            }
            None => {}
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.archived.len() {
            Ok(())
        } else {
            Err(Error::not_found(
                format!(
                    "no archived session at that position ({} archived)",
                    self.archived.len()
                ),
                Some("session".to_string()),
                Some(index),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::interaction::Interaction;

    fn welcome() -> Welcome {
        Welcome::new("Bot", "hi")
    }

    fn store_with_archive(titles: &[&str]) -> SessionStore {
        let mut store = SessionStore::new();
        for title in titles {
            let ordinal = store.next_ordinal();
            store
                .current_mut()
                .record(Interaction::new(*title, "answer"), &welcome(), ordinal);
            store.start_new(&welcome());
        }
        store
    }

    fn titles(store: &SessionStore) -> Vec<&str> {
        store
            .archived()
            .iter()
            .map(|session| session.display_title())
            .collect()
    }

    #[test]
    fn start_new_on_empty_current_archives_nothing() {
        let mut store = SessionStore::new();
        store.start_new(&welcome());
        assert!(store.archived().is_empty());
        assert_eq!(store.current().len(), 1);
    }

    #[test]
    fn start_new_archives_snapshot() {
        let mut store = SessionStore::new();
        store
            .current_mut()
            .record(Interaction::new("Hello", "Hi"), &welcome(), 1);
        let snapshot = store.current().clone();
        store.start_new(&welcome());
        assert_eq!(store.archived(), &[snapshot]);
        assert_eq!(store.current().len(), 1);
        assert!(store.current().title().is_none());
    }

    #[test]
    fn welcome_only_draft_is_archived() {
        let mut store = SessionStore::new();
        store.start_new(&welcome());
        store.start_new(&welcome());
        assert_eq!(store.archived().len(), 1);
        assert_eq!(store.archived()[0].display_title(), "New session");
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut store = store_with_archive(&["a", "b", "c"]);
        let current = store.current().clone();
        let removed = store.delete(1).unwrap();
        assert_eq!(removed.title(), Some("b..."));
        assert_eq!(titles(&store), vec!["a...", "c..."]);
        assert_eq!(store.current(), &current);
    }

    #[test]
    fn delete_out_of_range_is_not_found() {
        let mut store = store_with_archive(&["a"]);
        let err = store.delete(1).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.archived().len(), 1);
    }

    #[test]
    fn open_then_start_new_writes_back() {
        let mut store = store_with_archive(&["a", "b"]);
        store.open(0).unwrap();
        assert_eq!(store.archived().len(), 2);
        assert_eq!(store.origin(), Some(0));
        assert_eq!(store.current().title(), Some("a..."));

        store
            .current_mut()
            .record(Interaction::new("more", "answer"), &welcome(), 3);
        store.start_new(&welcome());
        assert_eq!(store.archived().len(), 2);
        assert_eq!(store.archived()[0].len(), 3);
        assert_eq!(store.archived()[0].title(), Some("a..."));
        assert_eq!(store.origin(), None);
    }

    #[test]
    fn open_switches_between_archived_sessions() {
        let mut store = store_with_archive(&["a", "b"]);
        store.open(0).unwrap();
        store.open(1).unwrap();
        assert_eq!(store.origin(), Some(1));
        assert_eq!(store.current().title(), Some("b..."));
        assert_eq!(titles(&store), vec!["a...", "b..."]);
    }

    #[test]
    fn open_discards_welcome_only_draft() {
        let mut store = store_with_archive(&["a"]);
        for _ in 0..5 {
            store.open(0).unwrap();
            store.start_new(&welcome());
        }
        assert_eq!(titles(&store), vec!["a..."]);
        assert_eq!(store.current().len(), 1);
    }

    #[test]
    fn open_keeps_titled_draft() {
        let mut store = store_with_archive(&["a"]);
        let ordinal = store.next_ordinal();
        store
            .current_mut()
            .record(Interaction::new("b", "answer"), &welcome(), ordinal);
        store.open(0).unwrap();
        assert_eq!(titles(&store), vec!["a...", "b..."]);
    }

    #[test]
    fn open_writes_back_untitled_origin() {
        let mut store = SessionStore::new();
        store.start_new(&welcome());
        store.start_new(&welcome());
        store
            .current_mut()
            .record(Interaction::new("b", "answer"), &welcome(), 2);
        store.start_new(&welcome());
        store.open(0).unwrap();
        store.open(1).unwrap();
        assert_eq!(titles(&store), vec!["New session", "b..."]);
        assert_eq!(store.origin(), Some(1));
    }

    #[test]
    fn deleting_origin_detaches_current() {
        let mut store = store_with_archive(&["a", "b"]);
        store.open(1).unwrap();
        store.delete(1).unwrap();
        assert_eq!(store.origin(), None);
        assert_eq!(store.current().title(), Some("b..."));
        store.start_new(&welcome());
        assert_eq!(store.archived().last().unwrap().title(), Some("b..."));
    }

    #[test]
    fn deleting_before_origin_shifts_it() {
        let mut store = store_with_archive(&["a", "b"]);
        store.open(1).unwrap();
        store.delete(0).unwrap();
        assert_eq!(store.origin(), Some(0));
        store.start_new(&welcome());
        assert_eq!(store.archived()[0].title(), Some("b..."));
    }

    #[test]
    fn open_out_of_range_keeps_current() {
        let mut store = store_with_archive(&["a"]);
        let current = store.current().clone();
        assert!(store.open(5).unwrap_err().is_not_found());
        assert_eq!(store.current(), &current);
    }
}
