//! Immutable snapshots of one directory's listing.
//!
//! Every mutation helper returns a *new* snapshot; the previous one is never
//! edited. Callers publish the result as a whole, so two operations racing on
//! the same directory can at worst drop each other's update, never interleave
//! half-applied edits.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use super::entry::DirectoryEntry;
use super::path;

/// Ordered listing of exactly one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryCache {
    path: String,
    entries: Arc<[DirectoryEntry]>,
}

/// Folders first, then case-insensitive name, then exact name as a tiebreak.
pub fn compare_entries(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    b.is_folder()
        .cmp(&a.is_folder())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

impl DirectoryCache {
    /// Empty listing for `path`.
    pub fn empty(path: &str) -> Self {
        Self {
            path: path::normalize(path),
            entries: Arc::from(Vec::new()),
        }
    }

    /// Build a sorted snapshot. Later duplicates of an identity win.
    pub fn new(path: &str, entries: Vec<DirectoryEntry>) -> Self {
        Self {
            path: path::normalize(path),
            entries: Arc::from(sort_dedup(entries)),
        }
    }

    /// Directory this listing belongs to.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identity: &str) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|e| e.identity == identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.get(identity).is_some()
    }

    /// Total bytes of the files in this listing.
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }

    /// Snapshot with `added` merged in; an existing entry with the same
    /// identity is replaced.
    pub fn with_entries(&self, added: impl IntoIterator<Item = DirectoryEntry>) -> Self {
        let mut entries = self.entries.to_vec();
        entries.extend(added);
        Self::new(&self.path, entries)
    }

    /// Snapshot without the given identities.
    pub fn without(&self, identities: &HashSet<String>) -> Self {
        let entries: Vec<_> = self
            .entries
            .iter()
            .filter(|e| !identities.contains(&e.identity))
            .cloned()
            .collect();

        Self {
            path: self.path.clone(),
            entries: Arc::from(entries),
        }
    }

    /// Snapshot where the entry at `old_identity` now lives at
    /// `new_identity`. Returns `None` if the old entry is not cached.
    pub fn with_renamed(&self, old_identity: &str, new_identity: &str) -> Option<Self> {
        let mut entries = self.entries.to_vec();
        let entry = entries.iter_mut().find(|e| e.identity == old_identity)?;
        entry.identity = path::normalize(new_identity);
        entry.name = path::file_name(&entry.identity).to_string();
        Some(Self::new(&self.path, entries))
    }

    /// Check the folders-first / alphabetical ordering.
    pub fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| compare_entries(&w[0], &w[1]) != Ordering::Greater)
    }
}

fn sort_dedup(entries: Vec<DirectoryEntry>) -> Vec<DirectoryEntry> {
    let mut seen = HashSet::new();
    let mut unique: Vec<DirectoryEntry> = entries
        .into_iter()
        .rev()
        .filter(|e| seen.insert(e.identity.clone()))
        .collect();
    unique.sort_by(compare_entries);
    unique
}
