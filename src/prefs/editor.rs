// ABOUTME: Editing operations on the two ignore lists.
// ABOUTME: Shared by the landing screen's customize panel and the `prefs` subcommand.

use std::fmt;

use crate::api::SearchOptions;
use crate::prefs::store::NONE_SENTINEL;

/// Which ignore list an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum IgnoreList {
    #[default]
    Dirs,
    Extensions,
}

impl IgnoreList {
    pub fn label(self) -> &'static str {
        match self {
            IgnoreList::Dirs => "Ignore Directories",
            IgnoreList::Extensions => "Ignore Extensions",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            IgnoreList::Dirs => IgnoreList::Extensions,
            IgnoreList::Extensions => IgnoreList::Dirs,
        }
    }
}

impl fmt::Display for IgnoreList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl SearchOptions {
    pub fn list(&self, which: IgnoreList) -> &[String] {
        match which {
            IgnoreList::Dirs => &self.ignore_dirs,
            IgnoreList::Extensions => &self.ignore_extensions,
        }
    }

    pub fn list_mut(&mut self, which: IgnoreList) -> &mut Vec<String> {
        match which {
            IgnoreList::Dirs => &mut self.ignore_dirs,
            IgnoreList::Extensions => &mut self.ignore_extensions,
        }
    }

    /// Add a trimmed item. Returns false for blanks, duplicates and `NONE_SENTINEL`.
    pub fn add(&mut self, which: IgnoreList, item: &str) -> bool {
        let item = item.trim();
        if item.is_empty() || item == NONE_SENTINEL {
            return false;
        }
        let list = self.list_mut(which);
        if list.iter().any(|existing| existing == item) {
            return false;
        }
        list.push(item.to_string());
        true
    }

    /// Remove by index. Returns the removed item.
    pub fn remove_at(&mut self, which: IgnoreList, index: usize) -> Option<String> {
        let list = self.list_mut(which);
        (index < list.len()).then(|| list.remove(index))
    }

    /// Remove by value. Returns false when the item was not present.
    pub fn remove(&mut self, which: IgnoreList, item: &str) -> bool {
        let item = item.trim();
        let list = self.list_mut(which);
        let before = list.len();
        list.retain(|existing| existing != item);
        list.len() != before
    }

    pub fn clear(&mut self, which: IgnoreList) {
        self.list_mut(which).clear();
    }
}
