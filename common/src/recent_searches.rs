//! Recently submitted command palette searches.

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, Persisted, RECENT_SEARCHES_KEY};

pub const VISIBLE_RECENT_SEARCHES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastSearch {
    pub search: String,
    /// Epoch milliseconds of the last submit.
    pub timestamp: i64,
}

pub struct RecentSearches {
    entries: Persisted<Vec<LastSearch>>,
}

impl Default for RecentSearches {
    fn default() -> Self {
        Self::new()
    }
}

impl RecentSearches {
    pub fn new() -> Self {
        Self { entries: Persisted::new(RECENT_SEARCHES_KEY) }
    }

    /// Appends the search, or refreshes the timestamp of an equal one.
    pub fn submit(&mut self, store: &dyn KeyValueStore, search: &str, now_millis: i64) {
        let search = search.trim();
        if search.is_empty() {
            return;
        }
        self.entries.update(store, |entries| {
            match entries.iter_mut().find(|e| e.search == search) {
                Some(existing) => existing.timestamp = now_millis,
                None => entries.push(LastSearch { search: search.to_string(), timestamp: now_millis }),
            }
        });
    }

    pub fn remove(&mut self, store: &dyn KeyValueStore, search: &str) {
        self.entries.update(store, |entries| entries.retain(|e| e.search != search));
    }

    pub fn clear(&mut self, store: &dyn KeyValueStore) {
        self.entries.set(store, Vec::new());
    }

    /// The most recent searches first, capped for display.
    pub fn visible(&mut self, store: &dyn KeyValueStore) -> Vec<LastSearch> {
        let mut entries = self.entries.get(store).clone();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(VISIBLE_RECENT_SEARCHES);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn six_submits_leave_five_most_recent_first() {
        let store = MemoryStore::default();
        let mut recent = RecentSearches::new();
        for i in 0..6 {
            recent.submit(&store, &format!("level:error path:/{}", i), 1_000 + i);
        }
        let visible = recent.visible(&store);
        assert_eq!(visible.len(), 5);
        let searches = visible.iter().map(|e| e.search.as_str()).collect::<Vec<_>>();
        assert_eq!(
            searches,
            vec![
                "level:error path:/5",
                "level:error path:/4",
                "level:error path:/3",
                "level:error path:/2",
                "level:error path:/1",
            ]
        );
    }

    #[test]
    fn resubmit_updates_timestamp_instead_of_duplicating() {
        let store = MemoryStore::default();
        let mut recent = RecentSearches::new();
        recent.submit(&store, "level:error ", 1);
        recent.submit(&store, "status:500", 2);
        recent.submit(&store, "level:error", 3);

        let visible = recent.visible(&store);
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0], LastSearch { search: "level:error".to_string(), timestamp: 3 });
    }

    #[test]
    fn entries_survive_a_reload_from_storage() {
        let store = MemoryStore::default();
        RecentSearches::new().submit(&store, "status:500", 7);
        let mut reloaded = RecentSearches::new();
        assert_eq!(reloaded.visible(&store).len(), 1);

        reloaded.remove(&store, "status:500");
        assert!(RecentSearches::new().visible(&store).is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let store = MemoryStore::default();
        let mut recent = RecentSearches::new();
        recent.submit(&store, "a:b", 1);
        recent.clear(&store);
        assert!(recent.visible(&store).is_empty());
        assert_eq!(store.get(RECENT_SEARCHES_KEY).as_deref(), Some("[]"));
    }
}
