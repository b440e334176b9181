use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Script tags discovered per element, shared by every document in a run.
///
/// Cloning is cheap and yields a handle to the same map. Entries are never
/// invalidated. Two tasks racing on the same element may both fetch; their
/// results are unioned, and since they are computed from the same page the
/// union equals either one.
#[derive(Debug, Clone, Default)]
pub struct ScriptUrlCache {
    entries: Arc<DashMap<String, BTreeSet<String>>>,
}

impl ScriptUrlCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, element: &str) -> Option<BTreeSet<String>> {
        self.entries.get(element).map(|tags| tags.value().clone())
    }

    /// Merges `tags` into the entry for `element`.
    pub fn insert(&self, element: &str, tags: BTreeSet<String>) {
        self.entries.entry(element.to_string()).or_default().extend(tags);
    }

    pub fn contains(&self, element: &str) -> bool {
        self.entries.contains_key(element)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn miss_then_hit() {
        let cache = ScriptUrlCache::new();
        assert!(cache.get("amp-carousel").is_none());
        cache.insert("amp-carousel", tags(&["<a>"]));
        assert_eq!(cache.get("amp-carousel"), Some(tags(&["<a>"])));
        assert!(cache.contains("amp-carousel"));
    }

    #[test]
    fn racing_inserts_union_per_key() {
        let cache = ScriptUrlCache::new();
        cache.insert("amp-list", tags(&["<a>", "<b>"]));
        cache.insert("amp-list", tags(&["<b>", "<c>"]));
        assert_eq!(cache.get("amp-list"), Some(tags(&["<a>", "<b>", "<c>"])));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clones_share_entries() {
        let cache = ScriptUrlCache::new();
        let handle = cache.clone();
        handle.insert("amp-bind", tags(&["<x>"]));
        assert!(cache.contains("amp-bind"));
        assert!(!cache.is_empty());
    }

    #[test]
    fn concurrent_writers_do_not_lose_tags() {
        let cache = ScriptUrlCache::new();
        let threads: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.insert("amp-form", tags(&[&format!("<{i}>")])))
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(cache.get("amp-form").map(|t| t.len()), Some(8));
    }
}
