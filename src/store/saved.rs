use std::collections::BTreeSet;

/// Ids of the internships the signed-in user bookmarked
///
/// Keyed by id only: an id stays saved whether or not its record is loaded.
/// Every mutation reports whether the observable state changed so the store
/// knows when derived views must be recomputed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedSet {
    ids: BTreeSet<String>,
}

impl SavedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an id; saving an already saved id changes nothing
    pub fn save(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    /// Removes an id; unsaving an unknown id changes nothing
    pub fn unsave(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Saves when absent, unsaves when present. Returns the new membership.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.unsave(id) {
            false
        } else {
            self.save(id)
        }
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Forgets every saved id (logout)
    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_is_saved() {
        let mut saved = SavedSet::new();
        assert!(saved.save("7"));
        assert!(saved.is_saved("7"));
    }

    #[test]
    fn test_save_is_idempotent() {
        let mut saved = SavedSet::new();
        saved.save("7");
        assert!(!saved.save("7"));
        assert_eq!(saved.len(), 1);
    }

    #[test]
    fn test_unsave_then_not_saved() {
        let mut saved = SavedSet::new();
        saved.save("7");
        assert!(saved.unsave("7"));
        assert!(!saved.is_saved("7"));
    }

    #[test]
    fn test_unsave_unknown_id_is_noop() {
        let mut saved = SavedSet::new();
        saved.save("1");
        assert!(!saved.unsave("never-saved"));
        assert_eq!(saved.ids().collect::<Vec<_>>(), vec!["1"]);
    }

    #[test]
    fn test_toggle() {
        let mut saved = SavedSet::new();
        assert!(saved.toggle("3"));
        assert!(saved.is_saved("3"));
        assert!(!saved.toggle("3"));
        assert!(saved.is_empty());
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut saved = SavedSet::new();
        for id in ["1", "2", "3"] {
            saved.save(id);
        }

        assert!(saved.clear());

        for id in ["1", "2", "3"] {
            assert!(!saved.is_saved(id));
        }
        assert!(!saved.clear());
    }
}
