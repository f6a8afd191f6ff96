// Row selection keyed by primary key (`uploadId`, `AGTN`, `TRNN`).

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_owned());
        }
    }

    /// Replace the selection with exactly `ids`.
    pub fn select_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_restores_selection() {
        let mut sel = Selection::default();
        sel.toggle("u-1");
        let before = sel.clone();

        sel.toggle("u-2");
        sel.toggle("u-2");
        assert_eq!(sel, before);

        sel.toggle("u-1");
        assert!(sel.is_empty());
    }

    #[test]
    fn select_all_replaces() {
        let mut sel = Selection::default();
        sel.toggle("old");
        sel.select_all(["a", "b"]);
        assert_eq!(sel.ids(), vec!["a".to_owned(), "b".to_owned()]);
        assert!(!sel.contains("old"));
    }
}
