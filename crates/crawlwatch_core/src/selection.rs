use std::collections::BTreeSet;

use crate::UrlId;

/// URL ids currently checked by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    ids: BTreeSet<UrlId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: UrlId) -> bool {
        self.ids.contains(&id)
    }

    pub fn toggle(&mut self, id: UrlId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Selects every id on the page, or nothing if the page is already fully
    /// selected. Ids from other pages are dropped either way.
    pub fn toggle_all(&mut self, page_ids: &[UrlId]) {
        let all_selected = !page_ids.is_empty() && page_ids.iter().all(|id| self.ids.contains(id));
        self.ids = if all_selected {
            BTreeSet::new()
        } else {
            page_ids.iter().copied().collect()
        };
    }

    /// Drops ids that are no longer on the loaded page.
    pub fn retain_page(&mut self, page_ids: &[UrlId]) {
        self.ids.retain(|id| page_ids.contains(id));
    }

    pub fn snapshot(&self) -> Vec<UrlId> {
        self.ids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
