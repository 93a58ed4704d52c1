use crate::merge::{merge, Row, RowPatch};
use crate::{PageQuery, SortField, SortOrder, UrlId, UrlItem};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Current page of URL rows plus the pagination and sort cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRegistry {
    rows: Vec<Row>,
    total: u64,
    page: u32,
    limit: u32,
    sort_field: Option<SortField>,
    sort_order: SortOrder,
}

impl Default for UrlRegistry {
    fn default() -> Self {
        Self::with_limit(DEFAULT_PAGE_SIZE)
    }
}

impl UrlRegistry {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            rows: Vec::new(),
            total: 0,
            page: 1,
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            sort_field: None,
            sort_order: SortOrder::Desc,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, id: UrlId) -> Option<&Row> {
        self.rows.iter().find(|row| row.item.id == id)
    }

    pub fn ids(&self) -> Vec<UrlId> {
        self.rows.iter().map(|row| row.item.id).collect()
    }

    pub fn contains(&self, id: UrlId) -> bool {
        self.row(id).is_some()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn sort(&self) -> (Option<SortField>, SortOrder) {
        (self.sort_field, self.sort_order)
    }

    /// `ceil(total / limit)`, never below 1 so an empty listing still has a page.
    pub fn total_pages(&self) -> u32 {
        let limit = u64::from(self.limit.max(1));
        let pages = self.total.div_ceil(limit).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn clamp_page(&self, requested: i64) -> u32 {
        let last = i64::from(self.total_pages());
        // Both bounds fit in u32 after clamping.
        requested.clamp(1, last) as u32
    }

    /// Moves the cursor to `requested` (clamped). Returns true if the page changed.
    pub fn go_to(&mut self, requested: i64) -> bool {
        let page = self.clamp_page(requested);
        let changed = page != self.page;
        self.page = page;
        changed
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.clamp(1, MAX_PAGE_SIZE);
        self.page = 1;
    }

    /// Same field flips the order; a new field starts descending.
    pub fn click_sort(&mut self, field: SortField) {
        if self.sort_field == Some(field) {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_field = Some(field);
            self.sort_order = SortOrder::Desc;
        }
    }

    pub fn query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
            sort_field: self.sort_field,
            sort_order: self.sort_order,
        }
    }

    /// Replaces the page wholesale with freshly listed items.
    pub fn replace_page(&mut self, page: u32, limit: u32, items: Vec<UrlItem>, total: u64) {
        self.rows = items.into_iter().map(Row::new).collect();
        self.total = total;
        self.page = page.max(1);
        if limit > 0 {
            self.limit = limit.min(MAX_PAGE_SIZE);
        }
    }

    /// Merges `patch` into the row with `id`. Returns false when the row is
    /// not on the current page.
    pub fn upsert_row(&mut self, id: UrlId, patch: RowPatch) -> bool {
        match self.rows.iter_mut().find(|row| row.item.id == id) {
            Some(row) => {
                *row = merge(row, patch);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::with_limit(self.limit);
    }
}

#[cfg(test)]
mod tests {
    use super::UrlRegistry;
    use crate::{JobStatus, RowPatch, SortField, SortOrder, UrlItem};

    fn registry_with(total: u64, limit: u32) -> UrlRegistry {
        let mut registry = UrlRegistry::with_limit(limit);
        registry.replace_page(1, limit, vec![UrlItem::new(1, "https://a.example")], total);
        registry
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(registry_with(41, 20).total_pages(), 3);
        assert_eq!(registry_with(40, 20).total_pages(), 2);
        assert_eq!(registry_with(1, 20).total_pages(), 1);
        assert_eq!(registry_with(0, 20).total_pages(), 1);
    }

    #[test]
    fn page_requests_are_clamped() {
        let registry = registry_with(41, 20);
        assert_eq!(registry.clamp_page(0), 1);
        assert_eq!(registry.clamp_page(-4), 1);
        assert_eq!(registry.clamp_page(2), 2);
        assert_eq!(registry.clamp_page(9), 3);
    }

    #[test]
    fn upsert_ignores_rows_not_on_page() {
        let mut registry = registry_with(1, 20);
        assert!(!registry.upsert_row(99, RowPatch::status(JobStatus::Running)));
        assert!(registry.upsert_row(1, RowPatch::status(JobStatus::Running)));
        assert_eq!(registry.row(1).unwrap().status, Some(JobStatus::Running));
    }

    #[test]
    fn sort_clicks_toggle_or_reset() {
        let mut registry = UrlRegistry::default();
        registry.click_sort(SortField::Id);
        assert_eq!(registry.sort(), (Some(SortField::Id), SortOrder::Desc));
        registry.click_sort(SortField::Id);
        assert_eq!(registry.sort(), (Some(SortField::Id), SortOrder::Asc));
        registry.click_sort(SortField::Url);
        assert_eq!(registry.sort(), (Some(SortField::Url), SortOrder::Desc));
    }

    #[test]
    fn limit_is_bounded_and_resets_page() {
        let mut registry = registry_with(100, 10);
        registry.go_to(4);
        registry.set_limit(500);
        assert_eq!(registry.limit(), 100);
        assert_eq!(registry.page(), 1);
    }
}
