use crate::domain::entities::table::{PaginationState, PAGE_COUNT_UNKNOWN, PAGE_SIZE_OPTIONS};

/// "Next" stays enabled while the page count is unknown; the adapter signals
/// the end with an empty page.
pub fn can_go_next(page_index: usize, page_count: i64) -> bool {
    if page_count == PAGE_COUNT_UNKNOWN || page_count < 0 {
        return true;
    }
    (page_index as i64) + 1 < page_count
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: i64,
    pub total: u64,
    pub rows_on_page: usize,
    pub can_previous: bool,
    pub can_next: bool,
    pub can_last: bool,
    pub page_sizes: Vec<usize>,
    pub show_refresh: bool,
    pub refresh_disabled: bool,
}

impl PaginationView {
    pub fn new(
        pagination: PaginationState,
        page_count: i64,
        total: u64,
        rows_on_page: usize,
        server_mode: bool,
        is_fetching: bool,
    ) -> Self {
        let mut page_sizes = PAGE_SIZE_OPTIONS.to_vec();
        if !page_sizes.contains(&pagination.page_size) {
            page_sizes.push(pagination.page_size);
            page_sizes.sort_unstable();
        }
        Self {
            page_index: pagination.page_index,
            page_size: pagination.page_size,
            page_count,
            total,
            rows_on_page,
            can_previous: pagination.page_index > 0,
            can_next: can_go_next(pagination.page_index, page_count),
            can_last: page_count > 0 && (pagination.page_index as i64) + 1 < page_count,
            page_sizes,
            show_refresh: server_mode,
            refresh_disabled: is_fetching,
        }
    }

    pub fn page_label(&self) -> String {
        format!("Page {}", self.page_index + 1)
    }

    pub fn page_of_label(&self) -> Option<String> {
        (self.page_count > 0).then(|| format!("of {}", self.page_count))
    }

    pub fn summary(&self) -> String {
        let open_ended = self.page_count == PAGE_COUNT_UNKNOWN;
        if self.rows_on_page == 0 {
            if open_ended {
                return "Showing 0".to_string();
            }
            return format!("Showing 0 of {}", self.total);
        }
        let first = self.page_index * self.page_size + 1;
        let last = first + self.rows_on_page - 1;
        if open_ended {
            return format!("Showing {first}–{last}");
        }
        format!("Showing {first}–{last} of {}", self.total)
    }
}
