use serde::Serialize;

/// Entries per page of the backend's paginated audit endpoints.
pub const AUDIT_PAGE_SIZE: usize = 10;

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }
    let current_page = current_page.min(last_page);

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// One page of items plus the page links of the pager. `None` is a gap.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    /// Wraps a page the backend already cut; `total` counts all entries.
    pub fn new(items: Vec<T>, current_page: usize, total: usize, per_page: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };
        let total_pages = total.div_ceil(per_page.max(1));

        let pages = get_pages(total_pages, current_page, 2, 2, 4, 2);

        Self {
            items,
            pages,
            page: current_page,
            total,
        }
    }

    /// Cuts a page out of a fully fetched list. Pages past the end are empty.
    pub fn from_all(all: Vec<T>, current_page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let current_page = current_page.max(1);
        let total = all.len();
        let items = all
            .into_iter()
            .skip((current_page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();
        Self::new(items, current_page, total, per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pager_collapses_distant_pages() {
        assert_eq!(
            get_pages(20, 10, 2, 2, 4, 2),
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20)
            ]
        );
        assert!(get_pages(0, 1, 2, 2, 4, 2).is_empty());
        assert_eq!(get_pages(3, usize::MAX, 2, 2, 4, 2), vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn in_memory_paging() {
        let page = Paginated::from_all((1..=25).collect::<Vec<_>>(), 3, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);
        assert_eq!(page.pages, vec![Some(1), Some(2), Some(3)]);

        let page = Paginated::from_all(vec![1, 2], 0, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![1, 2]);
    }

    #[test]
    fn huge_page_number_is_an_empty_page() {
        let page = Paginated::from_all((0..5).collect::<Vec<_>>(), usize::MAX, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, vec![Some(1)]);

        let page = Paginated::new(Vec::<i32>::new(), usize::MAX, 30, 10);
        assert_eq!(page.pages, vec![Some(1), Some(2), Some(3)]);
    }
}
