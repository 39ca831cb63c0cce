use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::query::UserQuery;

/// One page of a list result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub page_number: i64,
    pub page_size: i64,
    /// Records in `data`
    pub count: usize,
    pub total_pages: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(query: &UserQuery, total_count: u64, data: Vec<T>) -> Self {
        let total_pages = query.total_pages(total_count);
        Self {
            page_number: query.page_number,
            page_size: query.page_size,
            count: data.len(),
            total_pages,
            has_previous_page: query.page_number > 1,
            has_next_page: query.page_number < total_pages,
            data,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page_number: self.page_number,
            page_size: self.page_size,
            count: self.count,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page_number: i64, page_size: i64) -> UserQuery {
        UserQuery {
            page_number,
            page_size,
            ..Default::default()
        }
    }

    #[test]
    fn test_middle_page_flags() {
        let page = Page::new(&query(2, 5), 12, vec![1, 2, 3, 4, 5]);
        assert_eq!(page.count, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous_page);
        assert!(page.has_next_page);
    }

    #[test]
    fn test_last_page_flags() {
        let page = Page::new(&query(3, 5), 12, vec![11, 12]);
        assert_eq!(page.count, 2);
        assert!(page.has_previous_page);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_empty_collection() {
        let page: Page<i32> = Page::new(&query(1, 10), 0, vec![]);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_previous_page);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_page_past_the_end() {
        let page: Page<i32> = Page::new(&query(9, 10), 15, vec![]);
        assert_eq!(page.count, 0);
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::new(&query(1, 2), 3, vec![1, 2]).map(|n| n * 10);
        assert_eq!(page.data, vec![10, 20]);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_next_page);
    }
}
