//! Page arithmetic shared by list endpoints.

use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 24;

/// Requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        ((self.page.max(1) - 1) * self.per_page) as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// One page of results plus enough to render a pager.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, total: usize, per_page: usize) -> Self {
        Self {
            items,
            page: page.max(1),
            pages: total.div_ceil(per_page.max(1)),
            total,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            pages: self.pages,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_offset_from_one_based_page() {
        let pagination = Pagination {
            page: 3,
            per_page: 10,
        };
        assert_eq!(pagination.offset(), 20);
        let first = Pagination {
            page: 0,
            per_page: 10,
        };
        assert_eq!(first.offset(), 0);
    }

    #[test]
    fn rounds_page_count_up() {
        let page = Paginated::new(vec![1, 2], 1, 21, 10);
        assert_eq!(page.pages, 3);
        assert_eq!(page.map(|i| i * 2).items, vec![2, 4]);
    }
}
