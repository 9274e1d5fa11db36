use serde::{Deserialize, Serialize};

/// 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: usize,
}

impl PageRequest {
    /// Clamps `page` to 1 and `per_page` to at least one item.
    pub fn new(page: u32, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn first(per_page: usize) -> Self {
        Self::new(1, per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// One page of an ordered collection plus the totals the pager renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matching records before pagination.
    pub total: usize,
    pub page: u32,
    pub per_page: usize,
    pub page_count: u32,
}

impl<T> Page<T> {
    /// Slice `[(page-1)*per_page, page*per_page)`; a page past the end is
    /// empty, not an error.
    pub fn from_collection(collection: Vec<T>, request: PageRequest) -> Self {
        let total = collection.len();
        let page_count = total.div_ceil(request.per_page) as u32;
        let start = (request.page as usize - 1).saturating_mul(request.per_page);

        let items = if start >= total {
            Vec::new()
        } else {
            collection
                .into_iter()
                .skip(start)
                .take(request.per_page)
                .collect()
        };

        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
            page_count,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            page_count: self.page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_three_items_paginate_as_ten_ten_three() {
        let items: Vec<u32> = (0..23).collect();
        let sizes: Vec<usize> = (1..=3)
            .map(|page| {
                Page::from_collection(items.clone(), PageRequest::new(page, 10))
                    .items
                    .len()
            })
            .collect();
        assert_eq!(sizes, vec![10, 10, 3]);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let items: Vec<u32> = (0..23).collect();
        let page = Page::from_collection(items, PageRequest::new(4, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 23);
        assert_eq!(page.page_count, 3);
    }

    #[test]
    fn second_page_starts_where_the_first_stopped() {
        let items: Vec<u32> = (0..23).collect();
        let page = Page::from_collection(items, PageRequest::new(2, 10));
        assert_eq!(page.items.first(), Some(&10));
        assert_eq!(page.items.last(), Some(&19));
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let page = Page::from_collection(Vec::<u32>::new(), PageRequest::default());
        assert!(page.items.is_empty());
        assert_eq!(page.page_count, 0);
    }

    #[test]
    fn request_clamps_degenerate_values() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 1);
    }
}
