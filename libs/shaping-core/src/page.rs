use serde::{Deserialize, Serialize};

/// Pagination metadata for one page of results. Sent out-of-band, as the
/// `X-Pagination` response header, never inside the body.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub total_pages: u64,
    pub page_size: u32,
    pub total_count: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageMeta {
    /// `total_pages` is `ceil(total_count / page_size)`; zero when there is nothing to page.
    pub fn new(current_page: u32, page_size: u32, total_count: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_count.div_ceil(u64::from(page_size))
        };
        Self {
            current_page,
            total_pages,
            page_size,
            total_count,
            has_previous: current_page > 1,
            has_next: u64::from(current_page) < total_pages,
        }
    }
}

#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PagedResult<T> {
    /// Wrap an already fetched page. `total_count` comes from a count over
    /// the unpaged filter, not from `items.len()`.
    pub fn new(items: Vec<T>, current_page: u32, page_size: u32, total_count: u64) -> Self {
        Self {
            items,
            meta: PageMeta::new(current_page, page_size, total_count),
        }
    }

    /// Page an in-memory sequence: count everything, keep the requested window.
    pub fn from_unpaged<I>(source: I, current_page: u32, page_size: u32) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let skip = (current_page.max(1) as usize - 1).saturating_mul(page_size as usize);
        let mut total = 0u64;
        let mut items = Vec::with_capacity(page_size as usize);
        for (i, item) in source.into_iter().enumerate() {
            total += 1;
            if i >= skip && items.len() < page_size as usize {
                items.push(item);
            }
        }
        Self::new(items, current_page, page_size, total)
    }

    /// Map items while preserving the metadata (entity -> shaped record).
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    pub fn into_parts(self) -> (Vec<T>, PageMeta) {
        (self.items, self.meta)
    }
}

/// Package a fetched page together with its metadata.
pub fn paginate<T>(items: Vec<T>, current_page: u32, page_size: u32, total_count: u64) -> PagedResult<T> {
    PagedResult::new(items, current_page, page_size, total_count)
}
