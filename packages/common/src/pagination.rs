//! Page slicing and the page-number window shown by pagination controls.

use serde::Serialize;

/// Maximum count of consecutive page numbers in a window.
pub const PAGE_WINDOW_SIZE: u64 = 5;

/// Pagination metadata included in list responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Current page number (1-based) after clamping.
    #[schema(example = 1)]
    pub current_page: u64,
    /// Number of items per page.
    #[schema(example = 12)]
    pub per_page: u64,
    /// Total number of pages. Zero when there are no items at all.
    #[schema(example = 3)]
    pub total_pages: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 31)]
    pub total_items: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// One slice of a sequence plus its metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

/// Slice `items` into the requested page.
///
/// `page` is clamped into `[1, total_pages]`, so out-of-range requests get the
/// first or last page. An empty input yields no items and `total_pages == 0`
/// with `current_page == 1`. A `page_size` of zero is treated as one.
pub fn paginate<T: Clone>(items: &[T], page: i64, page_size: u64) -> Page<T> {
    let per_page = page_size.max(1);
    let total_items = items.len() as u64;
    let total_pages = total_items.div_ceil(per_page);

    let last = i64::try_from(total_pages.max(1)).unwrap_or(i64::MAX);
    let current_page = page.clamp(1, last) as u64;

    let start = usize::try_from((current_page - 1) * per_page)
        .unwrap_or(usize::MAX)
        .min(items.len());
    let end = usize::try_from(per_page)
        .map(|n| start.saturating_add(n))
        .unwrap_or(usize::MAX)
        .min(items.len());

    Page {
        items: items[start..end].to_vec(),
        info: PageInfo {
            current_page,
            per_page,
            total_pages,
            total_items,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        },
    }
}

/// An entry in the page-number navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageLink {
    Page { number: u64, current: bool },
    Ellipsis,
}

/// Choose the page numbers to render for `current` out of `total` pages.
///
/// At most [`PAGE_WINDOW_SIZE`] consecutive numbers centered on `current`,
/// shifted left near the end so the window never shrinks below
/// `min(PAGE_WINDOW_SIZE, total)`. Page 1 and page `total` are always present,
/// separated from the window by an ellipsis when not adjacent to it.
pub fn page_window(current: u64, total: u64) -> Vec<PageLink> {
    if total == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);

    let mut start = current.saturating_sub(PAGE_WINDOW_SIZE / 2).max(1);
    let end = (start + PAGE_WINDOW_SIZE - 1).min(total);
    if end - start + 1 < PAGE_WINDOW_SIZE {
        start = (end + 1).saturating_sub(PAGE_WINDOW_SIZE).max(1);
    }

    let link = |number: u64| PageLink::Page {
        number,
        current: number == current,
    };

    let mut links = Vec::with_capacity(PAGE_WINDOW_SIZE as usize + 4);
    if start > 1 {
        links.push(link(1));
        if start > 2 {
            links.push(PageLink::Ellipsis);
        }
    }
    links.extend((start..=end).map(link));
    if end < total {
        if end < total - 1 {
            links.push(PageLink::Ellipsis);
        }
        links.push(link(total));
    }
    links
}
