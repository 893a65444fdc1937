//! Filter, sort and paginate a post collection

use serde::Serialize;

use super::{FilterState, SortOrder};
use crate::content::Post;

/// One page of a filtered listing
#[derive(Debug, Clone, Serialize)]
pub struct Listing<'a> {
    /// Posts on the requested page
    pub items: Vec<&'a Post>,
    /// Number of posts matching the filters, across all pages
    pub total_count: usize,
    pub total_pages: usize,
    /// The requested page, not corrected when out of range
    pub page: usize,
    pub page_size: usize,
}

impl<'a> Listing<'a> {
    /// 1-based inclusive range of the shown items, `None` for an empty page
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let start = (self.page - 1) * self.page_size + 1;
        Some((start, start + self.items.len() - 1))
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1 && self.page <= self.total_pages
    }

    pub fn has_next(&self) -> bool {
        self.page >= 1 && self.page < self.total_pages
    }

    /// Human readable description of what is shown
    pub fn summary(&self, state: &FilterState) -> String {
        let mut text = match self.range() {
            Some((start, end)) => format!(
                "Showing {}-{} of {} article{}",
                start,
                end,
                self.total_count,
                if self.total_count == 1 { "" } else { "s" }
            ),
            None => "No articles found".to_string(),
        };

        let query = state.trimmed_query();
        if !query.is_empty() {
            text.push_str(&format!(" for \"{}\"", query));
        }
        if !state.tags.is_empty() {
            let tags: Vec<&str> = state.tags.iter().map(String::as_str).collect();
            text.push_str(&format!(" with tags: {}", tags.join(", ")));
        }
        if !state.categories.is_empty() {
            let categories: Vec<&str> = state.categories.iter().map(String::as_str).collect();
            text.push_str(&format!(" in categories: {}", categories.join(", ")));
        }

        text
    }
}

/// Run the listing pipeline: tag filter, category filter, text query, sort, page slice
///
/// Tag and category matching is exact and case-sensitive; the text query is
/// matched case-insensitively. A `page_size` of 0 is treated as 1.
pub fn apply<'a>(
    posts: &'a [Post],
    state: &FilterState,
    page_size: usize,
    order: SortOrder,
) -> Listing<'a> {
    let page_size = page_size.max(1);

    let mut matched = filter(posts, state);
    sort(&mut matched, order);

    let total_count = matched.len();
    let total_pages = total_count.div_ceil(page_size);
    let items = page_slice(&matched, state.page, page_size).to_vec();

    tracing::debug!(
        "Listing page {} of {}: {} of {} posts match",
        state.page,
        total_pages,
        items.len(),
        total_count
    );

    Listing {
        items,
        total_count,
        total_pages,
        page: state.page,
        page_size,
    }
}

/// Posts passing every active filter, in source order
pub fn filter<'a>(posts: &'a [Post], state: &FilterState) -> Vec<&'a Post> {
    let query = state.trimmed_query().to_lowercase();

    posts
        .iter()
        .filter(|post| state.tags.is_empty() || post.tags.iter().any(|t| state.tags.contains(t)))
        .filter(|post| {
            state.categories.is_empty()
                || post
                    .category
                    .as_ref()
                    .is_some_and(|c| state.categories.contains(c))
        })
        .filter(|post| query.is_empty() || matches_query(post, &query))
        .collect()
}

/// Case-insensitive substring match across the searchable fields
///
/// `query` must already be lowercased.
fn matches_query(post: &Post, query: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(query);

    contains(post.title.as_str())
        || contains(post.excerpt.as_str())
        || post.tags.iter().any(|t| contains(t.as_str()))
        || post.category.as_deref().is_some_and(contains)
        || contains(post.author.name.as_str())
}

/// Order posts in place
///
/// Newest-first is stable: posts with equal dates keep source order. Posts
/// whose date cannot be parsed go after all dated posts.
pub fn sort(posts: &mut [&Post], order: SortOrder) {
    match order {
        SortOrder::Newest => posts.sort_by_key(|p| std::cmp::Reverse(p.published_date())),
        SortOrder::Insertion => {}
    }
}

/// The `[(page-1)*size, page*size)` window, empty when out of range
fn page_slice<'a, 'b>(posts: &'b [&'a Post], page: usize, page_size: usize) -> &'b [&'a Post] {
    let Some(start) = page.checked_sub(1).and_then(|p| p.checked_mul(page_size)) else {
        return &[];
    };
    if start >= posts.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(posts.len());
    &posts[start..end]
}
