//! Filter state owned by a listing view

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// The active query, tag/category selection and page of a listing
///
/// Every update consumes the state and returns a new one. Changing the query
/// or the selection moves back to page 1, since a page number from one result
/// set means nothing in another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    pub tags: IndexSet<String>,
    pub categories: IndexSet<String>,
    /// 1-based page number
    pub page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            tags: IndexSet::new(),
            categories: IndexSet::new(),
            page: 1,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self.first_page()
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.insert(tag.to_string());
        self.first_page()
    }

    pub fn without_tag(mut self, tag: &str) -> Self {
        self.tags.shift_remove(tag);
        self.first_page()
    }

    /// Select the tag if it is not selected, deselect it otherwise
    pub fn toggle_tag(self, tag: &str) -> Self {
        if self.tags.contains(tag) {
            self.without_tag(tag)
        } else {
            self.with_tag(tag)
        }
    }

    pub fn clear_tags(mut self) -> Self {
        self.tags.clear();
        self.first_page()
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.categories.insert(category.to_string());
        self.first_page()
    }

    pub fn without_category(mut self, category: &str) -> Self {
        self.categories.shift_remove(category);
        self.first_page()
    }

    pub fn toggle_category(self, category: &str) -> Self {
        if self.categories.contains(category) {
            self.without_category(category)
        } else {
            self.with_category(category)
        }
    }

    pub fn clear_categories(mut self) -> Self {
        self.categories.clear();
        self.first_page()
    }

    /// Drop query and selections
    pub fn clear_all(self) -> Self {
        Self::default()
    }

    /// Move to another page, keeping query and selections
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Trimmed free-text query
    pub fn trimmed_query(&self) -> &str {
        self.query.trim()
    }

    /// True when any filter narrows the collection
    pub fn is_filtering(&self) -> bool {
        !self.trimmed_query().is_empty() || !self.tags.is_empty() || !self.categories.is_empty()
    }

    fn first_page(mut self) -> Self {
        self.page = 1;
        self
    }
}
