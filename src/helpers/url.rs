//! URL helper functions

use crate::config::SiteConfig;
use crate::query::params::encode_value;
use crate::query::FilterState;

/// Path of an article page
///
/// # Examples
/// ```ignore
/// post_path("modern-css") // -> "/posts/modern-css"
/// ```
pub fn post_path(id: &str) -> String {
    format!("/posts/{}", encode_value(id))
}

/// Path of the listing for a filter state, e.g. `/articles?tag=CSS&page=2`
pub fn listing_path(state: &FilterState) -> String {
    let query = state.to_query_string();
    if query.is_empty() {
        "/articles".to_string()
    } else {
        format!("/articles?{}", query)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/posts/a") // -> "https://example.com/posts/a"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    format!(
        "{}/{}",
        config.url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
