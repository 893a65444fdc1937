//! List site content

use anyhow::Result;

use crate::content::Post;
use crate::helpers::{full_url_for, listing_path};
use crate::query::{FilterState, SortOrder};
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str, state: &FilterState, sort: SortOrder) -> Result<()> {
    print!("{}", render(blog, content_type, state, sort)?);
    Ok(())
}

/// Filter state from command-line flags, with pages below 1 read as page 1
pub fn filter_state(
    search: Option<&str>,
    tags: &[String],
    categories: &[String],
    page: usize,
) -> FilterState {
    let mut state = FilterState::new();
    if let Some(query) = search {
        state = state.with_query(query);
    }
    for tag in tags {
        state = state.with_tag(tag);
    }
    for category in categories {
        state = state.with_category(category);
    }
    state.with_page(page.max(1))
}

/// Build the listing text for a content type
pub fn render(
    blog: &Blog,
    content_type: &str,
    state: &FilterState,
    sort: SortOrder,
) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let listing = blog.list_sorted(state, sort);
            out.push_str(&format!("{}\n", listing.summary(state)));
            for post in &listing.items {
                out.push_str(&post_line(post));
            }
            if listing.total_pages > 1 {
                out.push_str(&format!(
                    "Page {} of {}\n",
                    listing.page, listing.total_pages
                ));
            }
            if listing.has_next() {
                let next = state.clone().with_page(listing.page + 1);
                out.push_str(&format!(
                    "Next: {}\n",
                    full_url_for(&blog.config, &listing_path(&next))
                ));
            }
        }
        "tag" | "tags" => {
            let tags = crate::helpers::tag_counts(blog.posts());
            out.push_str(&format!("Tags ({}):\n", tags.len()));
            for (tag, count) in tags {
                out.push_str(&format!("  {} ({})\n", tag, count));
            }
        }
        "category" | "categories" => {
            let counts = crate::helpers::category_counts(blog.posts());
            out.push_str(&format!("Categories ({}):\n", blog.categories().len()));
            for category in blog.categories() {
                let count = counts
                    .iter()
                    .find(|(name, _)| name == category)
                    .map(|(_, c)| *c)
                    .unwrap_or(0);
                out.push_str(&format!("  {} ({})\n", category, count));
            }
        }
        "featured" => {
            let posts = blog.featured();
            out.push_str(&format!("Featured ({}):\n", posts.len()));
            for post in posts {
                out.push_str(&post_line(post));
            }
        }
        "recent" => {
            let posts = blog.recent();
            out.push_str(&format!("Recent ({}):\n", posts.len()));
            for post in posts {
                out.push_str(&post_line(post));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, category, featured, recent",
                content_type
            );
        }
    }

    Ok(out)
}

fn post_line(post: &Post) -> String {
    format!(
        "  {} - {} [{}]\n",
        post.published_at, post.title, post.id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn blog() -> Blog {
        let mut config = SiteConfig::default();
        config.per_page = 1;
        let mut a = Post::new("a", "Alpha", "2024-01-01");
        a.category = Some("Design".to_string());
        a.tags = vec!["CSS".to_string()];
        let b = Post::new("b", "Beta", "2024-02-01");
        Blog::from_posts(config, vec![a, b]).unwrap()
    }

    #[test]
    fn test_list_posts() {
        let out = render(&blog(), "post", &FilterState::new(), SortOrder::Newest).unwrap();
        assert_eq!(
            out,
            "Showing 1-1 of 2 articles\n  2024-02-01 - Beta [b]\nPage 1 of 2\n\
             Next: http://localhost:4000/articles?page=2\n"
        );
    }

    #[test]
    fn test_list_categories_includes_unused() {
        let out = render(&blog(), "category", &FilterState::new(), SortOrder::Newest).unwrap();
        assert!(out.starts_with("Categories (8):\n"));
        assert!(out.contains("  Design (1)\n"));
        assert!(out.contains("  Career (0)\n"));
    }

    #[test]
    fn test_filter_state_from_flags() {
        let tags = vec!["CSS".to_string()];
        let state = filter_state(Some("alp"), &tags, &[], 0);
        assert_eq!(state.page, 1);
        assert_eq!(state.query, "alp");
        assert!(state.tags.contains("CSS"));

        let out = render(&blog(), "post", &state, SortOrder::Newest).unwrap();
        assert!(out.starts_with("Showing 1-1 of 1 article for \"alp\" with tags: CSS\n"));

        assert_eq!(filter_state(None, &[], &[], 2).page, 2);
    }

    #[test]
    fn test_unknown_type() {
        let err = render(&blog(), "widgets", &FilterState::new(), SortOrder::Newest).unwrap_err();
        assert!(err.to_string().contains("Unknown type: widgets"));
    }
}
