//! List helpers for the landing page: featured, recent, tag and category lists

use std::collections::{HashMap, HashSet};

use crate::content::Post;
use crate::query::{sort, SortOrder};

/// Featured posts in feed order
pub fn featured_posts(posts: &[Post]) -> Vec<&Post> {
    posts.iter().filter(|p| p.featured).collect()
}

/// The newest `amount` posts that are not featured
pub fn recent_posts(posts: &[Post], amount: usize) -> Vec<&Post> {
    let mut recent: Vec<&Post> = posts.iter().filter(|p| !p.featured).collect();
    sort(&mut recent, SortOrder::Newest);
    recent.truncate(amount);
    recent
}

/// Every distinct tag, sorted
pub fn all_tags(posts: &[Post]) -> Vec<String> {
    let mut tags: Vec<String> = posts
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    tags.sort();
    tags
}

/// Tags with their post counts, most used first
pub fn tag_counts(posts: &[Post]) -> Vec<(String, usize)> {
    let mut tags: HashMap<String, usize> = HashMap::new();

    for post in posts {
        for tag in &post.tags {
            *tags.entry(tag.clone()).or_insert(0) += 1;
        }
    }

    sorted_by_count(tags)
}

/// Categories with their post counts, most used first
pub fn category_counts(posts: &[Post]) -> Vec<(String, usize)> {
    let mut categories: HashMap<String, usize> = HashMap::new();

    for cat in posts.iter().filter_map(|p| p.category.as_ref()) {
        *categories.entry(cat.clone()).or_insert(0) += 1;
    }

    sorted_by_count(categories)
}

/// Other posts sharing a tag with `post`, most shared tags first, then newest
pub fn related_posts<'a>(post: &Post, posts: &'a [Post], amount: usize) -> Vec<&'a Post> {
    let mut scored: Vec<(usize, &Post)> = posts
        .iter()
        .filter(|p| p.id != post.id)
        .map(|p| (p.tags.iter().filter(|t| post.has_tag(t)).count(), p))
        .filter(|(shared, _)| *shared > 0)
        .collect();

    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.published_date().cmp(&a.1.published_date()))
    });

    scored.into_iter().take(amount).map(|(_, p)| p).collect()
}

fn sorted_by_count(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}
