//! Post and Author models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::helpers::{full_date, parse_date_string};

/// Words read per minute when estimating reading time
const WORDS_PER_MINUTE: usize = 200;

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier, also the URL slug
    #[serde(default)]
    pub id: String,

    /// Post title
    pub title: String,

    /// Short summary shown on cards
    #[serde(default)]
    pub excerpt: String,

    /// Raw content with fenced code segments
    #[serde(default)]
    pub content: String,

    pub author: Author,

    /// Publication date as supplied by the feed
    pub published_at: String,

    /// Estimated reading time in minutes
    #[serde(default)]
    pub reading_time: u32,

    /// Post tags
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub featured: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Author of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl Author {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            avatar: String::new(),
            role: None,
            bio: None,
        }
    }
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(id: &str, title: &str, published_at: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            excerpt: String::new(),
            content: String::new(),
            author: Author::new("Anonymous"),
            published_at: published_at.to_string(),
            reading_time: 0,
            tags: Vec::new(),
            featured: false,
            cover_image: None,
            category: None,
        }
    }

    /// Parsed publication date, `None` when the feed value is malformed
    pub fn published_date(&self) -> Option<NaiveDateTime> {
        parse_date_string(&self.published_at)
    }

    /// Long date for display, e.g. "January 15, 2024"
    pub fn display_date(&self) -> String {
        self.published_date()
            .map(|d| full_date(&d))
            .unwrap_or_else(|| self.published_at.clone())
    }

    pub fn reading_time_label(&self) -> String {
        format!("{} min read", self.reading_time)
    }

    /// Whether the post carries the given tag (exact match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Fill in the reading time from the content length when the feed left it out
    pub fn estimate_reading_time(&mut self) {
        if self.reading_time == 0 {
            let words = count_words(&self.content);
            self.reading_time = words.div_ceil(WORDS_PER_MINUTE).max(1) as u32;
        }
    }
}

/// Count words in plain text; CJK characters count as one word each
pub fn count_words(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphanumeric() && !is_cjk(c) {
            if !in_word {
                in_word = true;
                count += 1;
            }
        } else if is_cjk(c) {
            count += 1;
            in_word = false;
        } else {
            in_word = false;
        }
    }

    count
}

fn is_cjk(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}
