//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::BlogError;
use crate::query::SortOrder;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,

    /// Post feed file, relative to the base directory. The bundled feed is used when unset.
    pub data_file: Option<String>,

    // Listing
    pub per_page: usize,
    pub recent_count: usize,
    pub default_sort: SortOrder,

    /// Categories offered by the category filter
    pub categories: Vec<String>,

    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub newsletter: NewsletterConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "DevBlog".to_string(),
            subtitle: "Insights, tutorials and best practices".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),

            url: "http://localhost:4000".to_string(),
            data_file: None,

            per_page: 9,
            recent_count: 6,
            default_sort: SortOrder::Newest,

            categories: [
                "Technology",
                "Web Development",
                "Programming",
                "Design",
                "Tutorial",
                "News",
                "Opinion",
                "Career",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),

            highlight: HighlightConfig::default(),
            newsletter: NewsletterConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Reject settings the listing pipeline cannot work with
    pub fn validate(&self) -> Result<(), BlogError> {
        if self.per_page == 0 {
            return Err(BlogError::InvalidConfig(
                "per_page must be at least 1".to_string(),
            ));
        }
        if self.highlight.default_language.trim().is_empty() {
            return Err(BlogError::InvalidConfig(
                "highlight.default_language must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Code block highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
    /// Language assumed for fences without an annotation
    pub default_language: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
            default_language: "javascript".to_string(),
        }
    }
}

/// Newsletter signup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterConfig {
    pub delay_ms: u64,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self { delay_ms: 1000 }
    }
}
