//! devblog-rs: listing, filtering and article rendering for a developer blog
//!
//! Posts come from a read-only feed (the bundled sample or a YAML/JSON file).
//! Listings are derived from an explicit [`query::FilterState`], and article
//! content is split into paragraph and code blocks for display.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod newsletter;
pub mod query;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{BuiltinSource, FileSource, Post, PostSource};
use error::BlogError;
use query::{FilterState, Listing, SortOrder};

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Loaded posts in feed order
    posts: Vec<Post>,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let mut blog = Self {
            config,
            base_dir,
            posts: Vec::new(),
        };
        blog.reload()?;

        Ok(blog)
    }

    /// Create a blog over an already materialized post collection
    pub fn from_posts(config: config::SiteConfig, posts: Vec<Post>) -> Result<Self> {
        config.validate()?;
        let posts = content::loader::prepare(posts)?;
        Ok(Self {
            config,
            base_dir: PathBuf::from("."),
            posts,
        })
    }

    /// Absolute path of the configured post feed, if any
    pub fn data_path(&self) -> Option<PathBuf> {
        self.config
            .data_file
            .as_ref()
            .map(|file| self.base_dir.join(file))
    }

    /// The source posts are loaded from
    pub fn source(&self) -> Box<dyn PostSource> {
        match self.data_path() {
            Some(path) => Box::new(FileSource::new(path)),
            None => Box::new(BuiltinSource),
        }
    }

    /// Load posts again from the source
    pub fn reload(&mut self) -> Result<()> {
        let source = self.source();
        self.posts = source.load()?;
        tracing::info!("Loaded {} posts from {}", self.posts.len(), source.describe());
        Ok(())
    }

    /// All posts in feed order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Look up a post by id
    pub fn find(&self, id: &str) -> Result<&Post, BlogError> {
        self.posts
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| BlogError::PostNotFound(id.to_string()))
    }

    /// Listing page using the configured page size and sort order
    pub fn list(&self, state: &FilterState) -> Listing<'_> {
        self.list_sorted(state, self.config.default_sort)
    }

    /// Listing page with an explicit sort order
    pub fn list_sorted(&self, state: &FilterState, order: SortOrder) -> Listing<'_> {
        query::apply(&self.posts, state, self.config.per_page, order)
    }

    pub fn featured(&self) -> Vec<&Post> {
        helpers::featured_posts(&self.posts)
    }

    pub fn recent(&self) -> Vec<&Post> {
        helpers::recent_posts(&self.posts, self.config.recent_count)
    }

    /// Every tag in use, sorted
    pub fn tags(&self) -> Vec<String> {
        helpers::all_tags(&self.posts)
    }

    /// Categories offered by the category filter
    pub fn categories(&self) -> &[String] {
        &self.config.categories
    }
}
