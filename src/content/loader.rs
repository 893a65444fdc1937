//! Content loader - reads the post feed from the bundled data or a file

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::Post;
use crate::error::BlogError;

/// The sample feed compiled into the binary
const BUILTIN_FEED: &str = include_str!("data/posts.yml");

/// Somewhere posts come from
pub trait PostSource: Send + Sync {
    /// Short description for log messages
    fn describe(&self) -> String;

    /// Read the raw post records
    fn read(&self) -> Result<Vec<Post>>;

    /// Read and normalize the feed, rejecting duplicate ids
    fn load(&self) -> Result<Vec<Post>> {
        let posts = self.read()?;
        let posts = prepare(posts)?;
        tracing::debug!("Loaded {} posts from {}", posts.len(), self.describe());
        Ok(posts)
    }
}

/// The bundled sample feed
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSource;

impl PostSource for BuiltinSource {
    fn describe(&self) -> String {
        "builtin feed".to_string()
    }

    fn read(&self) -> Result<Vec<Post>> {
        Ok(serde_yaml::from_str(BUILTIN_FEED)?)
    }
}

/// A YAML or JSON file holding a list of posts
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PostSource for FileSource {
    fn describe(&self) -> String {
        format!("{:?}", self.path)
    }

    fn read(&self) -> Result<Vec<Post>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read post feed {:?}", self.path))?;

        let posts = if is_json_file(&self.path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON post feed {:?}", self.path))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML post feed {:?}", self.path))?
        };

        Ok(posts)
    }
}

/// Fill derived fields and check id uniqueness
///
/// Missing ids are derived from the title, missing reading times are
/// estimated from the content. Posts with an unparseable date are kept.
pub fn prepare(mut posts: Vec<Post>) -> Result<Vec<Post>, BlogError> {
    let mut seen = HashSet::new();

    for post in &mut posts {
        if post.id.trim().is_empty() {
            post.id = slug::slugify(&post.title);
        }
        if !seen.insert(post.id.clone()) {
            return Err(BlogError::DuplicateId(post.id.clone()));
        }

        post.estimate_reading_time();

        if post.published_date().is_none() {
            tracing::warn!(
                "Post {} has an unparseable date {:?}; it will sort after dated posts",
                post.id,
                post.published_at
            );
        }
    }

    Ok(posts)
}

/// Check if a file is a JSON feed
fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
