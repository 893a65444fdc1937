//! Query module - filter state, listing pipeline and URL parameters

pub mod params;
mod pipeline;
mod state;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use pipeline::{apply, filter, sort, Listing};
pub use state::FilterState;

/// Ordering applied to a listing before it is paginated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recently published first
    #[default]
    Newest,
    /// Order of the source feed
    Insertion,
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "insertion" => Ok(SortOrder::Insertion),
            _ => anyhow::bail!("Unknown sort order: {}. Available: newest, insertion", s),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Newest => f.write_str("newest"),
            SortOrder::Insertion => f.write_str("insertion"),
        }
    }
}
