//! Content module - posts, post sources and content rendering

pub mod blocks;
pub mod loader;
mod post;
mod render;

pub use blocks::ContentBlock;
pub use loader::{BuiltinSource, FileSource, PostSource};
pub use post::{count_words, Author, Post};
pub use render::{html_escape, ContentRenderer};
