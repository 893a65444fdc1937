//! Show a single article

use anyhow::Result;

use crate::content::{ContentBlock, ContentRenderer};
use crate::helpers::related_posts;
use crate::query::params::tag_link;
use crate::Blog;

/// Print an article with its content blocks
pub fn run(blog: &Blog, id: &str) -> Result<()> {
    print!("{}", render(blog, id)?);
    Ok(())
}

/// Build the article text; unknown ids are an error
pub fn render(blog: &Blog, id: &str) -> Result<String> {
    let post = blog.find(id)?;
    let renderer = ContentRenderer::with_config(&blog.config.highlight);

    let mut out = format!("{}\n{}\n\n", post.title, "=".repeat(post.title.chars().count()));
    out.push_str(&format!(
        "{} | {} | {}\n",
        post.author.name,
        post.display_date(),
        post.reading_time_label()
    ));
    if let Some(role) = &post.author.role {
        out.push_str(&format!("{}\n", role));
    }
    let tags: Vec<String> = post
        .tags
        .iter()
        .map(|t| format!("{} <{}>", t, tag_link(t)))
        .collect();
    if !tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", tags.join(", ")));
    }
    out.push('\n');

    for block in renderer.blocks(&post.content) {
        match block {
            ContentBlock::Paragraph { text } => {
                out.push_str(&text);
                out.push_str("\n\n");
            }
            ContentBlock::Code { language, source } => {
                out.push_str(&format!("--- {} ---\n", language));
                out.push_str(&source);
                if !source.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("---\n\n");
            }
        }
    }

    let related = related_posts(post, blog.posts(), 3);
    if !related.is_empty() {
        out.push_str("Related:\n");
        for p in related {
            out.push_str(&format!("  {} [{}]\n", p.title, p.id));
        }
    }

    Ok(out)
}
