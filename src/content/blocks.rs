//! Split post content into paragraph and code blocks

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    /// A fenced code segment: opening fence with an optional language token,
    /// then the body up to the next closing fence
    static ref FENCE: Regex = Regex::new(r"```([^\s`]*)[ \t]*\r?\n([\s\S]*?)```").unwrap();

    /// A blank line, possibly holding spaces or tabs
    static ref BLANK_LINE: Regex = Regex::new(r"\r?\n[ \t]*\r?\n").unwrap();
}

/// A displayable piece of post content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Paragraph { text: String },
    Code { language: String, source: String },
}

impl ContentBlock {
    pub fn paragraph(text: &str) -> Self {
        ContentBlock::Paragraph {
            text: text.to_string(),
        }
    }

    pub fn code(language: &str, source: &str) -> Self {
        ContentBlock::Code {
            language: language.to_string(),
            source: source.to_string(),
        }
    }
}

/// Render content into blocks, top to bottom
///
/// Fences without a language annotation are tagged with `default_language`.
/// An opening fence that is never closed does not match, so the rest of the
/// content comes out as ordinary paragraphs.
pub fn render(content: &str, default_language: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    for caps in FENCE.captures_iter(content) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        push_paragraphs(&mut blocks, &content[cursor..whole.start()]);

        let language = caps
            .get(1)
            .map(|m| m.as_str())
            .filter(|l| !l.is_empty())
            .unwrap_or(default_language);
        let source = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        blocks.push(ContentBlock::code(language, source));

        cursor = whole.end();
    }

    push_paragraphs(&mut blocks, &content[cursor..]);
    blocks
}

/// Split plain text on blank lines, dropping whitespace-only paragraphs
fn push_paragraphs(blocks: &mut Vec<ContentBlock>, text: &str) {
    blocks.extend(
        BLANK_LINE
            .split(text)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(ContentBlock::paragraph),
    );
}
