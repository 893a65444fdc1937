//! HTML rendering of content blocks with syntax highlighting

use anyhow::{anyhow, Result};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::blocks::{self, ContentBlock};
use crate::config::HighlightConfig;

/// Turns post content into article HTML
pub struct ContentRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
    default_language: String,
}

impl ContentRenderer {
    /// Create a renderer with the default highlight settings
    pub fn new() -> Self {
        Self::with_config(&HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_config(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            line_numbers: config.line_number,
            default_language: config.default_language.clone(),
        }
    }

    /// Split content into blocks using the configured default language
    pub fn blocks(&self, content: &str) -> Vec<ContentBlock> {
        blocks::render(content, &self.default_language)
    }

    /// Render content to HTML
    pub fn render(&self, content: &str) -> Result<String> {
        let mut html = String::new();

        for block in self.blocks(content) {
            match block {
                ContentBlock::Paragraph { text } => {
                    html.push_str(&format!("<p>{}</p>\n", html_escape(&text)));
                }
                ContentBlock::Code { language, source } => {
                    html.push_str(&self.highlight_code(&source, &language)?);
                    html.push('\n');
                }
            }
        }

        Ok(html)
    }

    fn theme(&self) -> Result<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
            .ok_or_else(|| anyhow!("No highlight themes available"))
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: &str) -> Result<String> {
        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme()?;
        let lang = html_escape(lang);

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) if self.line_numbers => {
                Ok(add_line_numbers(&highlighted, code.lines().count(), &lang))
            }
            Ok(highlighted) => Ok(format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                lang, highlighted
            )),
            Err(e) => {
                tracing::warn!("Highlighting {} block failed, emitting plain code: {}", lang, e);
                Ok(format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    lang,
                    html_escape(code)
                ))
            }
        }
    }
}

impl Default for ContentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap highlighted code in a table with one gutter number per source line
fn add_line_numbers(highlighted: &str, line_count: usize, lang: &str) -> String {
    let gutter: Vec<String> = (1..=line_count)
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect();

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang,
        gutter.join("\n"),
        highlighted.trim_end()
    )
}

/// Simple HTML escaping
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_paragraphs_escaped() {
        let renderer = ContentRenderer::new();
        let html = renderer.render("Use <div> & friends.\n\nSecond.").unwrap();
        assert!(html.contains("<p>Use &lt;div&gt; &amp; friends.</p>"));
        assert!(html.contains("<p>Second.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = ContentRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains(r#"<figure class="highlight rust">"#));
        assert!(html.contains("line-number"));
    }

    #[test]
    fn test_gutter_matches_source_lines() {
        let renderer = ContentRenderer::new();

        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert_eq!(html.matches(r#"class="line-number""#).count(), 1);

        let html = renderer
            .render("```rust\nfn main() {\n    run();\n}\n```")
            .unwrap();
        assert_eq!(html.matches(r#"class="line-number""#).count(), 3);
        assert!(html.contains(r#"<td class="code"><pre"#));
    }

    #[test]
    fn test_language_is_escaped() {
        let renderer = ContentRenderer::new();
        let html = renderer
            .render("```x\"><script>alert(1)</script>\nboom\n```")
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"class="highlight x&quot;&gt;&lt;script&gt;"#));

        let config = HighlightConfig {
            line_number: false,
            ..Default::default()
        };
        let html = ContentRenderer::with_config(&config)
            .render("```a<b>\nboom\n```")
            .unwrap();
        assert!(html.contains(r#"<figure class="highlight a&lt;b&gt;">"#));
    }

    #[test]
    fn test_render_without_line_numbers() {
        let config = HighlightConfig {
            line_number: false,
            ..Default::default()
        };
        let renderer = ContentRenderer::with_config(&config);
        let html = renderer.render("```\nconsole.log(1)\n```").unwrap();
        assert!(html.contains("highlight javascript"));
        assert!(!html.contains("line-number"));
    }

    #[test]
    fn test_unknown_language_and_theme_still_render() {
        let config = HighlightConfig {
            theme: "no-such-theme".to_string(),
            ..Default::default()
        };
        let renderer = ContentRenderer::with_config(&config);
        let html = renderer.render("```klingon\nqapla'\n```").unwrap();
        assert!(html.contains("highlight klingon"));
    }

    #[test]
    fn test_blocks_use_configured_default_language() {
        let config = HighlightConfig {
            default_language: "bash".to_string(),
            ..Default::default()
        };
        let renderer = ContentRenderer::with_config(&config);
        assert_eq!(
            renderer.blocks("```\nls\n```"),
            vec![ContentBlock::code("bash", "ls\n")]
        );
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape(r#"<a href="x">'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&lt;/a&gt;");
    }
}
