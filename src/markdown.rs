//! Markdown Rendering
//!
//! Card descriptions and comments are written by other users, so rendering
//! is restricted:
//! - Raw HTML is shown as text
//! - Links and images only keep http(s)/mailto targets
//! - Fenced code blocks are highlighted with syntect
//! - `@username` mentions are wrapped for styling

use pulldown_cmark::{html::push_html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> Option<&'static Theme> {
    THEME_SET.get_or_init(ThemeSet::load_defaults).themes.get("InspiredGitHub")
}

const SAFE_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Render user-written markdown to HTML
pub fn render_markdown(text: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(text, options);
    let mut html = String::new();
    push_html(&mut html, transform_events(parser).into_iter());
    html
}

/// Single-paragraph rendering without the wrapping `<p>`
pub fn render_markdown_inline(text: &str) -> String {
    let html = render_markdown(text);
    html.trim()
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .map(str::to_string)
        .unwrap_or(html)
}

fn is_safe_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    SAFE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

enum State {
    Normal,
    InCodeBlock { lang: Option<String>, content: String },
    /// Inside an image whose alt text is being collected
    InImage { url: Option<String>, alt: String, depth: usize },
}

fn transform_events(parser: Parser<'_>) -> Vec<Event<'_>> {
    let mut events = Vec::new();
    let mut state = State::Normal;

    for event in parser {
        match state {
            State::Normal => match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(l) if !l.is_empty() => Some(l.to_string()),
                        _ => None,
                    };
                    state = State::InCodeBlock { lang, content: String::new() };
                }
                Event::Start(Tag::Image { dest_url, .. }) => {
                    let url = is_safe_url(&dest_url).then(|| dest_url.to_string());
                    state = State::InImage { url, alt: String::new(), depth: 0 };
                }
                Event::Start(Tag::Link { link_type, dest_url, title, id }) => {
                    let dest_url = if is_safe_url(&dest_url) { dest_url } else { CowStr::from("#") };
                    events.push(Event::Start(Tag::Link { link_type, dest_url, title, id }));
                }
                Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
                Event::Text(text) if text.contains('@') => events.extend(mention_events(&text)),
                other => events.push(other),
            },

            State::InCodeBlock { ref lang, ref mut content } => match event {
                Event::Text(t) => content.push_str(&t),
                Event::End(TagEnd::CodeBlock) => {
                    events.push(Event::Html(CowStr::from(highlight_code(content, lang.as_deref()))));
                    state = State::Normal;
                }
                _ => {}
            },

            State::InImage { ref url, ref mut alt, ref mut depth } => match event {
                Event::Start(_) => *depth += 1,
                Event::End(_) if *depth > 0 => *depth -= 1,
                Event::End(_) => {
                    let html = match url {
                        Some(url) => format!(
                            r#"<img class="md-image" src="{}" alt="{}" />"#,
                            escape_html(url),
                            escape_html(alt)
                        ),
                        None => escape_html(alt),
                    };
                    events.push(Event::Html(CowStr::from(html)));
                    state = State::Normal;
                }
                Event::Text(t) | Event::Code(t) => alt.push_str(&t),
                _ => {}
            },
        }
    }

    events
}

/// Split text around `@name` tokens
fn mention_events(text: &str) -> Vec<Event<'static>> {
    let mut events = Vec::new();
    let mut plain = String::new();
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let starts_word = i == 0 || text[..i].ends_with(char::is_whitespace);
        if c != '@' || !starts_word {
            plain.push(c);
            continue;
        }
        let mut name = String::new();
        while let Some(&(_, next)) = chars.peek() {
            if next.is_alphanumeric() || next == '_' || next == '.' || next == '-' {
                name.push(next);
                chars.next();
            } else {
                break;
            }
        }
        if name.is_empty() {
            plain.push('@');
            continue;
        }
        if !plain.is_empty() {
            events.push(Event::Text(CowStr::from(std::mem::take(&mut plain))));
        }
        events.push(Event::Html(CowStr::from(format!(
            r#"<span class="mention">@{}</span>"#,
            escape_html(&name)
        ))));
    }
    if !plain.is_empty() {
        events.push(Event::Text(CowStr::from(plain)));
    }
    events
}

fn highlight_code(code: &str, lang: Option<&str>) -> String {
    let ss = syntax_set();
    let syntax = lang
        .and_then(|l| ss.find_syntax_by_token(l))
        .unwrap_or_else(|| ss.find_syntax_plain_text());

    theme()
        .and_then(|theme| highlighted_html_for_string(code, ss, syntax, theme).ok())
        .unwrap_or_else(|| format!("<pre><code>{}</code></pre>", escape_html(code)))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("hello <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_unsafe_link_neutralized() {
        let html = render_markdown("[x](javascript:alert(1)) [y](https://example.com)");
        assert!(!html.contains("javascript:"));
        assert!(html.contains(r#"href="https://example.com""#));
    }

    #[test]
    fn test_images_keep_only_safe_sources() {
        let html = render_markdown("![diagram](https://example.com/a.png)");
        assert!(html.contains(r#"<img class="md-image" src="https://example.com/a.png" alt="diagram" />"#));
        let html = render_markdown("![local](file:///etc/passwd)");
        assert!(!html.contains("<img"));
        assert!(html.contains("local"));
    }

    #[test]
    fn test_mentions() {
        let html = render_markdown_inline("ping @ada.l about it, mail a@b.io");
        assert_eq!(html, r#"ping <span class="mention">@ada.l</span> about it, mail a@b.io"#);
    }

    #[test]
    fn test_inline_strips_paragraph() {
        assert_eq!(render_markdown_inline("**bold**"), "<strong>bold</strong>");
    }

    #[test]
    fn test_code_block_highlighted() {
        let html = render_markdown("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre"));
        assert!(html.contains("main"));
    }
}
