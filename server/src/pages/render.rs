//! Page body rendering.
//!
//! Markdown is rendered to HTML, bare URLs and email addresses in text are
//! turned into links, and the result is run through an allow-list sanitizer.
//! Sanitization always runs last so linkification cannot introduce markup
//! the allow-list would reject.

use std::collections::HashSet;

use ammonia::Builder;
use lazy_static::lazy_static;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

lazy_static! {
    static ref URL_RE: Regex =
        Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>()\[\]{}'"]+"#).unwrap();
    static ref EMAIL_RE: Regex =
        Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").unwrap();
    static ref CLEANER: Builder<'static> = {
        let mut builder = Builder::default();
        builder.tags(HashSet::from([
            "a", "abbr", "b", "blockquote", "br", "code", "em", "h1", "h2", "h3", "h4", "h5",
            "h6", "hr", "i", "img", "li", "ol", "p", "pre", "s", "strong", "sub", "sup", "u",
            "ul",
        ]));
        builder.tag_attributes(std::collections::HashMap::from([
            (
                "a",
                HashSet::from(["href", "title", "target", "class", "data-external"]),
            ),
            ("img", HashSet::from(["src", "title", "alt", "class"])),
            ("p", HashSet::from(["class"])),
            ("li", HashSet::from(["class"])),
        ]));
        builder.url_schemes(HashSet::from(["http", "https", "mailto", "data"]));
        builder.link_rel(Some("noopener nofollow"));
        builder
    };
}

/// Escape text for use inside an HTML text node.
fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for use inside a double-quoted attribute value.
fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn anchor(href: &str, label: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" data-external="true">{}</a>"#,
        escape_attr(href),
        escape_text(label)
    )
}

/// Replace bare URLs and email addresses in a text run with anchor markup.
///
/// Returns `None` when the text contains nothing linkable, so the caller can
/// keep the original borrowed event.
fn linkify_text(text: &str) -> Option<String> {
    if !URL_RE.is_match(text) && !EMAIL_RE.is_match(text) {
        return None;
    }

    let mut out = String::with_capacity(text.len() + 64);
    let mut cursor = 0;

    // Collect both kinds of match and process them left to right.
    let mut matches: Vec<(usize, usize, bool)> = URL_RE
        .find_iter(text)
        .map(|m| (m.start(), m.end(), false))
        .chain(
            EMAIL_RE
                .find_iter(text)
                .map(|m| (m.start(), m.end(), true)),
        )
        .collect();
    matches.sort_by_key(|&(start, _, _)| start);

    for (start, end, is_email) in matches {
        if start < cursor {
            // Overlaps a match we already emitted (an email inside a URL).
            continue;
        }
        out.push_str(&escape_text(&text[cursor..start]));
        let raw = &text[start..end];
        // Trailing punctuation is almost never part of the target.
        let trimmed = raw.trim_end_matches(['.', ',', ';', ':', '!', '?']);
        let rest = &raw[trimmed.len()..];
        if is_email {
            out.push_str(&anchor(&format!("mailto:{trimmed}"), trimmed));
        } else if trimmed.to_ascii_lowercase().starts_with("www.") {
            out.push_str(&anchor(&format!("https://{trimmed}"), trimmed));
        } else {
            out.push_str(&anchor(trimmed, trimmed));
        }
        out.push_str(&escape_text(rest));
        cursor = end;
    }
    out.push_str(&escape_text(&text[cursor..]));
    Some(out)
}

/// Render Markdown to HTML with bare URLs and emails linkified.
///
/// Text inside code blocks, inline code, and existing links is left alone.
#[must_use]
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(source, options);

    let mut in_code_block = 0u32;
    let mut in_link = 0u32;
    let mut events: Vec<Event> = Vec::new();

    for ev in parser {
        match ev {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block += 1;
                events.push(ev);
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = in_code_block.saturating_sub(1);
                events.push(ev);
            }
            Event::Start(Tag::Link { .. }) => {
                in_link += 1;
                events.push(ev);
            }
            Event::End(TagEnd::Link) => {
                in_link = in_link.saturating_sub(1);
                events.push(ev);
            }
            Event::Text(text) if in_code_block == 0 && in_link == 0 => {
                match linkify_text(&text) {
                    Some(html) => {
                        events.push(Event::Html(CowStr::Boxed(html.into_boxed_str())));
                    }
                    None => events.push(Event::Text(text)),
                }
            }
            other => events.push(other),
        }
    }

    let mut html = String::with_capacity(source.len() * 2);
    pulldown_cmark::html::push_html(&mut html, events.into_iter());
    html
}

/// Strip markup outside the allow-list from an HTML fragment.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    CLEANER.clean(html).to_string()
}

/// Full body pipeline: Markdown, linkify, sanitize.
#[must_use]
pub fn render_page(source: &str) -> String {
    sanitize_html(&render_markdown(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_basics_survive() {
        let html = render_page("**bold** and _italic_");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn test_script_is_stripped() {
        let html = render_page("hello <script>alert(1)</script> world");
        assert!(!html.contains("<script"));
        assert!(!html.contains("alert(1)"));
        assert!(html.contains("hello"));
    }

    #[test]
    fn test_bare_url_becomes_link() {
        let html = render_page("see https://example.com for details");
        assert!(html.contains(r#"href="https://example.com""#));
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains(r#"data-external="true""#));
    }

    #[test]
    fn test_www_url_gets_scheme() {
        let html = render_page("visit www.example.com today");
        assert!(html.contains(r#"href="https://www.example.com""#));
        assert!(html.contains(">www.example.com</a>"));
    }

    #[test]
    fn test_email_becomes_mailto() {
        let html = render_page("write to team@example.com please");
        assert!(html.contains(r#"href="mailto:team@example.com""#));
    }

    #[test]
    fn test_code_blocks_are_not_linkified() {
        let html = render_page("```\nhttps://example.com\n```");
        assert!(!html.contains("<a "));
        assert!(html.contains("https://example.com"));
    }

    #[test]
    fn test_inline_code_is_not_linkified() {
        let html = render_page("run `curl https://example.com` locally");
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_existing_links_are_not_double_wrapped() {
        let html = render_page("[https://example.com](https://example.com)");
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn test_trailing_punctuation_excluded() {
        let html = render_page("see https://example.com.");
        assert!(html.contains(r#"href="https://example.com""#));
    }

    #[test]
    fn test_links_gain_rel() {
        let html = render_page("[here](https://example.com)");
        assert!(html.contains(r#"rel="noopener nofollow""#));
    }

    #[test]
    fn test_disallowed_scheme_removed() {
        let html = sanitize_html(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn test_img_src_preserved() {
        let html = sanitize_html(r#"<img src="https://example.com/a.png" alt="a">"#);
        assert!(html.contains(r#"src="https://example.com/a.png""#));
        assert!(html.contains(r#"alt="a""#));
    }

    #[test]
    fn test_extended_headings_allowed() {
        let html = render_page("#### fourth level");
        assert!(html.contains("<h4>"));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = render_page("**bold** https://example.com <b onclick=x>b</b>");
        let twice = sanitize_html(&once);
        assert_eq!(once, twice);
    }
}
