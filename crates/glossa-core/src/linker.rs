//! Keyword linker: turns raw entry text into HTML with every known keyword
//! replaced by a link to its page.
//!
//! Rendering runs in two passes so that user text is escaped but the anchor
//! markup is not:
//!
//! 1. Every match of the longest-first keyword alternation is replaced by a
//!    placeholder token derived from the keyword (`glossa_kw_<sha256 hex>`).
//!    Literal occurrences of the `glossa_kw_` namespace in the input are
//!    replaced by the reserved token `glossa_kw_raw` in the same scan, so
//!    every token left in the text was produced here.
//! 2. The whole text is HTML-escaped. Placeholders consist of `[a-z0-9_]`
//!    only, so they survive escaping untouched.
//! 3. One scan replaces each keyword placeholder by the final `<a>` element,
//!    whose visible text is the escaped keyword and whose href is the
//!    percent-encoded path, and turns `glossa_kw_raw` back into the namespace
//!    text.
//! 4. Newlines become `<br />`.
//!
//! Inlining anchors during the first pass would either escape the anchor tags
//! or leave keyword text unescaped.

use std::collections::HashMap;

use regex::{Captures, Regex, RegexBuilder};
use sha2::{Digest, Sha256};

use crate::defaults::{KEYWORD_PATH_PREFIX, LINKER_REGEX_SIZE_LIMIT, PLACEHOLDER_PREFIX};
use crate::error::{Error, Result};
use crate::keyword_index::KeywordIndex;

/// Suffix of the token standing in for literal namespace text. Not hex, so it
/// can never be mistaken for a keyword placeholder.
const RAW_SUFFIX: &str = "raw";

/// Compiled matcher for one keyword index snapshot.
#[derive(Debug, Clone)]
pub struct Linker {
    pattern: Option<Regex>,
    tokens: Regex,
    /// False when the namespace text is itself a keyword.
    shields_prefix: bool,
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .size_limit(LINKER_REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| Error::Internal(format!("Failed to compile keyword pattern: {}", e)))
}

impl Linker {
    /// Compile the alternation for `index`.
    pub fn new(index: &KeywordIndex) -> Result<Self> {
        let tokens = compile(&format!(
            "{}(?:{}|[0-9a-f]{{64}})",
            regex::escape(PLACEHOLDER_PREFIX),
            RAW_SUFFIX
        ))?;

        if index.is_empty() {
            return Ok(Self {
                pattern: None,
                tokens,
                shields_prefix: false,
            });
        }

        // The namespace competes like a keyword of its length: longer
        // keywords starting at the same position still win.
        let mut alternatives: Vec<String> = Vec::with_capacity(index.len() + 1);
        let prefix_len = PLACEHOLDER_PREFIX.chars().count();
        let shields_prefix = !index.contains(PLACEHOLDER_PREFIX);
        let mut prefix_pending = shields_prefix;
        for keyword in index.keywords() {
            if prefix_pending && keyword.chars().count() <= prefix_len {
                alternatives.push(regex::escape(PLACEHOLDER_PREFIX));
                prefix_pending = false;
            }
            alternatives.push(regex::escape(keyword));
        }
        if prefix_pending {
            alternatives.push(regex::escape(PLACEHOLDER_PREFIX));
        }

        Ok(Self {
            pattern: Some(compile(&alternatives.join("|"))?),
            tokens,
            shields_prefix,
        })
    }

    /// Render `text` as HTML.
    pub fn render(&self, text: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return escape_html(text).replace('\n', "<br />\n");
        };

        // placeholder -> keyword
        let mut links: HashMap<String, String> = HashMap::new();
        let raw_token = format!("{}{}", PLACEHOLDER_PREFIX, RAW_SUFFIX);

        let substituted = pattern.replace_all(text, |caps: &Captures<'_>| {
            let matched = &caps[0];
            if self.shields_prefix && matched == PLACEHOLDER_PREFIX {
                return raw_token.clone();
            }
            let token = placeholder(matched);
            links
                .entry(token.clone())
                .or_insert_with(|| matched.to_string());
            token
        });

        let escaped = escape_html(&substituted);
        let html = self.tokens.replace_all(&escaped, |caps: &Captures<'_>| {
            let token = &caps[0];
            if token == raw_token {
                return PLACEHOLDER_PREFIX.to_string();
            }
            match links.get(token) {
                Some(keyword) => anchor(keyword),
                None => token.to_string(),
            }
        });

        html.replace('\n', "<br />\n")
    }
}

/// One-shot render against an index.
pub fn htmlify(text: &str, index: &KeywordIndex) -> Result<String> {
    Ok(Linker::new(index)?.render(text))
}

/// Placeholder token for a keyword. Stable across calls and processes.
pub fn placeholder(keyword: &str) -> String {
    let digest = Sha256::digest(keyword.as_bytes());
    format!("{}{}", PLACEHOLDER_PREFIX, hex::encode(digest))
}

/// Path of a keyword's page, percent-encoded.
pub fn keyword_path(keyword: &str) -> String {
    format!("{}{}", KEYWORD_PATH_PREFIX, urlencoding::encode(keyword))
}

fn anchor(keyword: &str) -> String {
    format!(
        r#"<a href="{}">{}</a>"#,
        keyword_path(keyword),
        escape_html(keyword)
    )
}

/// Escape the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(words: &[&str]) -> KeywordIndex {
        KeywordIndex::from_keywords(words.iter().map(|w| w.to_string()))
    }

    fn render(text: &str, words: &[&str]) -> String {
        htmlify(text, &index(words)).unwrap()
    }

    #[test]
    fn test_anchor_wraps_single_match() {
        let html = render("I have a cat", &["cat"]);
        assert_eq!(html, r#"I have a <a href="/keyword/cat">cat</a>"#);
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn test_longest_keyword_wins() {
        let html = render("ab", &["a", "ab"]);
        assert_eq!(html, r#"<a href="/keyword/ab">ab</a>"#);
        assert!(!html.contains("/keyword/a\""));
    }

    #[test]
    fn test_longest_wins_regardless_of_input_order() {
        assert_eq!(render("ab", &["ab", "a"]), render("ab", &["a", "ab"]));
    }

    #[test]
    fn test_leftmost_match_beats_later_longer_match() {
        // "ab" starts first; "bcd" overlaps it and is skipped
        let html = render("abcd", &["ab", "bcd"]);
        assert_eq!(html, r#"<a href="/keyword/ab">ab</a>cd"#);
    }

    #[test]
    fn test_shorter_keyword_matches_outside_longer_one() {
        let html = render("ab a", &["a", "ab"]);
        assert_eq!(
            html,
            r#"<a href="/keyword/ab">ab</a> <a href="/keyword/a">a</a>"#
        );
    }

    #[test]
    fn test_repeated_keyword_links_every_occurrence() {
        let html = render("cat and cat", &["cat"]);
        assert_eq!(html.matches(r#"<a href="/keyword/cat">cat</a>"#).count(), 2);
    }

    #[test]
    fn test_script_is_escaped_without_keywords() {
        let html = render("<script>", &[]);
        assert_eq!(html, "&lt;script&gt;");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_text_around_links_is_escaped() {
        let html = render("<b>cat</b> & \"dog\"", &["cat"]);
        assert_eq!(
            html,
            r#"&lt;b&gt;<a href="/keyword/cat">cat</a>&lt;/b&gt; &amp; &quot;dog&quot;"#
        );
    }

    #[test]
    fn test_keyword_with_markup_is_escaped_inside_anchor() {
        let html = render("x <i> y", &["<i>"]);
        assert_eq!(html, r#"x <a href="/keyword/%3Ci%3E">&lt;i&gt;</a> y"#);
    }

    #[test]
    fn test_keyword_is_matched_literally() {
        let html = render("c++ and cxx", &["c++", "c.x"]);
        assert_eq!(html, r#"<a href="/keyword/c%2B%2B">c++</a> and cxx"#);
    }

    #[test]
    fn test_unicode_keyword_is_percent_encoded() {
        let html = render("私の猫", &["猫"]);
        assert_eq!(html, r#"私の<a href="/keyword/%E7%8C%AB">猫</a>"#);
    }

    #[test]
    fn test_keyword_with_space_is_percent_encoded() {
        let html = render("a hot dog", &["hot dog"]);
        assert_eq!(html, r#"a <a href="/keyword/hot%20dog">hot dog</a>"#);
    }

    #[test]
    fn test_newlines_become_line_breaks() {
        let html = render("cat\ndog", &["cat"]);
        assert_eq!(html, "<a href=\"/keyword/cat\">cat</a><br />\ndog");
    }

    #[test]
    fn test_no_match_returns_escaped_text() {
        assert_eq!(render("a < b\nc", &["zebra"]), "a &lt; b<br />\nc");
    }

    #[test]
    fn test_render_is_deterministic() {
        let idx = index(&["cat", "catalog", "dog", "<"]);
        let text = "catalog of cats & dogs <3\nmore cats";
        let linker = Linker::new(&idx).unwrap();
        assert_eq!(linker.render(text), linker.render(text));
        assert_eq!(linker.render(text), htmlify(text, &idx).unwrap());
    }

    #[test]
    fn test_placeholder_is_stable_and_distinct() {
        assert_eq!(placeholder("cat"), placeholder("cat"));
        assert_ne!(placeholder("cat"), placeholder("Cat"));
        assert!(placeholder("cat").starts_with(PLACEHOLDER_PREFIX));
        assert_eq!(escape_html(&placeholder("<&>")), placeholder("<&>"));
    }

    #[test]
    fn test_literal_placeholder_in_text_is_not_linked() {
        let forged = placeholder("cat");
        let html = render(&format!("cat {}", forged), &["cat"]);
        assert_eq!(html, format!(r#"<a href="/keyword/cat">cat</a> {}"#, forged));
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn test_namespace_text_survives_rendering() {
        assert_eq!(
            render("glossa_kw_raw and cat", &["cat"]),
            r#"glossa_kw_raw and <a href="/keyword/cat">cat</a>"#
        );
        assert_eq!(render("glossa_kw_", &["cat"]), "glossa_kw_");
    }

    #[test]
    fn test_keyword_containing_a_placeholder_is_inserted_once() {
        let tricky = placeholder("cat");
        let html = render(&format!("{} cat", tricky), &[tricky.as_str(), "cat"]);
        assert_eq!(html.matches("<a ").count(), 2);
        assert!(html.ends_with(r#" <a href="/keyword/cat">cat</a>"#));
    }

    #[test]
    fn test_longer_keyword_beats_namespace_text() {
        let html = render("glossa_kw_x", &["glossa_kw_x"]);
        assert_eq!(html, r#"<a href="/keyword/glossa_kw_x">glossa_kw_x</a>"#);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(render("Cat", &["cat"]), "Cat");
    }
}
