//! Jira wiki-markup to chat-markdown translation.
//!
//! [`translate`] is a pure text transform: an ordered list of
//! (matcher, rewrite) pairs applied in sequence. The order is a contract.
//! Rules assume earlier rules have already normalized certain token shapes;
//! reordering them mangles nested markup (inline code inside a code block,
//! color spans inside fenced output).
//!
//! Rule order:
//! 1. `h1.`..`h6.` heading prefixes become `*bold*` lines
//! 2. `-text-` becomes `~text~` strikethrough
//! 3. `{{text}}` becomes `` `text` `` inline code
//! 4. `{code[:lang]}..{code}` becomes a fenced block
//! 5. `{quote}..{quote}` becomes a fenced block
//! 6. `[label|url]` becomes `[label](url)`
//! 7. `{color:..}text{color}` is stripped to `text`
//! 8. `^sup^` and `+sub+` markers are stripped
//! 9. `!file|thumbnail!` becomes a `:camera:` glyph, hyperlinked to the
//!    matching attachment's thumbnail when one exists

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::jira::types::Attachment;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^h\d\.\s([^\n]+)").expect("Invalid heading regex"));

static STRIKETHROUGH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\B-([^-]+)-\B").expect("Invalid strikethrough regex"));

static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\B\{\{(.*)\}\}\B").expect("Invalid inline code regex"));

static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{code(?::[^}]*)?\}(?s:(.*?))\{code\}").expect("Invalid code block regex")
});

static QUOTE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{quote\}(?s:(.*?))\{quote\}").expect("Invalid quote regex"));

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^ ]+)\|([^\]]+)\]").expect("Invalid link regex"));

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{color:[^}]+\}(.*?)\{color\}").expect("Invalid color regex"));

static SUPERSCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\B\^([^\^]+)\^\B").expect("Invalid superscript regex"));

static SUBSCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\B\+([^+]+)\+\B").expect("Invalid subscript regex"));

static THUMBNAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!([^|]+)\|thumbnail!").expect("Invalid thumbnail regex"));

/// Translates a Jira wiki-markup body into chat markdown.
///
/// An empty or absent body yields an empty string. Plain text containing no
/// recognized tokens passes through unchanged.
///
/// # Examples
///
/// ```
/// use jira_bridge::markup::translate;
///
/// assert_eq!(translate(Some("h1. Title"), &[]), "*Title*");
/// assert_eq!(translate(Some("no markup here"), &[]), "no markup here");
/// assert_eq!(translate(None, &[]), "");
/// ```
pub fn translate(body: Option<&str>, attachments: &[Attachment]) -> String {
    let Some(body) = body else {
        return String::new();
    };

    let text = HEADING_RE.replace_all(body, "*${1}*");
    let text = STRIKETHROUGH_RE.replace_all(&text, "~${1}~");
    let text = INLINE_CODE_RE.replace_all(&text, "`${1}`");
    let text = CODE_BLOCK_RE.replace_all(&text, "```\n${1}\n```");
    let text = QUOTE_BLOCK_RE.replace_all(&text, "```\n${1}\n```");
    let text = LINK_RE.replace_all(&text, "[${1}](${2})");
    let text = COLOR_RE.replace_all(&text, "${1}");
    let text = SUPERSCRIPT_RE.replace_all(&text, "${1}");
    let text = SUBSCRIPT_RE.replace_all(&text, "${1}");
    let text = THUMBNAIL_RE.replace_all(&text, |caps: &Captures<'_>| {
        let filename = &caps[1];
        let thumbnail = attachments
            .iter()
            .find(|a| a.filename == filename)
            .and_then(|a| a.thumbnail.as_deref());
        match thumbnail {
            Some(url) => format!("[:camera:]({})", url),
            None => ":camera:".to_string(),
        }
    });

    text.into_owned()
}
