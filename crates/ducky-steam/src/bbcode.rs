//! Markdown to Steam BBCode conversion
//!
//! An ordered chain of global substitutions. Order matters: every pass
//! operates on the previous pass's output, and later passes must not
//! reinterpret already-emitted BBCode as Markdown (headings before
//! emphasis, combined emphasis before plain, list items before list
//! wrapping). The converter never fails; unrecognized syntax passes
//! through literally.

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```\w*\n(.*?)```").expect("code block pattern"));
static INLINE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("inline code pattern"));

// Heading patterns, processed h6 first so shorter prefixes cannot match
// inside longer ones.
static HEADING_RES: Lazy<Vec<(Regex, String)>> = Lazy::new(|| {
    (1..=6)
        .rev()
        .map(|level| {
            let pattern = format!(r"(?m)^{}\s+(.+)$", "#".repeat(level));
            let replacement = format!("[h{level}]${{1}}[/h{level}]");
            (Regex::new(&pattern).expect("heading pattern"), replacement)
        })
        .collect()
});

static BOLD_ITALIC_STAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*\*(.+?)\*\*\*").expect("bold italic pattern"));
static BOLD_ITALIC_UNDERSCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"___(.+?)___").expect("bold italic pattern"));
static BOLD_STAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern"));
static BOLD_UNDERSCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__(.+?)__").expect("bold pattern"));
static ITALIC_STAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*(.+?)\*").expect("italic pattern"));
static ITALIC_UNDERSCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_(.+?)_").expect("italic pattern"));
static STRIKETHROUGH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"~~(.+?)~~").expect("strikethrough pattern"));

static HR_DASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^-{3,}$").expect("hr pattern"));
static HR_STAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\*{3,}$").expect("hr pattern"));

static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("image pattern"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern"));

static UNORDERED_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[\*\-]\s+(.+)$").expect("list item pattern"));
static ORDERED_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\d+\.\s+(.+)$").expect("list item pattern"));
static LIST_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\[\*\].+\n?)+").expect("list run pattern"));

// Pass 1 escapes `>` to `&gt;`, so blockquote markers arrive here in their
// escaped form.
static QUOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^&gt;\s+(.+)$").expect("quote pattern"));
static QUOTE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\[quote\].+\n?)+").expect("quote run pattern"));

static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\n+").expect("blank run pattern"));

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("title pattern"));

/// Convert a Markdown document to Steam Workshop BBCode
pub fn markdown_to_bbcode(markdown: &str) -> String {
    // Raw angle brackets first, so source content cannot smuggle HTML or
    // BBCode-looking markup through the later passes.
    let mut result = markdown.replace('<', "&lt;").replace('>', "&gt;");

    result = CODE_BLOCK_RE
        .replace_all(&result, "[code]${1}[/code]")
        .into_owned();
    // Steam BBCode has no monospace tag; bold is the nearest equivalent
    result = INLINE_CODE_RE
        .replace_all(&result, "[b]${1}[/b]")
        .into_owned();

    for (pattern, replacement) in HEADING_RES.iter() {
        result = pattern
            .replace_all(&result, replacement.as_str())
            .into_owned();
    }

    result = BOLD_ITALIC_STAR_RE
        .replace_all(&result, "[b][i]${1}[/i][/b]")
        .into_owned();
    result = BOLD_ITALIC_UNDERSCORE_RE
        .replace_all(&result, "[b][i]${1}[/i][/b]")
        .into_owned();
    result = BOLD_STAR_RE
        .replace_all(&result, "[b]${1}[/b]")
        .into_owned();
    result = BOLD_UNDERSCORE_RE
        .replace_all(&result, "[b]${1}[/b]")
        .into_owned();
    result = ITALIC_STAR_RE
        .replace_all(&result, "[i]${1}[/i]")
        .into_owned();
    result = ITALIC_UNDERSCORE_RE
        .replace_all(&result, "[i]${1}[/i]")
        .into_owned();
    result = STRIKETHROUGH_RE
        .replace_all(&result, "[s]${1}[/s]")
        .into_owned();

    result = HR_DASH_RE.replace_all(&result, "[hr]").into_owned();
    result = HR_STAR_RE.replace_all(&result, "[hr]").into_owned();

    // Alt text is discarded; BBCode images have no alt attribute
    result = IMAGE_RE
        .replace_all(&result, "[img]${2}[/img]")
        .into_owned();
    result = LINK_RE
        .replace_all(&result, "[url=${2}]${1}[/url]")
        .into_owned();

    result = UNORDERED_ITEM_RE
        .replace_all(&result, "[*]${1}")
        .into_owned();
    result = ORDERED_ITEM_RE
        .replace_all(&result, "[*]${1}")
        .into_owned();

    // Each contiguous run of [*] lines becomes one [list] block; any other
    // line breaks the run.
    result = LIST_RUN_RE
        .replace_all(&result, |caps: &regex::Captures<'_>| {
            let run = caps.get(0).map_or("", |m| m.as_str());
            format!("[list]\n{}\n[/list]\n", run.trim_end())
        })
        .into_owned();

    result = QUOTE_RE
        .replace_all(&result, "[quote]${1}[/quote]")
        .into_owned();
    // Quote runs stay as consecutive tags; only trailing newlines are
    // normalized.
    result = QUOTE_RUN_RE
        .replace_all(&result, |caps: &regex::Captures<'_>| {
            let run = caps.get(0).map_or("", |m| m.as_str());
            format!("{}\n", run.trim_end())
        })
        .into_owned();

    result = BLANK_RUN_RE.replace_all(&result, "\n\n").into_owned();

    result
}

/// Extract the display title of a Markdown document
///
/// The title is the first H1 heading; when none exists the caller-supplied
/// default is used.
pub fn extract_title(markdown: &str, default_title: &str) -> String {
    TITLE_RE
        .captures(markdown)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| default_title.to_string())
}
