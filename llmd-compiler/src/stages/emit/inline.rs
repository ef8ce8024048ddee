//! Inline rendering.
//!
//! Applied to paragraph text, list-item text, key-value values and table
//! cells: emphasis markers are dropped (inner text kept) and links collapse
//! to either `text<url>` or bare `text`. URLs survive below compression 2;
//! at 2 they are dropped unless `keep_urls` asks otherwise.

use fancy_regex::Regex as FancyRegex;
use once_cell::sync::Lazy;
use regex::Regex;

static BOLD_STARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static BOLD_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.+?)__").unwrap());
// Single asterisks need look-around so bold remnants are left alone.
static ITALIC: Lazy<FancyRegex> =
    Lazy::new(|| FancyRegex::new(r"(?<!\*)\*(?!\*)(.+?)(?<!\*)\*(?!\*)").unwrap());
static CODE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static STRIKETHROUGH: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.+?)~~").unwrap());

static IMAGE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").unwrap());

fn strip_emphasis(text: &str) -> String {
    let text = BOLD_STARS.replace_all(text, "$1");
    let text = BOLD_UNDERSCORES.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = CODE_SPAN.replace_all(&text, "$1");
    STRIKETHROUGH.replace_all(&text, "$1").into_owned()
}

fn rewrite_links(text: &str, keep_urls: bool) -> String {
    if keep_urls {
        let text = IMAGE_LINK.replace_all(text, "$1<$2>");
        LINK.replace_all(&text, "$1<$2>").into_owned()
    } else {
        let text = IMAGE_LINK.replace_all(text, "$1");
        LINK.replace_all(&text, "$1").into_owned()
    }
}

/// Render one span of Markdown inline content.
pub fn render(text: &str, compression: u8, keep_urls: bool) -> String {
    let text = strip_emphasis(text);
    rewrite_links(&text, compression < 2 || keep_urls)
}
