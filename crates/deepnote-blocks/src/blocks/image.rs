//! `image` blocks, rendered as an inline `<img>` tag.
//!
//! The source URL is the only author-controlled value that reaches an HTML
//! attribute unfiltered, so it is checked against an allowlist of schemes and
//! then escaped. Width and alignment are reduced to known-safe characters.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use deepnote_core::model::Block;

use crate::errors::BlockResult;

static JAVASCRIPT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^javascript:").unwrap());
static DATA_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^data:image/(png|jpeg|jpg|gif|webp|svg\+xml|bmp|ico)(;base64)?,").unwrap());

pub(crate) const ALIGNMENTS: &[&str] = &["left", "center", "right"];

/// Whether `url` may be used as an image source. Empty is allowed.
pub fn is_valid_image_url(url: &str) -> bool {
    if url.is_empty() {
        return true;
    }
    if JAVASCRIPT_RE.is_match(url) {
        return false;
    }
    if url.get(..5).is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:")) {
        return DATA_IMAGE_RE.is_match(url);
    }
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// `url` if valid, otherwise the empty string.
pub fn sanitize_image_url(url: &str) -> &str {
    if is_valid_image_url(url) {
        url
    } else {
        ""
    }
}

fn escape_html_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn sanitize_width(width: &str) -> String {
    width.chars().filter(char::is_ascii_digit).collect()
}

fn sanitize_alignment(alignment: &str) -> String {
    let lower = alignment.to_ascii_lowercase();
    if ALIGNMENTS.contains(&lower.as_str()) {
        lower
    } else {
        String::new()
    }
}

pub fn markdown(block: &Block) -> BlockResult<String> {
    let meta = metadata_of!(block, Image);
    let src = escape_html_attribute(sanitize_image_url(meta.deepnote_img_src.as_deref().unwrap_or("")));
    let width = sanitize_width(meta.deepnote_img_width.as_deref().unwrap_or(""));
    let align = sanitize_alignment(meta.deepnote_img_alignment.as_deref().unwrap_or(""));
    Ok(format!(r#"<img src="{src}" width="{width}" align="{align}" />"#))
}
