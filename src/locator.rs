//! # Image Locator
//!
//! Finds the newest qualifying image in an HTML directory listing.
//!
//! ## Listing Format
//! The NOAA CDN serves a plain index page where every file is an anchor:
//! ```text
//! <a href="20241581200_GOES16-ABI-FD-GEOCOLOR-21696x21696.jpg">…</a>
//! ```
//! Filenames begin with the capture time, so the lexicographically greatest
//! name is also the most recent capture.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{Error, Result};
use crate::http;

/// Matches the `href` attribute of an `<a>` tag in any of its three quoting styles.
/// The attribute name must follow whitespace so `data-href` and the like never match.
static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("anchor pattern is valid")
});

/// Character references that can appear inside attribute values.
static CHAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|(amp|lt|gt|quot|apos));")
        .expect("character reference pattern is valid")
});

/// Fetches the listing page and returns the full URL of the newest qualifying image.
///
/// # Arguments
/// * `page_url` - Listing URL; also the base the chosen href is appended to
/// * `suffix` - Required filename ending (e.g. `21696x21696.jpg`)
///
/// # Returns
/// * `Ok(Some(url))` - `page_url` concatenated with the newest matching href
/// * `Ok(None)` - The page holds no matching anchors
/// * `Err(_)` - Network failure, non-2xx status or unreadable body
pub async fn locate_latest(
    client: &reqwest::Client,
    page_url: &str,
    suffix: &str,
) -> Result<Option<String>> {
    let response = http::get_checked(client, page_url).await?;
    let html = response.text().await.map_err(|source| Error::Request {
        url: page_url.to_string(),
        source,
    })?;

    Ok(latest_reference(&html, suffix).map(|reference| format!("{page_url}{reference}")))
}

/// Picks the greatest href ending in `suffix`, or `None` if nothing qualifies.
pub fn latest_reference(html: &str, suffix: &str) -> Option<String> {
    anchor_hrefs(html)
        .filter(|href| href.ends_with(suffix))
        .max()
        .map(Cow::into_owned)
}

/// Yields every anchor's `href` value with character references decoded.
fn anchor_hrefs(html: &str) -> impl Iterator<Item = Cow<'_, str>> {
    ANCHOR_HREF.captures_iter(html).filter_map(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| decode_char_refs(m.as_str()))
    })
}

/// Decodes `&amp;`-style named and `&#NN;`/`&#xHH;` numeric references.
/// Unknown or invalid references are left as written.
fn decode_char_refs(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }

    CHAR_REF.replace_all(value, |caps: &Captures<'_>| {
        let decoded = if let Some(dec) = caps.get(1) {
            dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
        } else if let Some(hex) = caps.get(2) {
            u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
        } else {
            match caps.get(3).map(|m| m.as_str()) {
                Some("amp") => Some('&'),
                Some("lt") => Some('<'),
                Some("gt") => Some('>'),
                Some("quot") => Some('"'),
                Some("apos") => Some('\''),
                _ => None,
            }
        };

        decoded.map_or_else(|| caps[0].to_string(), String::from)
    })
}
