//! Generic page-fetch-and-summarize: pull the page, strip the markup, and
//! let the model write the summary. The only enricher that goes back
//! through the model gateway.

use super::{Enrichment, EnrichError};
use crate::ai::ModelGateway;
use reqwest::Client;

/// Upper bound on the text handed to the model, in characters.
const MAX_PAGE_CHARS: usize = 12_000;

const SUMMARY_PROMPT: &str = "You summarize web page text. Reply with one short \
paragraph covering the main points, in the language the text is written in.";

pub async fn summarize(
    http: &Client,
    gateway: &ModelGateway,
    target: &str,
) -> Result<Enrichment, EnrichError> {
    let url = url::Url::parse(target.trim()).map_err(|_| EnrichError::NotFound)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(EnrichError::NotFound);
    }

    let response = http
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| EnrichError::Upstream(format!("page fetch failed: {}", e)))?;

    let status = response.status().as_u16();
    match status {
        200..=299 => {}
        404 => return Err(EnrichError::NotFound),
        429 => return Err(EnrichError::RateLimited),
        _ => {
            return Err(EnrichError::Upstream(format!(
                "page returned status {}",
                status
            )));
        }
    }

    let body = response
        .text()
        .await
        .map_err(|e| EnrichError::Upstream(format!("failed to read page body: {}", e)))?;

    let text = truncate_chars(&strip_markup(&body), MAX_PAGE_CHARS);
    if text.trim().is_empty() {
        return Err(EnrichError::NotFound);
    }

    let summary = gateway
        .complete(SUMMARY_PROMPT, &text)
        .await
        .map_err(|e| EnrichError::Upstream(e.to_string()))?;

    Ok(Enrichment::new(format!("Summary of {}:\n{}", url, summary)))
}

/// Strip tags, scripts and styles from an HTML body, collapsing whitespace.
/// Good enough for feeding a summarizer; this is not a real HTML parser.
fn strip_markup(html: &str) -> String {
    let mut text = String::new();
    let mut in_tag = false;
    let mut skip_depth = 0usize;
    let mut last_was_space = true;
    let mut tag = String::new();

    for c in html.chars() {
        if c == '<' {
            in_tag = true;
            tag.clear();
            continue;
        }

        if c == '>' {
            in_tag = false;
            let name = tag
                .trim_start_matches('/')
                .split(|c: char| c.is_whitespace())
                .next()
                .unwrap_or("")
                .to_lowercase();

            if name == "script" || name == "style" {
                if tag.starts_with('/') {
                    skip_depth = skip_depth.saturating_sub(1);
                } else {
                    skip_depth += 1;
                }
            }

            if !last_was_space {
                text.push(' ');
                last_was_space = true;
            }
            continue;
        }

        if in_tag {
            tag.push(c);
            continue;
        }

        if skip_depth > 0 {
            continue;
        }

        if c.is_whitespace() {
            if !last_was_space {
                text.push(' ');
                last_was_space = true;
            }
        } else {
            text.push(c);
            last_was_space = false;
        }
    }

    text.trim().to_string()
}

/// Cut at a character boundary; `len` alone could split a multi-byte char.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_drops_tags_and_scripts() {
        let html = "<html><head><script>var x = 1;</script></head>\
                    <body><h1>Title</h1><p>Hello <b>world</b>.</p></body></html>";
        let text = strip_markup(html);
        assert!(text.contains("Title"));
        assert!(text.contains("Hello world ."));
        assert!(!text.contains("var x"));
    }

    #[test]
    fn test_strip_markup_collapses_whitespace() {
        assert_eq!(strip_markup("<p>a\n\n   b</p>"), "a b");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("çiğli", 3), "çiğ");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
