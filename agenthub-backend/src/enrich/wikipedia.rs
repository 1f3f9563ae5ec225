use super::{Enrichment, EnrichError, get_json};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PageSummary {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    extract: String,
}

/// Article summary from the Wikipedia REST API. No credential needed; an
/// unknown title is a plain 404.
pub async fn summary(http: &Client, title: &str, language: &str) -> Result<Enrichment, EnrichError> {
    let language = sanitize_language(language);

    let url = format!(
        "https://{}.wikipedia.org/api/rest_v1/page/summary/{}",
        language,
        urlencoding::encode(title)
    );

    let page: PageSummary = get_json(http, &url).await?;

    if page.extract.is_empty() {
        return Err(EnrichError::NotFound);
    }

    let heading = if page.description.is_empty() {
        page.title.clone()
    } else {
        format!("{} ({})", page.title, page.description)
    };

    Ok(Enrichment::with_detail(heading, page.extract))
}

/// Language codes become a hostname component; anything that is not a short
/// ASCII code falls back to English.
fn sanitize_language(language: &str) -> &str {
    let valid = (2..=8).contains(&language.len())
        && language.chars().all(|c| c.is_ascii_lowercase() || c == '-');
    if valid { language } else { "en" }
}
