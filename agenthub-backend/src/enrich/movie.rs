//! Film lookup via OMDb: search first, then fetch per-title detail for the
//! top hits. The detail pass is capped so one directive never fans out into
//! an unbounded call chain.

use super::{Enrichment, EnrichError, get_json, require_key};
use reqwest::Client;
use serde_json::Value;

const MAX_DETAILS: usize = 3;

pub async fn search(
    http: &Client,
    api_key: Option<&str>,
    title: &str,
) -> Result<Enrichment, EnrichError> {
    let key = require_key(api_key, "OMDB_API_KEY")?;

    let search_url = format!(
        "https://www.omdbapi.com/?apikey={}&s={}",
        key,
        urlencoding::encode(title.trim())
    );

    let data: Value = get_json(http, &search_url).await?;

    // OMDb reports every failure with a 200 status and an Error string.
    if data["Response"].as_str() != Some("True") {
        return Err(classify_omdb_error(data["Error"].as_str().unwrap_or("")));
    }

    let ids: Vec<String> = data["Search"]
        .as_array()
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| hit["imdbID"].as_str().map(|id| id.to_string()))
                .take(MAX_DETAILS)
                .collect()
        })
        .unwrap_or_default();

    if ids.is_empty() {
        return Err(EnrichError::NotFound);
    }

    let mut entries = Vec::with_capacity(ids.len());
    for id in &ids {
        let detail_url = format!("https://www.omdbapi.com/?apikey={}&i={}", key, id);
        let detail: Value = get_json(http, &detail_url).await?;
        if let Some(entry) = format_detail(&detail) {
            entries.push(entry);
        }
    }

    if entries.is_empty() {
        return Err(EnrichError::NotFound);
    }

    Ok(Enrichment::new(format_entries(title, &entries)))
}

fn classify_omdb_error(message: &str) -> EnrichError {
    let lower = message.to_lowercase();
    if lower.contains("not found") {
        EnrichError::NotFound
    } else if lower.contains("invalid api key") {
        EnrichError::MissingCredential
    } else if lower.contains("request limit") {
        EnrichError::RateLimited
    } else {
        EnrichError::Upstream(format!("omdb error: {}", message))
    }
}

/// One formatted line per film; ratings keep a single decimal. OMDb sends
/// "N/A" for unrated titles, which simply omits the rating.
fn format_detail(detail: &Value) -> Option<String> {
    let title = detail["Title"].as_str()?;
    let year = detail["Year"].as_str().unwrap_or("");
    let genre = detail["Genre"].as_str().unwrap_or("");
    let rating = detail["imdbRating"]
        .as_str()
        .and_then(|r| r.parse::<f64>().ok());

    let mut entry = title.to_string();
    if !year.is_empty() {
        entry.push_str(&format!(" ({})", year));
    }
    if !genre.is_empty() {
        entry.push_str(&format!(" - {}", genre));
    }
    if let Some(rating) = rating {
        entry.push_str(&format!(" - IMDb {:.1}", rating));
    }
    Some(entry)
}

fn format_entries(query: &str, entries: &[String]) -> String {
    let mut reply = format!("Films matching '{}':", query);
    for (index, entry) in entries.iter().enumerate() {
        reply.push_str(&format!("\n{}. {}", index + 1, entry));
    }
    reply
}
