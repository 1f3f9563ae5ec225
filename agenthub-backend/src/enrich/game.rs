use super::{Enrichment, EnrichError, get_json, require_key};
use reqwest::Client;
use serde_json::Value;

const MAX_RESULTS: usize = 3;

/// Video game search via RAWG. Ratings keep a single decimal.
pub async fn search(
    http: &Client,
    api_key: Option<&str>,
    query: &str,
) -> Result<Enrichment, EnrichError> {
    let key = require_key(api_key, "RAWG_API_KEY")?;

    let url = format!(
        "https://api.rawg.io/api/games?key={}&search={}&page_size={}",
        key,
        urlencoding::encode(query.trim()),
        MAX_RESULTS
    );

    let data: Value = get_json(http, &url).await?;
    let entries = parse_games(&data);

    if entries.is_empty() {
        return Err(EnrichError::NotFound);
    }

    Ok(Enrichment::new(format_games(query, &entries)))
}

fn parse_games(data: &Value) -> Vec<String> {
    data["results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .filter_map(|game| {
                    let name = game["name"].as_str()?;
                    let released = game["released"].as_str().unwrap_or("");
                    let rating = game["rating"].as_f64();

                    let mut entry = name.to_string();
                    if !released.is_empty() {
                        entry.push_str(&format!(" ({})", released));
                    }
                    if let Some(rating) = rating.filter(|r| *r > 0.0) {
                        entry.push_str(&format!(" - rated {:.1}/5", rating));
                    }
                    Some(entry)
                })
                .take(MAX_RESULTS)
                .collect()
        })
        .unwrap_or_default()
}

fn format_games(query: &str, entries: &[String]) -> String {
    let mut reply = format!("Games matching '{}':", query);
    for (index, entry) in entries.iter().enumerate() {
        reply.push_str(&format!("\n{}. {}", index + 1, entry));
    }
    reply
}
