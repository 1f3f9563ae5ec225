//! Music and podcast search share the iTunes Search API; the only
//! difference is the media parameter and which name fields matter.

use super::{Enrichment, EnrichError, get_json};
use reqwest::Client;
use serde_json::Value;

const MAX_RESULTS: usize = 3;

pub async fn search_music(http: &Client, query: &str) -> Result<Enrichment, EnrichError> {
    let data = fetch(http, query, "music").await?;
    let entries = parse_entries(&data, "trackName");

    if entries.is_empty() {
        return Err(EnrichError::NotFound);
    }

    Ok(Enrichment::new(format_entries("Songs", query, &entries)))
}

pub async fn search_podcasts(http: &Client, query: &str) -> Result<Enrichment, EnrichError> {
    let data = fetch(http, query, "podcast").await?;
    let entries = parse_entries(&data, "collectionName");

    if entries.is_empty() {
        return Err(EnrichError::NotFound);
    }

    Ok(Enrichment::new(format_entries("Podcasts", query, &entries)))
}

async fn fetch(http: &Client, query: &str, media: &str) -> Result<Value, EnrichError> {
    let url = format!(
        "https://itunes.apple.com/search?term={}&media={}&limit={}",
        urlencoding::encode(query.trim()),
        media,
        MAX_RESULTS
    );
    get_json(http, &url).await
}

fn parse_entries(data: &Value, name_field: &str) -> Vec<String> {
    data["results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .filter_map(|result| {
                    let name = result[name_field].as_str()?;
                    let artist = result["artistName"].as_str().unwrap_or("");
                    Some(if artist.is_empty() {
                        name.to_string()
                    } else {
                        format!("{} - {}", name, artist)
                    })
                })
                .take(MAX_RESULTS)
                .collect()
        })
        .unwrap_or_default()
}

fn format_entries(label: &str, query: &str, entries: &[String]) -> String {
    let mut reply = format!("{} matching '{}':", label, query);
    for (index, entry) in entries.iter().enumerate() {
        reply.push_str(&format!("\n{}. {}", index + 1, entry));
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_music_entries() {
        let data = json!({
            "resultCount": 1,
            "results": [{"trackName": "Bohemian Rhapsody", "artistName": "Queen"}]
        });
        assert_eq!(
            parse_entries(&data, "trackName"),
            vec!["Bohemian Rhapsody - Queen"]
        );
    }

    #[test]
    fn test_parse_podcast_entries_use_collection_name() {
        let data = json!({
            "results": [{"collectionName": "History Hour", "artistName": "Some Network"}]
        });
        assert_eq!(
            parse_entries(&data, "collectionName"),
            vec!["History Hour - Some Network"]
        );
    }

    #[test]
    fn test_empty_results() {
        assert!(parse_entries(&json!({"resultCount": 0, "results": []}), "trackName").is_empty());
    }
}
