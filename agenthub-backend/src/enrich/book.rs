use super::{Enrichment, EnrichError, get_json};
use reqwest::Client;
use serde_json::Value;

const MAX_RESULTS: usize = 3;

/// Book search via Google Books. The volumes endpoint is keyless.
pub async fn search(http: &Client, query: &str) -> Result<Enrichment, EnrichError> {
    let url = format!(
        "https://www.googleapis.com/books/v1/volumes?q={}&maxResults={}",
        urlencoding::encode(query.trim()),
        MAX_RESULTS
    );

    let data: Value = get_json(http, &url).await?;
    let entries = parse_volumes(&data);

    if entries.is_empty() {
        return Err(EnrichError::NotFound);
    }

    Ok(Enrichment::new(format_volumes(query, &entries)))
}

fn parse_volumes(data: &Value) -> Vec<String> {
    data["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let info = &item["volumeInfo"];
                    let title = info["title"].as_str()?;

                    let authors = info["authors"]
                        .as_array()
                        .map(|authors| {
                            authors
                                .iter()
                                .filter_map(|a| a.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        })
                        .unwrap_or_default();

                    let year = info["publishedDate"]
                        .as_str()
                        .and_then(|d| d.get(..4))
                        .unwrap_or("");

                    Some(match (authors.is_empty(), year.is_empty()) {
                        (false, false) => format!("{} by {} ({})", title, authors, year),
                        (false, true) => format!("{} by {}", title, authors),
                        (true, false) => format!("{} ({})", title, year),
                        (true, true) => title.to_string(),
                    })
                })
                .take(MAX_RESULTS)
                .collect()
        })
        .unwrap_or_default()
}

fn format_volumes(query: &str, entries: &[String]) -> String {
    let mut reply = format!("Books matching '{}':", query);
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
    fn test_parse_volumes() {
        let data = json!({
            "totalItems": 1,
            "items": [{
                "volumeInfo": {
                    "title": "My Name Is Red",
                    "authors": ["Orhan Pamuk"],
                    "publishedDate": "1998-11-01"
                }
            }]
        });

        let entries = parse_volumes(&data);
        assert_eq!(entries, vec!["My Name Is Red by Orhan Pamuk (1998)"]);
    }

    #[test]
    fn test_parse_volume_without_authors() {
        let data = json!({"items": [{"volumeInfo": {"title": "Anonymous Work"}}]});
        assert_eq!(parse_volumes(&data), vec!["Anonymous Work"]);
    }

    #[test]
    fn test_empty_result_set() {
        assert!(parse_volumes(&json!({"totalItems": 0})).is_empty());
    }
}
