use super::{Enrichment, EnrichError, get_json, require_key};
use reqwest::Client;
use serde_json::Value;

const MAX_RESULTS: usize = 3;

/// Video search via the YouTube Data API.
pub async fn search(
    http: &Client,
    api_key: Option<&str>,
    query: &str,
) -> Result<Enrichment, EnrichError> {
    let key = require_key(api_key, "YOUTUBE_API_KEY")?;

    let url = format!(
        "https://www.googleapis.com/youtube/v3/search?part=snippet&type=video&maxResults={}&q={}&key={}",
        MAX_RESULTS,
        urlencoding::encode(query.trim()),
        key
    );

    let data: Value = get_json(http, &url).await?;
    let hits = parse_hits(&data);

    if hits.is_empty() {
        return Err(EnrichError::NotFound);
    }

    Ok(Enrichment::new(format_hits(query, &hits)))
}

struct VideoHit {
    title: String,
    channel: String,
    video_id: String,
}

fn parse_hits(data: &Value) -> Vec<VideoHit> {
    data["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    Some(VideoHit {
                        title: item["snippet"]["title"].as_str()?.to_string(),
                        channel: item["snippet"]["channelTitle"].as_str().unwrap_or("").to_string(),
                        video_id: item["id"]["videoId"].as_str()?.to_string(),
                    })
                })
                .take(MAX_RESULTS)
                .collect()
        })
        .unwrap_or_default()
}

fn format_hits(query: &str, hits: &[VideoHit]) -> String {
    let mut reply = format!("Videos for '{}':", query);
    for (index, hit) in hits.iter().enumerate() {
        reply.push_str(&format!(
            "\n{}. {} ({})\n   https://www.youtube.com/watch?v={}",
            index + 1,
            hit.title,
            hit.channel,
            hit.video_id
        ));
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_and_format_hits() {
        let data = json!({
            "items": [{
                "id": {"videoId": "abc123"},
                "snippet": {"title": "Sourdough basics", "channelTitle": "Bread Channel"}
            }]
        });

        let hits = parse_hits(&data);
        assert_eq!(hits.len(), 1);

        let reply = format_hits("sourdough", &hits);
        assert!(reply.starts_with("Videos for 'sourdough':"));
        assert!(reply.contains("1. Sourdough basics (Bread Channel)"));
        assert!(reply.contains("https://www.youtube.com/watch?v=abc123"));
    }

    #[test]
    fn test_non_video_items_are_skipped() {
        // Channel results carry no videoId and must not produce a hit.
        let data = json!({
            "items": [{"id": {"channelId": "ch1"}, "snippet": {"title": "A channel", "channelTitle": "x"}}]
        });
        assert!(parse_hits(&data).is_empty());
    }
}
