//! Headline search with a two-tier provider fallback.
//!
//! NewsAPI is the primary source. When it yields no articles (or its key is
//! absent), GNews is tried before giving up. This fallback lives inside one
//! enrichment and is unrelated to the model gateway's credential failover.

use super::{Enrichment, EnrichError, get_json};
use reqwest::Client;
use serde_json::Value;

const MAX_HEADLINES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Article {
    title: String,
    source: String,
}

pub async fn headlines(
    http: &Client,
    newsapi_key: Option<&str>,
    gnews_key: Option<&str>,
    topic: &str,
    language: &str,
    country: &str,
) -> Result<Enrichment, EnrichError> {
    if newsapi_key.is_none() && gnews_key.is_none() {
        log::warn!("[enrich] neither NEWSAPI_KEY nor GNEWS_API_KEY is configured");
        return Err(EnrichError::MissingCredential);
    }

    let mut articles = Vec::new();

    if let Some(key) = newsapi_key {
        articles = fetch_newsapi(http, key, topic, language, country).await?;
    }

    if articles.is_empty() {
        if let Some(key) = gnews_key {
            log::info!("[enrich] primary news source empty for '{}', trying secondary", topic);
            articles = fetch_gnews(http, key, topic, language, country).await?;
        }
    }

    if articles.is_empty() {
        return Err(EnrichError::NotFound);
    }

    Ok(Enrichment::new(format_headlines(topic, &articles)))
}

async fn fetch_newsapi(
    http: &Client,
    key: &str,
    topic: &str,
    language: &str,
    country: &str,
) -> Result<Vec<Article>, EnrichError> {
    let url = if country == "global" {
        format!(
            "https://newsapi.org/v2/everything?q={}&language={}&pageSize={}&apiKey={}",
            urlencoding::encode(topic),
            language,
            MAX_HEADLINES,
            key
        )
    } else {
        format!(
            "https://newsapi.org/v2/top-headlines?q={}&country={}&pageSize={}&apiKey={}",
            urlencoding::encode(topic),
            country,
            MAX_HEADLINES,
            key
        )
    };

    let data: Value = get_json(http, &url).await?;
    Ok(parse_newsapi_articles(&data))
}

async fn fetch_gnews(
    http: &Client,
    key: &str,
    topic: &str,
    language: &str,
    country: &str,
) -> Result<Vec<Article>, EnrichError> {
    let mut url = format!(
        "https://gnews.io/api/v4/search?q={}&lang={}&max={}&apikey={}",
        urlencoding::encode(topic),
        language,
        MAX_HEADLINES,
        key
    );
    if country != "global" {
        url.push_str(&format!("&country={}", country));
    }

    let data: Value = get_json(http, &url).await?;
    Ok(parse_gnews_articles(&data))
}

fn parse_newsapi_articles(data: &Value) -> Vec<Article> {
    data["articles"]
        .as_array()
        .map(|articles| {
            articles
                .iter()
                .filter_map(|article| {
                    let title = article["title"].as_str()?;
                    let source = article["source"]["name"].as_str().unwrap_or("unknown");
                    Some(Article {
                        title: title.to_string(),
                        source: source.to_string(),
                    })
                })
                .take(MAX_HEADLINES)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_gnews_articles(data: &Value) -> Vec<Article> {
    data["articles"]
        .as_array()
        .map(|articles| {
            articles
                .iter()
                .filter_map(|article| {
                    let title = article["title"].as_str()?;
                    let source = article["source"]["name"].as_str().unwrap_or("unknown");
                    Some(Article {
                        title: title.to_string(),
                        source: source.to_string(),
                    })
                })
                .take(MAX_HEADLINES)
                .collect()
        })
        .unwrap_or_default()
}

fn format_headlines(topic: &str, articles: &[Article]) -> String {
    let mut reply = format!("Top headlines for '{}':", topic);
    for (index, article) in articles.iter().enumerate() {
        reply.push_str(&format!(
            "\n{}. {} ({})",
            index + 1,
            article.title,
            article.source
        ));
    }
    reply
}
