use std::env;

/// Process-wide configuration, read once at startup.
///
/// The model credential is required; every enricher key is optional and
/// checked at enrichment time so a missing key degrades only that one agent.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub gemini_api_key: String,
    pub gemini_api_key_secondary: Option<String>,
    pub gemini_model: String,
    pub openweather_api_key: Option<String>,
    pub newsapi_key: Option<String>,
    pub gnews_api_key: Option<String>,
    pub exchange_api_key: Option<String>,
    pub youtube_api_key: Option<String>,
    pub omdb_api_key: Option<String>,
    pub rawg_api_key: Option<String>,
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            gemini_api_key: env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set"),
            gemini_api_key_secondary: optional("GEMINI_API_KEY_SECONDARY"),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            openweather_api_key: optional("OPENWEATHER_API_KEY"),
            newsapi_key: optional("NEWSAPI_KEY"),
            gnews_api_key: optional("GNEWS_API_KEY"),
            exchange_api_key: optional("EXCHANGE_API_KEY"),
            youtube_api_key: optional("YOUTUBE_API_KEY"),
            omdb_api_key: optional("OMDB_API_KEY"),
            rawg_api_key: optional("RAWG_API_KEY"),
        }
    }
}

#[cfg(test)]
impl Config {
    /// A config with no credentials, for tests that never reach an upstream.
    pub fn empty() -> Self {
        Self {
            port: 0,
            gemini_api_key: String::new(),
            gemini_api_key_secondary: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            openweather_api_key: None,
            newsapi_key: None,
            gnews_api_key: None,
            exchange_api_key: None,
            youtube_api_key: None,
            omdb_api_key: None,
            rawg_api_key: None,
        }
    }
}
