//! Enrichment routines: one per agent kind that can act on a directive.
//!
//! Every routine has the same contract: consume the directive fields, call
//! its external data source, and produce a user-facing reply string or one
//! of four failure classes. Failures never propagate past the dispatcher;
//! it converts them to fallback text.

pub mod book;
pub mod crypto;
pub mod dictionary;
pub mod exchange;
pub mod game;
pub mod ip_location;
pub mod itunes;
pub mod movie;
pub mod news;
pub mod qr;
pub mod recipe;
pub mod sports;
pub mod translator;
pub mod trivia;
pub mod video;
pub mod weather;
pub mod web_summary;
pub mod wikipedia;

use crate::agents::AgentKind;
use crate::ai::ModelGateway;
use crate::config::Config;
use crate::directive::Directive;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Token separating a short summary from longer detail inside a reply.
/// The UI and persistence layers treat it opaquely.
pub const DETAIL_SEPARATOR: &str = "\n\n===DETAIL===\n\n";

/// A successful enrichment: the text that replaces the model completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub reply: String,
}

impl Enrichment {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }

    pub fn with_detail(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            reply: format!("{}{}{}", summary.into(), DETAIL_SEPARATOR, detail.into()),
        }
    }
}

/// Failure classes shared by every enrichment routine. None of these are
/// retried; the dispatcher maps each class to a fixed fallback string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichError {
    /// A required external API key is absent or rejected.
    MissingCredential,
    /// The upstream has no data for this query.
    NotFound,
    /// The upstream asked us to back off.
    RateLimited,
    /// Network failure, 5xx, or an unexpected response shape.
    Upstream(String),
}

impl std::fmt::Display for EnrichError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrichError::MissingCredential => write!(f, "missing credential"),
            EnrichError::NotFound => write!(f, "not found"),
            EnrichError::RateLimited => write!(f, "rate limited"),
            EnrichError::Upstream(msg) => write!(f, "upstream unavailable: {}", msg),
        }
    }
}

/// Routes a parsed directive to the matching enrichment routine.
pub struct Enrichers {
    http: Client,
    config: Config,
    gateway: Arc<ModelGateway>,
}

impl Enrichers {
    pub fn new(config: Config, gateway: Arc<ModelGateway>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("AgentHub/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            config,
            gateway,
        }
    }

    /// The single exhaustive kind -> handler match. A new `AgentKind`
    /// variant fails compilation here until it gets a routine (or joins the
    /// free-text arm at the bottom).
    pub async fn enrich(&self, directive: &Directive) -> Result<Enrichment, EnrichError> {
        let fields = &directive.fields;

        match directive.kind {
            AgentKind::Weather => {
                weather::current(
                    &self.http,
                    self.config.openweather_api_key.as_deref(),
                    field(fields, 0),
                )
                .await
            }
            AgentKind::Translator => translator::format_translation(fields),
            AgentKind::News => {
                news::headlines(
                    &self.http,
                    self.config.newsapi_key.as_deref(),
                    self.config.gnews_api_key.as_deref(),
                    field(fields, 0),
                    field(fields, 1),
                    field(fields, 2),
                )
                .await
            }
            AgentKind::Wikipedia => {
                wikipedia::summary(&self.http, field(fields, 0), field(fields, 1)).await
            }
            AgentKind::Exchange => {
                exchange::convert(
                    &self.http,
                    self.config.exchange_api_key.as_deref(),
                    field(fields, 0),
                    field(fields, 1),
                )
                .await
            }
            AgentKind::Dictionary => dictionary::define(&self.http, field(fields, 0)).await,
            AgentKind::IpLocation => ip_location::lookup(&self.http, field(fields, 0)).await,
            AgentKind::Crypto => {
                crypto::price(&self.http, field(fields, 0), field(fields, 1)).await
            }
            AgentKind::Sports => sports::next_fixtures(&self.http, field(fields, 0)).await,
            AgentKind::Qr => qr::render_link(field(fields, 0)),
            AgentKind::WebSummary => {
                web_summary::summarize(&self.http, &self.gateway, field(fields, 0)).await
            }
            AgentKind::Trivia => trivia::questions(&self.http, field(fields, 0)).await,
            AgentKind::Video => {
                video::search(
                    &self.http,
                    self.config.youtube_api_key.as_deref(),
                    field(fields, 0),
                )
                .await
            }
            AgentKind::Book => book::search(&self.http, field(fields, 0)).await,
            AgentKind::Movie => {
                movie::search(
                    &self.http,
                    self.config.omdb_api_key.as_deref(),
                    field(fields, 0),
                )
                .await
            }
            AgentKind::Music => itunes::search_music(&self.http, field(fields, 0)).await,
            AgentKind::Podcast => itunes::search_podcasts(&self.http, field(fields, 0)).await,
            AgentKind::Game => {
                game::search(
                    &self.http,
                    self.config.rawg_api_key.as_deref(),
                    field(fields, 0),
                )
                .await
            }
            AgentKind::Recipe => recipe::suggest(&self.http, field(fields, 0)).await,
            AgentKind::Calculator | AgentKind::Assistant => {
                // Free-text kinds have no tag grammar; the parser never
                // produces a directive for them.
                log::error!("[enrich] kind {} has no enrichment routine", directive.kind);
                Err(EnrichError::Upstream(format!(
                    "no enrichment routine for kind {}",
                    directive.kind
                )))
            }
        }
    }
}

fn field(fields: &[String], index: usize) -> &str {
    fields.get(index).map(String::as_str).unwrap_or("")
}

/// Fail fast before any outbound call when a required key is absent.
pub(crate) fn require_key<'a>(key: Option<&'a str>, name: &str) -> Result<&'a str, EnrichError> {
    match key {
        Some(value) => Ok(value),
        None => {
            log::warn!("[enrich] {} is not configured", name);
            Err(EnrichError::MissingCredential)
        }
    }
}

/// GET a JSON document, mapping upstream failure classes onto the uniform
/// enrichment taxonomy: 401/403 credential, 404 not found, 429 rate limit,
/// everything else unavailable.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
) -> Result<T, EnrichError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| EnrichError::Upstream(format!("request failed: {}", e)))?;

    let status = response.status().as_u16();
    match status {
        200..=299 => response
            .json::<T>()
            .await
            .map_err(|e| EnrichError::Upstream(format!("invalid JSON from upstream: {}", e))),
        401 | 403 => Err(EnrichError::MissingCredential),
        404 => Err(EnrichError::NotFound),
        429 => Err(EnrichError::RateLimited),
        _ => Err(EnrichError::Upstream(format!(
            "upstream returned status {}",
            status
        ))),
    }
}
