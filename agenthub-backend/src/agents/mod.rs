//! Static agent catalog: behavior kinds, persona prompts and the id registry.
//!
//! The catalog is loaded from config/agents.ron once at startup and never
//! mutated; persona prompt text is embedded at compile time. The registry is
//! injected through the actix app state rather than held in a global.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use strum::{Display, EnumIter, EnumString};

/// Closed set of agent behavior kinds. Each kind owns at most one directive
/// tag grammar and at most one enrichment routine; adding a variant makes
/// the compiler flag every dispatch site that must learn about it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgentKind {
    Weather,
    Calculator,
    Translator,
    News,
    Wikipedia,
    Exchange,
    Dictionary,
    IpLocation,
    Crypto,
    Sports,
    Qr,
    WebSummary,
    Trivia,
    Video,
    Book,
    Movie,
    Music,
    Podcast,
    Game,
    Recipe,
    Assistant,
}

impl AgentKind {
    pub fn persona_prompt(&self) -> &'static str {
        match self {
            AgentKind::Weather => include_str!("prompts/weather.md"),
            AgentKind::Calculator => include_str!("prompts/calculator.md"),
            AgentKind::Translator => include_str!("prompts/translator.md"),
            AgentKind::News => include_str!("prompts/news.md"),
            AgentKind::Wikipedia => include_str!("prompts/wikipedia.md"),
            AgentKind::Exchange => include_str!("prompts/exchange.md"),
            AgentKind::Dictionary => include_str!("prompts/dictionary.md"),
            AgentKind::IpLocation => include_str!("prompts/ip_location.md"),
            AgentKind::Crypto => include_str!("prompts/crypto.md"),
            AgentKind::Sports => include_str!("prompts/sports.md"),
            AgentKind::Qr => include_str!("prompts/qr.md"),
            AgentKind::WebSummary => include_str!("prompts/web_summary.md"),
            AgentKind::Trivia => include_str!("prompts/trivia.md"),
            AgentKind::Video => include_str!("prompts/video.md"),
            AgentKind::Book => include_str!("prompts/book.md"),
            AgentKind::Movie => include_str!("prompts/movie.md"),
            AgentKind::Music => include_str!("prompts/music.md"),
            AgentKind::Podcast => include_str!("prompts/podcast.md"),
            AgentKind::Game => include_str!("prompts/game.md"),
            AgentKind::Recipe => include_str!("prompts/recipe.md"),
            AgentKind::Assistant => include_str!("prompts/assistant.md"),
        }
    }

    /// Human-readable service name for user-facing fallback messages.
    pub fn service_label(&self) -> &'static str {
        match self {
            AgentKind::Weather => "weather",
            AgentKind::Calculator => "calculator",
            AgentKind::Translator => "translation",
            AgentKind::News => "news",
            AgentKind::Wikipedia => "encyclopedia",
            AgentKind::Exchange => "exchange rate",
            AgentKind::Dictionary => "dictionary",
            AgentKind::IpLocation => "location",
            AgentKind::Crypto => "crypto price",
            AgentKind::Sports => "sports",
            AgentKind::Qr => "QR code",
            AgentKind::WebSummary => "web summary",
            AgentKind::Trivia => "trivia",
            AgentKind::Video => "video search",
            AgentKind::Book => "book search",
            AgentKind::Movie => "film",
            AgentKind::Music => "music search",
            AgentKind::Podcast => "podcast search",
            AgentKind::Game => "game search",
            AgentKind::Recipe => "recipe",
            AgentKind::Assistant => "assistant",
        }
    }
}

/// One row of config/agents.ron.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub kind: AgentKind,
    pub capability: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// A fully resolved agent: catalog row plus its embedded persona prompt.
#[derive(Debug, Clone)]
pub struct AgentDescriptor {
    pub id: String,
    pub name: String,
    pub kind: AgentKind,
    pub capability: String,
    pub persona_prompt: &'static str,
}

/// Immutable id -> agent table, built once at startup.
pub struct AgentRegistry {
    agents: Vec<AgentDescriptor>,
    by_id: HashMap<String, usize>,
    by_kind: HashMap<AgentKind, usize>,
    fallback: usize,
}

impl AgentRegistry {
    /// Load the catalog from `config_dir/agents.ron`. Panics on a missing or
    /// invalid file; a broken catalog is a deployment error, not a runtime
    /// condition.
    pub fn load(config_dir: &Path) -> Self {
        let path = config_dir.join("agents.ron");

        if !path.exists() {
            panic!("[agents] Catalog not found: {:?}", path);
        }

        let content = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("[agents] Failed to read {:?}: {}", path, e));

        let entries: Vec<CatalogEntry> = ron::from_str(&content)
            .unwrap_or_else(|e| panic!("[agents] Failed to parse {:?}: {}", path, e));

        let registry = Self::from_entries(entries);
        log::info!("[agents] Loaded {} agents from {:?}", registry.agents.len(), path);
        registry
    }

    fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut agents = Vec::with_capacity(entries.len());
        let mut by_id = HashMap::new();
        let mut by_kind = HashMap::new();

        for entry in entries {
            let index = agents.len();
            by_id.insert(entry.id.clone(), index);
            for alias in &entry.aliases {
                by_id.insert(alias.clone(), index);
            }
            // First catalog entry per kind is the canonical one for plan steps.
            by_kind.entry(entry.kind).or_insert(index);

            agents.push(AgentDescriptor {
                persona_prompt: entry.kind.persona_prompt(),
                id: entry.id,
                name: entry.name,
                kind: entry.kind,
                capability: entry.capability,
            });
        }

        let fallback = *by_kind
            .get(&AgentKind::Assistant)
            .unwrap_or_else(|| panic!("[agents] Catalog must include an assistant entry"));

        Self {
            agents,
            by_id,
            by_kind,
            fallback,
        }
    }

    /// Resolve an agent id or legacy alias. An unknown id is not an error:
    /// the caller gets the generic assistant persona.
    pub fn resolve(&self, agent_id: &str) -> &AgentDescriptor {
        match self.by_id.get(agent_id) {
            Some(&index) => &self.agents[index],
            None => {
                log::debug!(
                    "[agents] unknown agent id '{}', using the fallback persona",
                    agent_id
                );
                &self.agents[self.fallback]
            }
        }
    }

    /// Canonical agent id for a behavior kind (used by the plan executor).
    pub fn agent_id_for(&self, kind: AgentKind) -> Option<&str> {
        self.by_kind.get(&kind).map(|&index| self.agents[index].id.as_str())
    }

    pub fn all(&self) -> &[AgentDescriptor] {
        &self.agents
    }
}
