//! Single-agent dispatch: persona prompt -> completion -> directive ->
//! enrichment. The coordinate mode reuses this unit per plan step; it adds
//! no dispatch logic of its own.

use crate::agents::{AgentKind, AgentRegistry};
use crate::ai::{GatewayError, ModelGateway};
use crate::directive;
use crate::enrich::{EnrichError, Enrichers};
use std::sync::Arc;

pub struct AgentDispatcher {
    registry: Arc<AgentRegistry>,
    gateway: Arc<ModelGateway>,
    enrichers: Enrichers,
}

impl AgentDispatcher {
    pub fn new(
        registry: Arc<AgentRegistry>,
        gateway: Arc<ModelGateway>,
        enrichers: Enrichers,
    ) -> Self {
        Self {
            registry,
            gateway,
            enrichers,
        }
    }

    /// Run one message through one agent. The only hard failure is gateway
    /// exhaustion; an unknown agent id gets the fallback persona and an
    /// enrichment failure becomes user-readable fallback text.
    pub async fn dispatch(
        &self,
        agent_id: &str,
        user_message: &str,
    ) -> Result<String, GatewayError> {
        let descriptor = self.registry.resolve(agent_id);

        let completion = self
            .gateway
            .complete(descriptor.persona_prompt, user_message)
            .await?;

        let Some(parsed) = directive::parse(descriptor.kind, &completion) else {
            // The model answered directly without invoking its tool.
            return Ok(completion);
        };

        log::info!(
            "[dispatch] agent '{}' produced a {} directive",
            descriptor.id,
            parsed.kind
        );

        match self.enrichers.enrich(&parsed).await {
            Ok(enrichment) => Ok(enrichment.reply),
            Err(error) => {
                log::warn!(
                    "[dispatch] enrichment failed for agent '{}': {}",
                    descriptor.id,
                    error
                );
                Ok(fallback_reply(descriptor.kind, &error))
            }
        }
    }
}

/// Fixed user-facing text per enrichment failure class.
pub fn fallback_reply(kind: AgentKind, error: &EnrichError) -> String {
    match error {
        EnrichError::MissingCredential => format!(
            "The {} service is not configured on this server, so I could not fetch live data.",
            kind.service_label()
        ),
        EnrichError::NotFound => {
            "I could not find anything matching that. Please check the spelling and try again."
                .to_string()
        }
        EnrichError::RateLimited => {
            "The data service is receiving too many requests right now. Please try again in a moment."
                .to_string()
        }
        EnrichError::Upstream(_) => {
            "The data service is temporarily unavailable. Please try again later.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ModelClient, ModelError};
    use crate::config::Config;
    use async_trait::async_trait;
    use std::path::Path;

    /// Replies with a fixed completion regardless of the prompt.
    struct CannedClient {
        completion: String,
    }

    #[async_trait]
    impl ModelClient for CannedClient {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, ModelError> {
            Ok(self.completion.clone())
        }

        fn label(&self) -> &str {
            "canned"
        }
    }

    fn dispatcher_with_completion(completion: &str) -> AgentDispatcher {
        let registry = Arc::new(AgentRegistry::load(Path::new("../config")));
        let gateway = Arc::new(ModelGateway::new(
            Box::new(CannedClient {
                completion: completion.to_string(),
            }),
            None,
        ));
        let enrichers = Enrichers::new(Config::empty(), gateway.clone());
        AgentDispatcher::new(registry, gateway, enrichers)
    }

    #[tokio::test]
    async fn test_plain_completion_passes_through() {
        let dispatcher = dispatcher_with_completion("The area is 25 square meters.");
        let reply = dispatcher.dispatch("calculator", "5x5 square area?").await.unwrap();
        assert_eq!(reply, "The area is 25 square meters.");
    }

    #[tokio::test]
    async fn test_unknown_agent_id_uses_fallback_persona() {
        let dispatcher = dispatcher_with_completion("I can help with that.");
        let reply = dispatcher.dispatch("agent-42", "hello").await.unwrap();
        assert_eq!(reply, "I can help with that.");
    }

    #[tokio::test]
    async fn test_qr_directive_is_enriched_offline() {
        let dispatcher = dispatcher_with_completion("[QR:https://example.com]");
        let reply = dispatcher.dispatch("qr", "qr for example.com").await.unwrap();
        assert!(reply.contains("api.qrserver.com"));
        assert!(reply.contains("data=https%3A%2F%2Fexample.com"));
    }

    #[tokio::test]
    async fn test_translator_directive_formats_locally() {
        let dispatcher = dispatcher_with_completion("[TRANSLATE:hello|tr|en]");
        let reply = dispatcher.dispatch("translator", "merhaba ingilizce").await.unwrap();
        assert_eq!(reply, "hello\n\n(TR → EN)");
    }

    #[tokio::test]
    async fn test_missing_credential_becomes_fallback_text() {
        // Config::empty() has no weather key, so the directive is parsed
        // but enrichment fails before any network call.
        let dispatcher = dispatcher_with_completion("[WEATHER:İstanbul]");
        let reply = dispatcher.dispatch("weather", "istanbul hava").await.unwrap();
        assert!(reply.contains("weather service is not configured"));
    }

    #[tokio::test]
    async fn test_malformed_tag_falls_back_to_raw_completion() {
        let dispatcher = dispatcher_with_completion("[NEWS:economy|tr]");
        let reply = dispatcher.dispatch("news", "ekonomi haberleri").await.unwrap();
        assert_eq!(reply, "[NEWS:economy|tr]");
    }

    #[test]
    fn test_fallback_reply_names_the_service() {
        let text = fallback_reply(AgentKind::Exchange, &EnrichError::MissingCredential);
        assert!(text.contains("exchange rate service"));
    }
}
