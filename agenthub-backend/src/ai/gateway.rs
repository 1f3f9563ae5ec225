//! Dual-credential wrapper around model calls.
//!
//! Every completion goes to the primary credential first. On any failure,
//! rate-limit or otherwise, the secondary credential is tried exactly once.
//! There is no backoff and no further retry; the caller either gets a
//! completion or a terminal [`GatewayError`].

use crate::ai::{ModelClient, ModelError};

pub struct ModelGateway {
    primary: Box<dyn ModelClient>,
    secondary: Option<Box<dyn ModelClient>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    BothCredentialsExhausted { primary: String, secondary: String },
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::BothCredentialsExhausted { primary, secondary } => write!(
                f,
                "model service unavailable (primary: {}; secondary: {})",
                primary, secondary
            ),
        }
    }
}

impl ModelGateway {
    pub fn new(primary: Box<dyn ModelClient>, secondary: Option<Box<dyn ModelClient>>) -> Self {
        Self { primary, secondary }
    }

    pub async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, GatewayError> {
        let primary_err = match self.primary.complete(system_prompt, user_text).await {
            Ok(text) => return Ok(text),
            Err(e) => e,
        };

        match &primary_err {
            ModelError::RateLimited(msg) => log::warn!(
                "[GATEWAY] primary credential '{}' rate limited: {}",
                self.primary.label(),
                msg
            ),
            ModelError::Upstream(msg) => log::warn!(
                "[GATEWAY] primary credential '{}' failed: {}",
                self.primary.label(),
                msg
            ),
        }

        let Some(secondary) = &self.secondary else {
            return Err(GatewayError::BothCredentialsExhausted {
                primary: primary_err.to_string(),
                secondary: "no secondary credential configured".to_string(),
            });
        };

        match secondary.complete(system_prompt, user_text).await {
            Ok(text) => {
                log::info!(
                    "[GATEWAY] secondary credential '{}' answered after primary failure",
                    secondary.label()
                );
                Ok(text)
            }
            Err(secondary_err) => {
                log::error!(
                    "[GATEWAY] secondary credential '{}' also failed: {}",
                    secondary.label(),
                    secondary_err
                );
                Err(GatewayError::BothCredentialsExhausted {
                    primary: primary_err.to_string(),
                    secondary: secondary_err.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedClient {
        reply: Result<String, ModelError>,
        calls: Arc<AtomicUsize>,
        label: String,
    }

    impl ScriptedClient {
        fn new(reply: Result<String, ModelError>, label: &str) -> (Box<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let client = Box::new(Self {
                reply,
                calls: calls.clone(),
                label: label.to_string(),
            });
            (client, calls)
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }

        fn label(&self) -> &str {
            &self.label
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let (primary, _) = ScriptedClient::new(Ok("hello".to_string()), "primary");
        let (secondary, secondary_calls) = ScriptedClient::new(Ok("unused".to_string()), "secondary");

        let gateway = ModelGateway::new(primary, Some(secondary));
        let reply = gateway.complete("sys", "hi").await.unwrap();

        assert_eq!(reply, "hello");
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rate_limited_primary_falls_back_once() {
        let (primary, primary_calls) = ScriptedClient::new(
            Err(ModelError::RateLimited("quota exceeded".to_string())),
            "primary",
        );
        let (secondary, secondary_calls) = ScriptedClient::new(Ok("backup".to_string()), "secondary");

        let gateway = ModelGateway::new(primary, Some(secondary));
        let reply = gateway.complete("sys", "hi").await.unwrap();

        assert_eq!(reply, "backup");
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_failures_surface_exhausted() {
        let (primary, _) = ScriptedClient::new(
            Err(ModelError::RateLimited("quota".to_string())),
            "primary",
        );
        let (secondary, secondary_calls) = ScriptedClient::new(
            Err(ModelError::Upstream("boom".to_string())),
            "secondary",
        );

        let gateway = ModelGateway::new(primary, Some(secondary));
        let err = gateway.complete("sys", "hi").await.unwrap_err();

        assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
        match err {
            GatewayError::BothCredentialsExhausted { primary, secondary } => {
                assert!(primary.contains("quota"));
                assert!(secondary.contains("boom"));
            }
        }
    }

    #[tokio::test]
    async fn test_missing_secondary_is_exhausted() {
        let (primary, _) = ScriptedClient::new(
            Err(ModelError::Upstream("down".to_string())),
            "primary",
        );

        let gateway = ModelGateway::new(primary, None);
        let err = gateway.complete("sys", "hi").await.unwrap_err();

        match err {
            GatewayError::BothCredentialsExhausted { secondary, .. } => {
                assert!(secondary.contains("no secondary credential"));
            }
        }
    }
}
