//! Sequential plan interpretation.
//!
//! Steps run strictly in order because each may depend on an earlier step's
//! output. Placeholder resolution is a pure lookup against the append-only
//! result log; one step failing never aborts the plan.

use super::{Plan, StepResult};
use crate::agents::{AgentKind, AgentRegistry};
use crate::dispatch::AgentDispatcher;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use uuid::Uuid;

/// Canonical placeholder `{{step:N}}` plus the legacy spellings observed in
/// model output. The planning prompt teaches only the canonical form.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*(?:step:(\d+)|output_of_step_(\d+)|previous_output|previous)\s*\}\}")
        .expect("placeholder pattern must compile")
});

pub struct PlanExecutor {
    dispatcher: Arc<AgentDispatcher>,
    registry: Arc<AgentRegistry>,
}

impl PlanExecutor {
    pub fn new(dispatcher: Arc<AgentDispatcher>, registry: Arc<AgentRegistry>) -> Self {
        Self {
            dispatcher,
            registry,
        }
    }

    /// Run every step in order and return the full result log. A failing
    /// step or an unknown agent kind is recorded and execution continues.
    pub async fn execute(&self, plan: &Plan) -> Vec<StepResult> {
        let run_id = Uuid::new_v4();
        let total = plan.steps.len();
        let mut results: Vec<StepResult> = Vec::with_capacity(total);

        for (index, step) in plan.steps.iter().enumerate() {
            let input = resolve_placeholders(&step.input, &results);

            let Ok(kind) = step.agent.trim().parse::<AgentKind>() else {
                log::warn!(
                    "[executor:{}] step {} names unknown agent kind '{}', skipping",
                    run_id,
                    index + 1,
                    step.agent
                );
                results.push(StepResult::failed(
                    index,
                    &step.agent,
                    format!("unknown agent kind '{}'", step.agent),
                ));
                continue;
            };

            let Some(agent_id) = self.registry.agent_id_for(kind) else {
                log::warn!(
                    "[executor:{}] no agent registered for kind {}, skipping step {}",
                    run_id,
                    kind,
                    index + 1
                );
                results.push(StepResult::failed(
                    index,
                    &step.agent,
                    format!("no agent registered for kind {}", kind),
                ));
                continue;
            };

            let message = build_step_message(&step.task, &input);

            log::info!(
                "[executor:{}] step {}/{} -> agent '{}'",
                run_id,
                index + 1,
                total,
                agent_id
            );

            match self.dispatcher.dispatch(agent_id, &message).await {
                Ok(output) => results.push(StepResult::succeeded(index, &step.agent, output)),
                Err(error) => {
                    log::warn!("[executor:{}] step {} failed: {}", run_id, index + 1, error);
                    results.push(StepResult::failed(index, &step.agent, error.to_string()));
                }
            }
        }

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        log::info!(
            "[executor:{}] plan finished at {}: {}/{} steps succeeded",
            run_id,
            results
                .last()
                .map(|r| r.finished_at.to_rfc3339())
                .unwrap_or_default(),
            succeeded,
            total
        );

        results
    }
}

fn build_step_message(task: &str, input: &str) -> String {
    match (task.is_empty(), input.is_empty()) {
        (true, _) => input.to_string(),
        (_, true) => task.to_string(),
        _ => format!("{}\n\n{}", task, input),
    }
}

/// Replace placeholder tokens with prior step outputs. A reference to a
/// failed, skipped or out-of-range step keeps the literal token so the plan
/// keeps moving.
pub fn resolve_placeholders(input: &str, results: &[StepResult]) -> String {
    PLACEHOLDER
        .replace_all(input, |captures: &regex::Captures| {
            let index = match captures.get(1).or_else(|| captures.get(2)) {
                Some(number) => number
                    .as_str()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1)),
                // The "previous" spellings mean the immediately preceding step.
                None => results.len().checked_sub(1),
            };

            match index.and_then(|i| results.get(i)) {
                Some(prior) if prior.is_success() => prior.output.clone().unwrap_or_default(),
                _ => captures[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ModelClient, ModelError, ModelGateway};
    use crate::config::Config;
    use crate::coordinate::Step;
    use crate::enrich::Enrichers;
    use async_trait::async_trait;
    use std::path::Path;

    fn ok(index: usize, output: &str) -> StepResult {
        StepResult::succeeded(index, "assistant", output.to_string())
    }

    fn failed(index: usize) -> StepResult {
        StepResult::failed(index, "assistant", "boom".to_string())
    }

    #[test]
    fn test_canonical_placeholder_resolves() {
        let results = vec![ok(0, "41.25 TRY")];
        assert_eq!(
            resolve_placeholders("convert using {{step:1}}", &results),
            "convert using 41.25 TRY"
        );
    }

    #[test]
    fn test_legacy_spellings_resolve_to_previous_step() {
        let results = vec![ok(0, "first"), ok(1, "second")];
        assert_eq!(resolve_placeholders("{{previous}}", &results), "second");
        assert_eq!(resolve_placeholders("{{previous_output}}", &results), "second");
        assert_eq!(resolve_placeholders("{{output_of_step_1}}", &results), "first");
    }

    #[test]
    fn test_failed_step_reference_stays_literal() {
        let results = vec![ok(0, "fine"), failed(1)];
        assert_eq!(
            resolve_placeholders("use {{step:2}} here", &results),
            "use {{step:2}} here"
        );
    }

    #[test]
    fn test_out_of_range_reference_stays_literal() {
        let results = vec![ok(0, "fine")];
        assert_eq!(resolve_placeholders("{{step:7}}", &results), "{{step:7}}");
        assert_eq!(resolve_placeholders("{{previous}}", &[]), "{{previous}}");
    }

    #[test]
    fn test_mixed_placeholders_in_one_input() {
        let results = vec![ok(0, "alpha"), failed(1)];
        assert_eq!(
            resolve_placeholders("{{step:1}} + {{step:2}}", &results),
            "alpha + {{step:2}}"
        );
    }

    /// Echoes the user message back, or fails when it contains FAIL.
    struct EchoClient;

    #[async_trait]
    impl ModelClient for EchoClient {
        async fn complete(&self, _system: &str, user: &str) -> Result<String, ModelError> {
            if user.contains("FAIL") {
                Err(ModelError::Upstream("scripted failure".to_string()))
            } else {
                Ok(format!("echo: {}", user))
            }
        }

        fn label(&self) -> &str {
            "echo"
        }
    }

    fn executor() -> PlanExecutor {
        let registry = Arc::new(AgentRegistry::load(Path::new("../config")));
        let gateway = Arc::new(ModelGateway::new(Box::new(EchoClient), None));
        let enrichers = Enrichers::new(Config::empty(), gateway.clone());
        let dispatcher = Arc::new(AgentDispatcher::new(
            registry.clone(),
            gateway,
            enrichers,
        ));
        PlanExecutor::new(dispatcher, registry)
    }

    fn step(agent: &str, input: &str) -> Step {
        Step {
            agent: agent.to_string(),
            task: String::new(),
            input: input.to_string(),
        }
    }

    #[tokio::test]
    async fn test_step_failure_does_not_abort_the_plan() {
        let plan = Plan {
            explanation: "three steps".to_string(),
            steps: vec![
                step("assistant", "alpha"),
                step("assistant", "FAIL now"),
                step("assistant", "gamma"),
            ],
        };

        let results = executor().execute(&plan).await;

        assert_eq!(results.len(), 3);
        assert!(results[0].is_success());
        assert!(!results[1].is_success());
        assert!(results[2].is_success());
        assert_eq!(results[2].output.as_deref(), Some("echo: gamma"));
    }

    #[tokio::test]
    async fn test_unknown_kind_is_skipped_not_fatal() {
        let plan = Plan {
            explanation: String::new(),
            steps: vec![step("teleporter", "beam"), step("assistant", "after")],
        };

        let results = executor().execute(&plan).await;

        assert_eq!(results.len(), 2);
        assert!(results[0].error.as_deref().unwrap().contains("unknown agent kind"));
        assert!(results[1].is_success());
    }

    #[tokio::test]
    async fn test_placeholder_threads_prior_output_into_next_step() {
        let plan = Plan {
            explanation: String::new(),
            steps: vec![
                step("crypto", "bitcoin price"),
                step("calculator", "How many bitcoins is $100 at {{step:1}}?"),
            ],
        };

        let results = executor().execute(&plan).await;

        assert_eq!(results.len(), 2);
        let first_output = results[0].output.as_deref().unwrap();
        let second_output = results[1].output.as_deref().unwrap();
        assert!(second_output.contains(first_output));
    }

    #[tokio::test]
    async fn test_placeholder_to_failed_step_stays_literal_in_dispatch() {
        let plan = Plan {
            explanation: String::new(),
            steps: vec![
                step("assistant", "FAIL first"),
                step("assistant", "combine {{step:1}}"),
            ],
        };

        let results = executor().execute(&plan).await;

        assert!(!results[0].is_success());
        assert_eq!(
            results[1].output.as_deref(),
            Some("echo: combine {{step:1}}")
        );
    }
}
