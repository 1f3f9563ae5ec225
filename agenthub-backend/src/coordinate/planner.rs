//! Plan generation: one model call with a fixed planning prompt that
//! enumerates every catalog agent, then a strict-JSON parse.

use super::{CoordinateError, Plan};
use crate::agents::AgentRegistry;
use crate::ai::ModelGateway;

const PLANNER_PROMPT: &str = include_str!("../agents/prompts/planner.md");

pub async fn generate_plan(
    gateway: &ModelGateway,
    registry: &AgentRegistry,
    user_message: &str,
) -> Result<Plan, CoordinateError> {
    let completion = gateway
        .complete(&planning_prompt(registry), user_message)
        .await?;

    let plan = parse_plan(&completion)?;
    log::info!(
        "[planner] plan with {} steps: {}",
        plan.steps.len(),
        plan.explanation
    );
    Ok(plan)
}

fn planning_prompt(registry: &AgentRegistry) -> String {
    let mut prompt = PLANNER_PROMPT.to_string();
    for agent in registry.all() {
        prompt.push_str(&format!("- {}: {}\n", agent.kind, agent.capability));
    }
    prompt
}

/// Parse a plan completion. Invalid JSON or an empty step list is a hard
/// failure; there is no planning retry beyond the gateway's own credential
/// fallback.
pub fn parse_plan(completion: &str) -> Result<Plan, CoordinateError> {
    let stripped = strip_code_fences(completion);

    let plan: Plan = serde_json::from_str(stripped)
        .map_err(|e| CoordinateError::MalformedPlan(format!("plan is not valid JSON: {}", e)))?;

    if plan.steps.is_empty() {
        return Err(CoordinateError::MalformedPlan(
            "plan contains no steps".to_string(),
        ));
    }

    Ok(plan)
}

/// Models wrap JSON in markdown fences despite instructions; strip one
/// leading and one trailing fence line.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const PLAN_JSON: &str = r#"{
        "explanation": "Get the bitcoin price, then convert.",
        "steps": [
            {"agent": "crypto", "task": "Fetch the bitcoin price", "input": "bitcoin price in usd"},
            {"agent": "calculator", "task": "Convert 100 dollars", "input": "How many bitcoins is $100 at {{step:1}}?"}
        ]
    }"#;

    #[test]
    fn test_parse_plain_json_plan() {
        let plan = parse_plan(PLAN_JSON).unwrap();
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].agent, "crypto");
        assert!(plan.steps[1].input.contains("{{step:1}}"));
    }

    #[test]
    fn test_parse_fenced_plan() {
        let fenced = format!("```json\n{}\n```", PLAN_JSON);
        let plan = parse_plan(&fenced).unwrap();
        assert_eq!(plan.steps.len(), 2);
    }

    #[test]
    fn test_parse_bare_fence_plan() {
        let fenced = format!("```\n{}\n```", PLAN_JSON);
        assert!(parse_plan(&fenced).is_ok());
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse_plan("I think you should use the crypto agent first.").unwrap_err();
        assert!(matches!(err, CoordinateError::MalformedPlan(_)));
    }

    #[test]
    fn test_missing_steps_field_is_malformed() {
        let err = parse_plan(r#"{"explanation": "no steps here"}"#).unwrap_err();
        assert!(matches!(err, CoordinateError::MalformedPlan(_)));
    }

    #[test]
    fn test_empty_steps_is_malformed() {
        let err = parse_plan(r#"{"explanation": "x", "steps": []}"#).unwrap_err();
        assert!(matches!(err, CoordinateError::MalformedPlan(_)));
    }

    #[test]
    fn test_planning_prompt_lists_every_agent() {
        let registry = AgentRegistry::load(Path::new("../config"));
        let prompt = planning_prompt(&registry);
        assert!(prompt.contains("- exchange:"));
        assert!(prompt.contains("- weather:"));
        assert!(prompt.contains("{{step:N}}"));
    }
}
