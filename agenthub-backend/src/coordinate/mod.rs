//! Coordinate mode: a model-generated plan run step by step through the
//! single-agent dispatcher.

pub mod executor;
pub mod planner;

use crate::ai::GatewayError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A parsed execution plan. Only the structure is validated; whether the
/// steps make sense is the model's problem.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub explanation: String,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Agent kind name as the model wrote it. Resolved at execution time so
    /// an unknown kind skips one step instead of failing the whole parse.
    pub agent: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub input: String,
}

/// One row of the append-only execution log. The log is the only mutable
/// state in a coordinate request and lives only for that request.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub step_index: usize,
    pub agent: String,
    pub output: Option<String>,
    pub error: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl StepResult {
    pub fn succeeded(step_index: usize, agent: &str, output: String) -> Self {
        Self {
            step_index,
            agent: agent.to_string(),
            output: Some(output),
            error: None,
            finished_at: Utc::now(),
        }
    }

    pub fn failed(step_index: usize, agent: &str, error: String) -> Self {
        Self {
            step_index,
            agent: agent.to_string(),
            output: None,
            error: Some(error),
            finished_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.output.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    /// The plan completion was not valid JSON or had no steps. Hard failure
    /// for the request; the planning step itself is never retried.
    MalformedPlan(String),
    Gateway(GatewayError),
}

impl std::fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateError::MalformedPlan(detail) => write!(f, "malformed plan: {}", detail),
            CoordinateError::Gateway(error) => write!(f, "{}", error),
        }
    }
}

impl From<GatewayError> for CoordinateError {
    fn from(error: GatewayError) -> Self {
        CoordinateError::Gateway(error)
    }
}

/// Full-transcript presentation: the plan explanation as header, then every
/// step's output (or failure note) in order.
pub fn compose_transcript(plan: &Plan, results: &[StepResult]) -> String {
    let mut reply = String::new();

    if !plan.explanation.is_empty() {
        reply.push_str(&plan.explanation);
        reply.push_str("\n\n");
    }

    for result in results {
        let heading = format!("Step {} ({})", result.step_index + 1, result.agent);
        match (&result.output, &result.error) {
            (Some(output), _) => reply.push_str(&format!("{}:\n{}\n\n", heading, output)),
            (None, Some(error)) => reply.push_str(&format!("{}: failed ({})\n\n", heading, error)),
            (None, None) => {}
        }
    }

    reply.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_keeps_explanation_header_and_order() {
        let plan = Plan {
            explanation: "Fetch the price, then convert.".to_string(),
            steps: vec![],
        };
        let results = vec![
            StepResult::succeeded(0, "crypto", "43210.00 USD".to_string()),
            StepResult::failed(1, "exchange", "service unavailable".to_string()),
        ];

        let transcript = compose_transcript(&plan, &results);
        assert!(transcript.starts_with("Fetch the price, then convert.\n\n"));

        let price_at = transcript.find("Step 1 (crypto):").unwrap();
        let failed_at = transcript.find("Step 2 (exchange): failed").unwrap();
        assert!(price_at < failed_at);
        assert!(transcript.contains("service unavailable"));
    }

    #[test]
    fn test_transcript_without_explanation() {
        let plan = Plan {
            explanation: String::new(),
            steps: vec![],
        };
        let results = vec![StepResult::succeeded(0, "weather", "Sunny.".to_string())];
        assert_eq!(compose_transcript(&plan, &results), "Step 1 (weather):\nSunny.");
    }
}
