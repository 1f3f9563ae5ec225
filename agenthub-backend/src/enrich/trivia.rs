//! Trivia questions via the Open Trivia Database. Payloads are requested
//! base64-encoded so HTML entities never leak into replies.

use super::{Enrichment, EnrichError, get_json};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::Deserialize;

const QUESTION_COUNT: usize = 3;

#[derive(Debug, Deserialize)]
struct TriviaResponse {
    response_code: u32,
    #[serde(default)]
    results: Vec<TriviaQuestion>,
}

#[derive(Debug, Deserialize)]
struct TriviaQuestion {
    question: String,
    correct_answer: String,
}

pub async fn questions(http: &Client, category: &str) -> Result<Enrichment, EnrichError> {
    let mut url = format!(
        "https://opentdb.com/api.php?amount={}&type=multiple&encode=base64",
        QUESTION_COUNT
    );
    if let Some(id) = category_id(category) {
        url.push_str(&format!("&category={}", id));
    }

    let data: TriviaResponse = get_json(http, &url).await?;

    match data.response_code {
        0 => {}
        1 => return Err(EnrichError::NotFound),
        5 => return Err(EnrichError::RateLimited),
        code => {
            return Err(EnrichError::Upstream(format!(
                "trivia response code {}",
                code
            )));
        }
    }

    if data.results.is_empty() {
        return Err(EnrichError::NotFound);
    }

    Ok(format_quiz(&data.results).ok_or_else(|| {
        EnrichError::Upstream("trivia payload was not valid base64".to_string())
    })?)
}

/// OpenTDB category ids for the categories the persona prompt offers.
/// Unknown categories use the site-wide general pool.
fn category_id(category: &str) -> Option<u32> {
    match category.trim().to_lowercase().as_str() {
        "general" => Some(9),
        "film" => Some(11),
        "music" => Some(12),
        "science" => Some(17),
        "sports" => Some(21),
        "geography" => Some(22),
        "history" => Some(23),
        _ => None,
    }
}

fn decode(payload: &str) -> Option<String> {
    let bytes = BASE64.decode(payload).ok()?;
    String::from_utf8(bytes).ok()
}

/// Questions up front, answers behind the detail separator so the client
/// can hide them.
fn format_quiz(results: &[TriviaQuestion]) -> Option<Enrichment> {
    let mut questions = String::from("Trivia time!");
    let mut answers = String::from("Answers:");

    for (index, item) in results.iter().enumerate() {
        let question = decode(&item.question)?;
        let answer = decode(&item.correct_answer)?;
        questions.push_str(&format!("\n{}. {}", index + 1, question));
        answers.push_str(&format!("\n{}. {}", index + 1, answer));
    }

    Some(Enrichment::with_detail(questions, answers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::DETAIL_SEPARATOR;

    #[test]
    fn test_category_mapping() {
        assert_eq!(category_id("science"), Some(17));
        assert_eq!(category_id("History"), Some(23));
        assert_eq!(category_id("underwater basket weaving"), None);
    }

    #[test]
    fn test_decode_base64_payload() {
        // "What is 2+2?" / "4"
        assert_eq!(decode("V2hhdCBpcyAyKzI/").as_deref(), Some("What is 2+2?"));
        assert_eq!(decode("NA==").as_deref(), Some("4"));
        assert_eq!(decode("not-base64!!!"), None);
    }

    #[test]
    fn test_format_quiz_hides_answers_behind_separator() {
        let results = vec![TriviaQuestion {
            question: "V2hhdCBpcyAyKzI/".to_string(),
            correct_answer: "NA==".to_string(),
        }];

        let enrichment = format_quiz(&results).unwrap();
        let parts: Vec<&str> = enrichment.reply.split(DETAIL_SEPARATOR).collect();
        assert_eq!(parts[0], "Trivia time!\n1. What is 2+2?");
        assert_eq!(parts[1], "Answers:\n1. 4");
    }
}
