//! Dish suggestion via TheMealDB. This is the one deliberately random
//! enricher: the upstream returns every match and we pick one, so repeated
//! identical directives may produce different dishes.

use super::{Enrichment, EnrichError, get_json};
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;

const MAX_INSTRUCTION_CHARS: usize = 400;

#[derive(Debug, Deserialize)]
struct MealResponse {
    meals: Option<Vec<Meal>>,
}

#[derive(Debug, Clone, Deserialize)]
struct Meal {
    #[serde(rename = "strMeal")]
    name: String,
    #[serde(rename = "strCategory", default)]
    category: String,
    #[serde(rename = "strArea", default)]
    area: String,
    #[serde(rename = "strInstructions", default)]
    instructions: String,
}

pub async fn suggest(http: &Client, query: &str) -> Result<Enrichment, EnrichError> {
    let url = format!(
        "https://www.themealdb.com/api/json/v1/1/search.php?s={}",
        urlencoding::encode(query.trim())
    );

    let data: MealResponse = get_json(http, &url).await?;
    let meals = data.meals.unwrap_or_default();

    if meals.is_empty() {
        return Err(EnrichError::NotFound);
    }

    let pick = rand::thread_rng().gen_range(0..meals.len());
    Ok(format_meal(&meals[pick]))
}

fn format_meal(meal: &Meal) -> Enrichment {
    let origin = [meal.category.as_str(), meal.area.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    let summary = if origin.is_empty() {
        format!("How about {}?", meal.name)
    } else {
        format!("How about {}? ({})", meal.name, origin)
    };

    if meal.instructions.is_empty() {
        return Enrichment::new(summary);
    }

    let mut instructions: String = meal.instructions.chars().take(MAX_INSTRUCTION_CHARS).collect();
    if meal.instructions.chars().count() > MAX_INSTRUCTION_CHARS {
        instructions.push_str("...");
    }

    Enrichment::with_detail(summary, instructions)
}
