use super::{Enrichment, EnrichError, get_json};
use reqwest::Client;
use serde::Deserialize;

const MAX_DEFINITIONS: usize = 3;

#[derive(Debug, Deserialize)]
struct DictionaryEntry {
    word: String,
    #[serde(default)]
    phonetic: String,
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(rename = "partOfSpeech", default)]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    definition: String,
}

/// English word definitions via dictionaryapi.dev. Unknown words are 404s.
pub async fn define(http: &Client, word: &str) -> Result<Enrichment, EnrichError> {
    let url = format!(
        "https://api.dictionaryapi.dev/api/v2/entries/en/{}",
        urlencoding::encode(word.trim())
    );

    let entries: Vec<DictionaryEntry> = get_json(http, &url).await?;
    let entry = entries.first().ok_or(EnrichError::NotFound)?;

    Ok(Enrichment::new(format_entry(entry)))
}

fn format_entry(entry: &DictionaryEntry) -> String {
    let mut reply = entry.word.clone();
    if !entry.phonetic.is_empty() {
        reply.push_str(&format!(" {}", entry.phonetic));
    }

    let definitions = entry
        .meanings
        .iter()
        .flat_map(|meaning| {
            meaning
                .definitions
                .iter()
                .map(move |d| (meaning.part_of_speech.as_str(), d.definition.as_str()))
        })
        .take(MAX_DEFINITIONS);

    for (index, (part_of_speech, definition)) in definitions.enumerate() {
        if part_of_speech.is_empty() {
            reply.push_str(&format!("\n{}. {}", index + 1, definition));
        } else {
            reply.push_str(&format!("\n{}. ({}) {}", index + 1, part_of_speech, definition));
        }
    }

    reply
}
