//! Team fixtures via TheSportsDB: discover the team id first, then fetch
//! its next events. The detail pass is bounded to a fixed number of
//! fixtures so one enrichment stays at two upstream calls.

use super::{Enrichment, EnrichError, get_json};
use reqwest::Client;
use serde_json::Value;

const MAX_FIXTURES: usize = 3;

pub async fn next_fixtures(http: &Client, team: &str) -> Result<Enrichment, EnrichError> {
    let search_url = format!(
        "https://www.thesportsdb.com/api/v1/json/3/searchteams.php?t={}",
        urlencoding::encode(team.trim())
    );

    let search: Value = get_json(http, &search_url).await?;

    let teams = search["teams"].as_array().ok_or(EnrichError::NotFound)?;
    let first = teams.first().ok_or(EnrichError::NotFound)?;

    let team_id = first["idTeam"].as_str().ok_or(EnrichError::NotFound)?;
    let team_name = first["strTeam"].as_str().unwrap_or(team);
    let league = first["strLeague"].as_str().unwrap_or("");

    let events_url = format!(
        "https://www.thesportsdb.com/api/v1/json/3/eventsnext.php?id={}",
        team_id
    );

    let events: Value = get_json(http, &events_url).await?;
    let fixtures = parse_fixtures(&events);

    Ok(Enrichment::new(format_fixtures(team_name, league, &fixtures)))
}

fn parse_fixtures(events: &Value) -> Vec<String> {
    events["events"]
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|event| {
                    let name = event["strEvent"].as_str()?;
                    let date = event["dateEvent"].as_str().unwrap_or("date unknown");
                    Some(format!("{} — {}", name, date))
                })
                .take(MAX_FIXTURES)
                .collect()
        })
        .unwrap_or_default()
}

fn format_fixtures(team: &str, league: &str, fixtures: &[String]) -> String {
    let heading = if league.is_empty() {
        format!("Upcoming fixtures for {}:", team)
    } else {
        format!("Upcoming fixtures for {} ({}):", team, league)
    };

    if fixtures.is_empty() {
        return format!("No upcoming fixtures are listed for {} right now.", team);
    }

    let mut reply = heading;
    for (index, fixture) in fixtures.iter().enumerate() {
        reply.push_str(&format!("\n{}. {}", index + 1, fixture));
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_fixtures_is_bounded() {
        let events = json!({
            "events": (0..10).map(|i| json!({
                "strEvent": format!("Arsenal vs Team {}", i),
                "dateEvent": "2026-08-15"
            })).collect::<Vec<_>>()
        });
        assert_eq!(parse_fixtures(&events).len(), MAX_FIXTURES);
    }

    #[test]
    fn test_null_events_payload() {
        assert!(parse_fixtures(&json!({"events": null})).is_empty());
    }

    #[test]
    fn test_format_fixtures() {
        let fixtures = vec!["Arsenal vs Chelsea — 2026-08-15".to_string()];
        assert_eq!(
            format_fixtures("Arsenal", "English Premier League", &fixtures),
            "Upcoming fixtures for Arsenal (English Premier League):\n1. Arsenal vs Chelsea — 2026-08-15"
        );
    }

    #[test]
    fn test_format_without_fixtures() {
        assert_eq!(
            format_fixtures("Arsenal", "", &[]),
            "No upcoming fixtures are listed for Arsenal right now."
        );
    }
}
