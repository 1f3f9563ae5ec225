use super::{Enrichment, EnrichError, get_json, require_key};
use reqwest::Client;
use serde_json::Value;

/// Live conversion rate for a currency pair via ExchangeRate-API.
///
/// The unit rate is printed with 4 decimals, the x10/x100/x1000 derived
/// amounts with 2; the client relies on that width being stable.
pub async fn convert(
    http: &Client,
    api_key: Option<&str>,
    from: &str,
    to: &str,
) -> Result<Enrichment, EnrichError> {
    let key = require_key(api_key, "EXCHANGE_API_KEY")?;
    let from = from.to_uppercase();
    let to = to.to_uppercase();

    let url = format!(
        "https://v6.exchangerate-api.com/v6/{}/pair/{}/{}",
        key, from, to
    );

    let data: Value = get_json(http, &url).await?;

    // The upstream reports errors in-band with a 200 status.
    if data["result"].as_str() != Some("success") {
        return Err(match data["error-type"].as_str().unwrap_or("") {
            "unsupported-code" | "malformed-request" => EnrichError::NotFound,
            "invalid-key" | "inactive-account" => EnrichError::MissingCredential,
            "quota-reached" => EnrichError::RateLimited,
            other => EnrichError::Upstream(format!("exchange error: {}", other)),
        });
    }

    let rate = data["conversion_rate"]
        .as_f64()
        .ok_or_else(|| EnrichError::Upstream("missing conversion_rate".to_string()))?;

    Ok(Enrichment::new(format_conversion(&from, &to, rate)))
}

fn format_conversion(from: &str, to: &str, rate: f64) -> String {
    let mut reply = format!("1 {} = {:.4} {}", from, rate, to);
    for amount in [10.0, 100.0, 1000.0] {
        reply.push_str(&format!(
            "\n{:.0} {} = {:.2} {}",
            amount,
            from,
            amount * rate,
            to
        ));
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_rate_has_four_decimals_and_amounts_two() {
        let reply = format_conversion("USD", "TRY", 27.1357);
        let lines: Vec<&str> = reply.lines().collect();
        assert_eq!(lines[0], "1 USD = 27.1357 TRY");
        assert_eq!(lines[1], "10 USD = 271.36 TRY");
        assert_eq!(lines[2], "100 USD = 2713.57 TRY");
        assert_eq!(lines[3], "1000 USD = 27135.70 TRY");
    }

    #[test]
    fn test_round_rate_keeps_fixed_width() {
        let reply = format_conversion("EUR", "TRY", 41.25);
        assert!(reply.starts_with("1 EUR = 41.2500 TRY"));
        assert!(reply.contains("1000 EUR = 41250.00 TRY"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_call() {
        let http = Client::new();
        let err = convert(&http, None, "USD", "TRY").await.unwrap_err();
        assert_eq!(err, EnrichError::MissingCredential);
    }
}
