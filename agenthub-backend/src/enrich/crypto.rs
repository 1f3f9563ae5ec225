use super::{Enrichment, EnrichError, get_json};
use reqwest::Client;
use serde_json::Value;

/// Spot price of a cryptocurrency via the CoinGecko simple-price endpoint.
/// The free tier needs no credential; an unknown coin id comes back as an
/// empty object.
pub async fn price(http: &Client, coin_id: &str, currency: &str) -> Result<Enrichment, EnrichError> {
    let coin_id = coin_id.trim().to_lowercase();
    let currency = if currency.trim().is_empty() {
        "usd".to_string()
    } else {
        currency.trim().to_lowercase()
    };

    let url = format!(
        "https://api.coingecko.com/api/v3/simple/price?ids={}&vs_currencies={}",
        urlencoding::encode(&coin_id),
        urlencoding::encode(&currency)
    );

    let data: Value = get_json(http, &url).await?;

    let amount = data[&coin_id][&currency]
        .as_f64()
        .ok_or(EnrichError::NotFound)?;

    Ok(Enrichment::new(format_price(&coin_id, &currency, amount)))
}

fn format_price(coin_id: &str, currency: &str, amount: f64) -> String {
    format!(
        "Current price of {}: {:.2} {}",
        coin_id,
        amount,
        currency.to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_price_two_decimals() {
        assert_eq!(
            format_price("bitcoin", "usd", 43201.1234),
            "Current price of bitcoin: 43201.12 USD"
        );
    }

    #[test]
    fn test_unknown_coin_payload_is_empty_object() {
        let data = json!({});
        assert!(data["nonsense-coin"]["usd"].as_f64().is_none());
    }
}
