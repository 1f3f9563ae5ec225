use super::{Enrichment, EnrichError, get_json, require_key};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    name: String,
    weather: Vec<WeatherCondition>,
    main: WeatherMain,
    wind: WeatherWind,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherWind {
    speed: f64,
}

/// Current conditions for a city via OpenWeatherMap. An unknown city is a
/// 404 from the upstream and maps to `NotFound`.
pub async fn current(
    http: &Client,
    api_key: Option<&str>,
    city: &str,
) -> Result<Enrichment, EnrichError> {
    let key = require_key(api_key, "OPENWEATHER_API_KEY")?;

    let url = format!(
        "https://api.openweathermap.org/data/2.5/weather?q={}&appid={}&units=metric",
        urlencoding::encode(city),
        key
    );

    let data: WeatherResponse = get_json(http, &url).await?;
    Ok(Enrichment::new(format_report(&data)))
}

fn format_report(data: &WeatherResponse) -> String {
    let description = data
        .weather
        .first()
        .map(|w| w.description.as_str())
        .unwrap_or("unknown conditions");

    format!(
        "Weather in {}: {}, {:.1}°C (feels like {:.1}°C), humidity {:.0}%, wind {:.1} m/s.",
        data.name, description, data.main.temp, data.main.feels_like, data.main.humidity,
        data.wind.speed
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "İstanbul",
        "weather": [{"description": "scattered clouds"}],
        "main": {"temp": 21.34, "feels_like": 20.81, "humidity": 64},
        "wind": {"speed": 4.12}
    }"#;

    #[test]
    fn test_format_report() {
        let data: WeatherResponse = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(
            format_report(&data),
            "Weather in İstanbul: scattered clouds, 21.3°C (feels like 20.8°C), humidity 64%, wind 4.1 m/s."
        );
    }

    #[test]
    fn test_format_is_deterministic() {
        let data: WeatherResponse = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(format_report(&data), format_report(&data));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_call() {
        let http = Client::new();
        let err = current(&http, None, "İstanbul").await.unwrap_err();
        assert_eq!(err, EnrichError::MissingCredential);
    }
}
