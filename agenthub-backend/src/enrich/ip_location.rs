use super::{Enrichment, EnrichError, get_json};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GeoResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    query: String,
    #[serde(default)]
    country: String,
    #[serde(rename = "regionName", default)]
    region_name: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    isp: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
}

/// IP geolocation via ip-api.com. The upstream reports failures in-band
/// with a 200 status ("invalid query", "private range").
pub async fn lookup(http: &Client, ip: &str) -> Result<Enrichment, EnrichError> {
    let url = format!("http://ip-api.com/json/{}", urlencoding::encode(ip.trim()));

    let geo: GeoResponse = get_json(http, &url).await?;

    if geo.status != "success" {
        log::debug!("[enrich] ip-api failure for '{}': {}", ip, geo.message);
        return Err(EnrichError::NotFound);
    }

    Ok(Enrichment::new(format_location(&geo)))
}

fn format_location(geo: &GeoResponse) -> String {
    let place = [geo.city.as_str(), geo.region_name.as_str(), geo.country.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "IP {} is in {} (ISP: {}, coordinates {:.4}, {:.4}).",
        geo.query, place, geo.isp, geo.lat, geo.lon
    )
}
