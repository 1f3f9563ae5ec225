use super::{Enrichment, EnrichError};

/// QR rendering needs no upstream round-trip: the render service takes the
/// payload in the image URL itself, so the reply is just that link.
pub fn render_link(content: &str) -> Result<Enrichment, EnrichError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(EnrichError::NotFound);
    }

    let url = format!(
        "https://api.qrserver.com/v1/create-qr-code/?size=300x300&data={}",
        urlencoding::encode(content)
    );

    Ok(Enrichment::new(format!("Here is your QR code:\n{}", url)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_url_encoded() {
        let enrichment = render_link("hello world").unwrap();
        assert!(enrichment.reply.ends_with("data=hello%20world"));
    }

    #[test]
    fn test_link_payload_survives_encoding() {
        let enrichment = render_link("https://example.com/?a=1&b=2").unwrap();
        assert!(enrichment.reply.contains("data=https%3A%2F%2Fexample.com%2F%3Fa%3D1%26b%3D2"));
    }

    #[test]
    fn test_empty_payload_is_not_found() {
        assert_eq!(render_link("   ").unwrap_err(), EnrichError::NotFound);
    }

    #[test]
    fn test_same_payload_same_link() {
        assert_eq!(render_link("abc").unwrap(), render_link("abc").unwrap());
    }
}
