use super::{Enrichment, EnrichError};

/// The translation itself rides inside the directive fields, so this is the
/// one enricher with no outbound call: it only formats what the model
/// already produced.
pub fn format_translation(fields: &[String]) -> Result<Enrichment, EnrichError> {
    let translation = fields.first().map(String::as_str).unwrap_or("").trim();
    if translation.is_empty() {
        return Err(EnrichError::NotFound);
    }

    let source = fields.get(1).map(String::as_str).unwrap_or("");
    let target = fields.get(2).map(String::as_str).unwrap_or("");

    Ok(Enrichment::new(format!(
        "{}\n\n({} → {})",
        translation,
        source.to_uppercase(),
        target.to_uppercase()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_translation_with_language_pair() {
        let fields = vec!["hello".to_string(), "tr".to_string(), "en".to_string()];
        let enrichment = format_translation(&fields).unwrap();
        assert_eq!(enrichment.reply, "hello\n\n(TR → EN)");
    }

    #[test]
    fn test_empty_translation_is_not_found() {
        let fields = vec!["  ".to_string(), "tr".to_string(), "en".to_string()];
        assert_eq!(format_translation(&fields).unwrap_err(), EnrichError::NotFound);
    }
}
