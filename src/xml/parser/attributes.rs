//! Attribut-Zugriff für einzelne XML-Elemente.

use anyhow::{bail, Context, Result};
use quick_xml::encoding::Decoder;
use quick_xml::events::BytesStart;

/// Name und Attribute eines Start- oder Leer-Elements
pub(super) struct ElementAttributes {
    tag: String,
    values: Vec<(String, String)>,
}

impl ElementAttributes {
    /// Liest Tag-Namen und alle Attribute (unescaped).
    pub(super) fn read(decoder: Decoder, element: &BytesStart) -> Result<Self> {
        let name = element.name();
        let tag = decoder.decode(name.as_ref())?.into_owned();
        let mut values = Vec::new();
        for attr in element.attributes().with_checks(false) {
            let attr = attr.with_context(|| format!("Fehlerhaftes Attribut in <{}>", tag))?;
            let key = decoder.decode(attr.key.as_ref())?.into_owned();
            let value = attr.unescape_value()?.into_owned();
            values.push((key, value));
        }
        Ok(Self { tag, values })
    }

    pub(super) fn tag(&self) -> &str {
        &self.tag
    }

    /// Pflicht-Attribut als endliche Zahl
    pub(super) fn number(&self, key: &str) -> Result<f64> {
        let text = self
            .values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .with_context(|| format!("Attribut '{}' fehlt in <{}>", key, self.tag))?;
        let value = text.parse::<f64>().with_context(|| {
            format!(
                "Wert '{}' von '{}' in <{}> ist keine Zahl",
                truncate_for_error(text),
                key,
                self.tag
            )
        })?;
        if !value.is_finite() {
            bail!("Wert von '{}' in <{}> muss endlich sein", key, self.tag);
        }
        Ok(value)
    }
}

/// Kürzt einen String für Fehlermeldungen auf max. 40 Zeichen
fn truncate_for_error(s: &str) -> &str {
    match s.char_indices().nth(40) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_for_error;

    #[test]
    fn test_truncate_for_error_respects_char_boundaries() {
        assert_eq!(truncate_for_error("kurz"), "kurz");
        let long = "ä".repeat(50);
        assert_eq!(truncate_for_error(&long).chars().count(), 40);
    }
}
