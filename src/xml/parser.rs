//! Parser für Funktions-Dateien.

mod attributes;

use self::attributes::ElementAttributes;
use crate::core::{FunctionRecord, FunctionsDocument, Rgb, TransferNode};
use anyhow::{bail, Context, Result};
use glam::DVec2;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Liste, die gerade innerhalb von `<functions>` gelesen wird
enum Section {
    None,
    Transfer(Vec<TransferNode>),
    Bezier(Vec<DVec2>),
}

/// Sammelt Funktionen, während der Reader die Events liefert.
struct DocumentBuilder {
    document: FunctionsDocument,
    section: Section,
    in_functions: bool,
    found_functions: bool,
}

impl DocumentBuilder {
    fn new() -> Self {
        Self {
            document: FunctionsDocument::default(),
            section: Section::None,
            in_functions: false,
            found_functions: false,
        }
    }

    fn open(&mut self, attributes: &ElementAttributes, empty: bool) -> Result<()> {
        let tag = attributes.tag();
        if tag == "functions" {
            self.found_functions = true;
            self.in_functions = !empty;
            return Ok(());
        }
        if !self.in_functions {
            return Ok(());
        }
        match tag {
            "transfer" => {
                self.section = Section::Transfer(Vec::new());
                if empty {
                    self.close("transfer")?;
                }
            }
            "bezier" => {
                self.section = Section::Bezier(Vec::new());
                if empty {
                    self.close("bezier")?;
                }
            }
            "gaussian" => {
                self.document.functions.push(FunctionRecord::Gaussian {
                    mean: attributes.number("mean")?,
                    sigma: attributes.number("sigma")?,
                    multiplier: attributes.number("multiplier")?,
                });
            }
            "node" => match &mut self.section {
                Section::Transfer(nodes) => nodes.push(TransferNode {
                    x: attributes.number("value")?,
                    opacity: attributes.number("opacity")?,
                    color: Rgb::new(
                        attributes.number("red")?,
                        attributes.number("green")?,
                        attributes.number("blue")?,
                    ),
                }),
                Section::Bezier(points) => points.push(DVec2::new(
                    attributes.number("value")?,
                    attributes.number("fktValue")?,
                )),
                Section::None => log::warn!("<node> ausserhalb einer Funktion ignoriert"),
            },
            other => log::debug!("Unbekanntes Element <{}> ignoriert", other),
        }
        Ok(())
    }

    fn close(&mut self, tag: &str) -> Result<()> {
        match tag {
            "functions" => self.in_functions = false,
            "transfer" => {
                if let Section::Transfer(nodes) = std::mem::replace(&mut self.section, Section::None) {
                    if self.document.transfer.is_some() {
                        log::warn!("Mehrere <transfer>-Listen, die letzte wird verwendet");
                    }
                    self.document.transfer = Some(nodes);
                }
            }
            "bezier" => {
                if let Section::Bezier(points) = std::mem::replace(&mut self.section, Section::None) {
                    validate_bezier(&points).with_context(|| {
                        format!("Ungueltige Bezier-Kurve Nr. {}", self.document.functions.len() + 1)
                    })?;
                    self.document.functions.push(FunctionRecord::Bezier(points));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<FunctionsDocument> {
        if !self.found_functions {
            bail!("Kein <functions>-Element gefunden");
        }
        Ok(self.document)
    }
}

/// Parsed Transferfunktion und Hilfsfunktionen aus einem XML-String.
///
/// Das `<functions>`-Element darf beliebig tief verschachtelt sein (z.B. in
/// einer Projektdatei). Fehlende oder nicht-numerische Attribute sind Fehler.
pub fn parse_functions(xml_content: &str) -> Result<FunctionsDocument> {
    let mut reader = Reader::from_str(xml_content);
    reader.config_mut().trim_text(true);

    let mut buffer = Vec::new();
    let mut builder = DocumentBuilder::new();

    loop {
        match reader.read_event_into(&mut buffer) {
            Ok(Event::Start(ref e)) => {
                let attributes = ElementAttributes::read(reader.decoder(), e)?;
                builder.open(&attributes, false)?;
            }
            Ok(Event::Empty(ref e)) => {
                let attributes = ElementAttributes::read(reader.decoder(), e)?;
                builder.open(&attributes, true)?;
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                let tag = reader.decoder().decode(name.as_ref())?;
                builder.close(&tag)?;
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err).context("Fehler beim Parsen des XML"),
            _ => {}
        }

        buffer.clear();
    }

    let document = builder.finish()?;
    log::debug!(
        "Funktionen gelesen: Transferfunktion {}, {} Hilfsfunktionen",
        if document.transfer.is_some() { "ja" } else { "nein" },
        document.functions.len()
    );
    Ok(document)
}

/// Bézier-Kurven bestehen aus `3n + 1` Punkten, mindestens einem Segment.
fn validate_bezier(points: &[DVec2]) -> Result<()> {
    if points.len() < 4 || points.len() % 3 != 1 {
        bail!(
            "{} Punkte, erwartet 3n+1 mit mindestens 4 Punkten",
            points.len()
        );
    }
    Ok(())
}
