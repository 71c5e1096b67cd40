//! Writer für Funktions-Dateien.

use crate::core::{FunctionRecord, FunctionsDocument, TransferNode};
use anyhow::{bail, Result};
use glam::DVec2;

/// Schreibt Transferfunktion und Hilfsfunktionen als XML.
///
/// Zahlen werden in kürzester verlustfreier Darstellung geschrieben, damit
/// ein erneutes Einlesen dieselben Werte liefert.
pub fn write_functions(document: &FunctionsDocument) -> Result<String> {
    let mut output = String::new();
    output.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    output.push_str("<functions>\n");

    if let Some(nodes) = &document.transfer {
        write_transfer(&mut output, nodes)?;
    }

    for (index, function) in document.functions.iter().enumerate() {
        match function {
            FunctionRecord::Bezier(points) => {
                if points.len() < 4 || points.len() % 3 != 1 {
                    bail!(
                        "Bezier-Kurve Nr. {} hat {} Punkte, erwartet 3n+1",
                        index + 1,
                        points.len()
                    );
                }
                write_bezier(&mut output, points)?;
            }
            FunctionRecord::Gaussian {
                mean,
                sigma,
                multiplier,
            } => {
                output.push_str(&format!(
                    "    <gaussian mean=\"{}\" sigma=\"{}\" multiplier=\"{}\"/>\n",
                    format_number(*mean)?,
                    format_number(*sigma)?,
                    format_number(*multiplier)?
                ));
            }
        }
    }

    output.push_str("</functions>\n");
    log::debug!("{} Hilfsfunktionen geschrieben", document.functions.len());
    Ok(output)
}

fn write_transfer(output: &mut String, nodes: &[TransferNode]) -> Result<()> {
    output.push_str("    <transfer>\n");
    for node in nodes {
        output.push_str(&format!(
            "        <node value=\"{}\" opacity=\"{}\" red=\"{}\" green=\"{}\" blue=\"{}\"/>\n",
            format_number(node.x)?,
            format_number(node.opacity)?,
            format_number(node.color.r)?,
            format_number(node.color.g)?,
            format_number(node.color.b)?
        ));
    }
    output.push_str("    </transfer>\n");
    Ok(())
}

fn write_bezier(output: &mut String, points: &[DVec2]) -> Result<()> {
    output.push_str("    <bezier>\n");
    for point in points {
        output.push_str(&format!(
            "        <node value=\"{}\" fktValue=\"{}\"/>\n",
            format_number(point.x)?,
            format_number(point.y)?
        ));
    }
    output.push_str("    </bezier>\n");
    Ok(())
}

fn format_number(value: f64) -> Result<String> {
    if !value.is_finite() {
        bail!("Nicht-endlicher Wert {} kann nicht geschrieben werden", value);
    }
    Ok(format!("{}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_is_shortest_roundtrip() {
        assert_eq!(format_number(0.5).unwrap(), "0.5");
        assert_eq!(format_number(100.0).unwrap(), "100");
        assert_eq!(format_number(-2.25).unwrap(), "-2.25");
        assert_eq!(format_number(0.1 + 0.2).unwrap().parse::<f64>().unwrap(), 0.1 + 0.2);
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let document = FunctionsDocument {
            transfer: None,
            functions: vec![FunctionRecord::Gaussian {
                mean: f64::NAN,
                sigma: 1.0,
                multiplier: 1.0,
            }],
        };
        assert!(write_functions(&document).is_err());
    }

    #[test]
    fn test_empty_document_writes_bare_element() {
        let xml = write_functions(&FunctionsDocument::default()).unwrap();
        assert!(xml.contains("<functions>"));
        assert!(!xml.contains("<transfer>"));
    }
}
