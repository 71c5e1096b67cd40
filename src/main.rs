//! Chart Function Editor (Kommandozeile).
//!
//! Lädt eine Funktions-Datei in den Host-Chart, gibt Transferfunktion und
//! abgetastete Hilfsfunktionen aus und schreibt sie optional normalisiert zurück.

use anyhow::{Context, Result};
use chart_function_editor::core::geometry::SQRT_TWO_PI;
use chart_function_editor::{
    parse_functions, write_functions, ChartFunction, ChartOptions, ChartView, ChartWithFunctions,
    FunctionRecord, FunctionsDocument,
};
use std::path::{Path, PathBuf};

/// Standard-Wertebereich, wenn die Datei keine Transferfunktion enthält
const DEFAULT_X_BOUNDS: [f64; 2] = [0.0, 255.0];
/// Pixelgröße des virtuellen Charts
const CHART_SIZE: (i32, i32) = (512, 256);
/// Abtastschritte pro Bézier-Segment in der Ausgabe
const BEZIER_STEPS: usize = 4;

fn main() -> Result<()> {
    AppRunner::run()
}

struct AppRunner;

impl AppRunner {
    fn run() -> Result<()> {
        // Logger initialisieren
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!(
            "Chart Function Editor v{} startet...",
            env!("CARGO_PKG_VERSION")
        );

        let args: Vec<String> = std::env::args().skip(1).collect();
        let Some(input) = args.first().map(PathBuf::from) else {
            eprintln!("Aufruf: chart-function-editor <funktionen.xml> [ausgabe.xml]");
            return Ok(());
        };

        let options = ChartOptions::load_from_file(&ChartOptions::config_path());
        let document = Self::read_document(&input)?;
        let chart = Self::build_chart(&document, options);
        Self::print_summary(&chart);

        if let Some(output) = args.get(1).map(PathBuf::from) {
            let xml = write_functions(&chart.document())?;
            std::fs::write(&output, xml)
                .with_context(|| format!("Datei {} konnte nicht geschrieben werden", output.display()))?;
            log::info!("Funktionen gespeichert: {}", output.display());
        }
        Ok(())
    }

    fn read_document(path: &Path) -> Result<FunctionsDocument> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Datei {} konnte nicht gelesen werden", path.display()))?;
        let document = parse_functions(&content)
            .with_context(|| format!("Ungueltige Funktions-Datei {}", path.display()))?;
        log::info!(
            "{} geladen: {} Hilfsfunktionen",
            path.display(),
            document.functions.len()
        );
        Ok(document)
    }

    /// Wertebereich aus den Transferknoten, y-Bereich aus den Hilfsfunktionen.
    fn build_chart(document: &FunctionsDocument, options: ChartOptions) -> ChartWithFunctions {
        let x_bounds = document
            .transfer
            .as_ref()
            .and_then(|nodes| Some([nodes.first()?.x, nodes.last()?.x]))
            .filter(|[min, max]| max > min)
            .unwrap_or(DEFAULT_X_BOUNDS);

        let y_max = document
            .functions
            .iter()
            .map(|record| match record {
                FunctionRecord::Bezier(points) => {
                    points.iter().map(|p| p.y).fold(f64::MIN, f64::max)
                }
                FunctionRecord::Gaussian {
                    sigma, multiplier, ..
                } if sigma.abs() > f64::EPSILON => multiplier / (sigma.abs() * SQRT_TWO_PI),
                FunctionRecord::Gaussian { .. } => 0.0,
            })
            .fold(1.0, f64::max);

        let view = ChartView::new(x_bounds, [0.0, y_max], CHART_SIZE.0, CHART_SIZE.1);
        let mut chart = ChartWithFunctions::with_options(view, options);
        chart.load_document(document);
        chart
    }

    fn print_summary(chart: &ChartWithFunctions) {
        println!("Transferfunktion:");
        println!("{:>12} {:>8} {:>6} {:>6} {:>6}", "x", "opacity", "r", "g", "b");
        for node in chart.transfer_records() {
            println!(
                "{:>12.4} {:>8.4} {:>6.3} {:>6.3} {:>6.3}",
                node.x, node.opacity, node.color.r, node.color.g, node.color.b
            );
        }

        for function in &chart.functions()[1..] {
            println!();
            println!("{}:", function.name());
            match function {
                ChartFunction::Bezier(curve) => {
                    for point in curve.sample(BEZIER_STEPS) {
                        println!("{:>12.4} {:>12.6}", point.x, point.y);
                    }
                }
                ChartFunction::Gaussian(g) => {
                    println!(
                        "  mean={} sigma={} multiplier={} peak={:.6}",
                        g.mean(),
                        g.sigma(),
                        g.multiplier(),
                        g.peak_value()
                    );
                    println!("  {} Abtastpunkte", g.sample(chart.view()).len());
                }
                ChartFunction::Transfer(_) => {}
            }
        }
    }
}
