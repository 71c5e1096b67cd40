//! Zentrale Konfiguration für den Chart-Funktionseditor.
//!
//! `ChartOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Selektion ───────────────────────────────────────────────────────

/// Pick-Radius eines Punkts in Pixeln.
pub const POINT_RADIUS_PX: i32 = 4;
/// Pick-Radius eines selektierten Punkts in Pixeln.
pub const SELECTED_POINT_RADIUS_PX: i32 = 6;

// ── Kurven ──────────────────────────────────────────────────────────

/// Steuerpunkt-Abstand einer Bézier-Kurve = Datenbereich / Divisor.
pub const CONTROL_DISTANCE_DIVISOR: f64 = 8.0;
/// Breite einer neuen Gauss-Kurve: Sigma = Chart-Breite / Divisor (Pixel).
pub const GAUSSIAN_WIDTH_DIVISOR: f64 = 20.0;

// ── Achsen ──────────────────────────────────────────────────────────

/// Ersatz-Minimum der y-Achse im logarithmischen Modus, falls das Minimum ≤ 0 ist.
pub const LOG_Y_MIN: f64 = 1.0;

// ── Farben ──────────────────────────────────────────────────────────

/// Zeichenfarben der Zusatzfunktionen (zyklisch nach Listenposition).
pub const FUNCTION_COLORS: [[u8; 3]; 7] = [
    [0, 0, 0],
    [0, 128, 0],
    [0, 0, 255],
    [255, 0, 0],
    [128, 128, 0],
    [0, 128, 128],
    [128, 0, 128],
];

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Optionen.
/// Wird als `chart_function_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartOptions {
    // ── Selektion ───────────────────────────────────────────────
    /// Pick-Radius normaler Punkte (Pixel)
    pub point_radius_px: i32,
    /// Pick-Radius selektierter Punkte (Pixel)
    pub selected_point_radius_px: i32,

    // ── Kurven ──────────────────────────────────────────────────
    /// Divisor für den Bézier-Steuerpunkt-Abstand
    pub control_distance_divisor: f64,
    /// Divisor für die Startbreite neuer Gauss-Kurven
    #[serde(default = "default_gaussian_width_divisor")]
    pub gaussian_width_divisor: f64,

    // ── Achsen ──────────────────────────────────────────────────
    /// Ersatz-Minimum für logarithmische y-Achsen
    pub log_y_min: f64,

    // ── Farben ──────────────────────────────────────────────────
    /// Zeichenfarben der Zusatzfunktionen
    #[serde(default = "default_function_colors")]
    pub function_colors: Vec<[u8; 3]>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            point_radius_px: POINT_RADIUS_PX,
            selected_point_radius_px: SELECTED_POINT_RADIUS_PX,
            control_distance_divisor: CONTROL_DISTANCE_DIVISOR,
            gaussian_width_divisor: GAUSSIAN_WIDTH_DIVISOR,
            log_y_min: LOG_Y_MIN,
            function_colors: default_function_colors(),
        }
    }
}

/// Serde-Default für `gaussian_width_divisor` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_gaussian_width_divisor() -> f64 {
    GAUSSIAN_WIDTH_DIVISOR
}

fn default_function_colors() -> Vec<[u8; 3]> {
    FUNCTION_COLORS.to_vec()
}

impl ChartOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("chart_function_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("chart_function_editor.toml")
    }

    /// Zeichenfarbe für die Funktion an Listenposition `index`.
    pub fn function_color(&self, index: usize) -> [u8; 3] {
        if self.function_colors.is_empty() {
            return FUNCTION_COLORS[index % FUNCTION_COLORS.len()];
        }
        self.function_colors[index % self.function_colors.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_roundtrip() {
        let mut options = ChartOptions::default();
        options.point_radius_px = 7;
        options.log_y_min = 0.5;
        let text = toml::to_string_pretty(&options).expect("Serialisierung fehlgeschlagen");
        let parsed: ChartOptions = toml::from_str(&text).expect("Parsing fehlgeschlagen");
        assert_eq!(parsed, options);
    }

    #[test]
    fn test_save_and_load_file_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "chart_function_editor_options_{}.toml",
            std::process::id()
        ));
        let mut options = ChartOptions::default();
        options.selected_point_radius_px = 11;
        options.control_distance_divisor = 6.0;
        options.save_to_file(&path).expect("Speichern fehlgeschlagen");
        let loaded = ChartOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, options);
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let text = "point_radius_px = 5\nselected_point_radius_px = 8\ncontrol_distance_divisor = 4.0\nlog_y_min = 1.0\n";
        let parsed: ChartOptions = toml::from_str(text).expect("Parsing fehlgeschlagen");
        assert_eq!(parsed.gaussian_width_divisor, GAUSSIAN_WIDTH_DIVISOR);
        assert_eq!(parsed.function_colors.len(), FUNCTION_COLORS.len());
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("chart_function_editor_missing_options.toml");
        let _ = std::fs::remove_file(&path);
        assert_eq!(ChartOptions::load_from_file(&path), ChartOptions::default());
    }

    #[test]
    fn test_function_color_cycles() {
        let options = ChartOptions::default();
        assert_eq!(options.function_color(0), options.function_color(7));
    }
}
