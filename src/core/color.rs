//! RGB-Farbe mit Kanälen im Bereich 0.0..=1.0.

use serde::{Deserialize, Serialize};

/// RGB-Farbe (Kanäle normiert auf 0.0..=1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Rot-Anteil
    pub r: f64,
    /// Grün-Anteil
    pub g: f64,
    /// Blau-Anteil
    pub b: f64,
}

impl Rgb {
    /// Schwarz (Startfarbe einer zurückgesetzten Transferfunktion)
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    /// Weiß (Endfarbe einer zurückgesetzten Transferfunktion)
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    /// Erstellt eine Farbe aus drei Kanälen.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Erstellt eine Farbe aus 8-Bit-Kanälen.
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::new(
            f64::from(rgb[0]) / 255.0,
            f64::from(rgb[1]) / 255.0,
            f64::from(rgb[2]) / 255.0,
        )
    }

    /// Lineare Mischung: `weight = 0` → `self`, `weight = 1` → `other`.
    pub fn lerp(self, other: Rgb, weight: f64) -> Rgb {
        let inv = 1.0 - weight;
        Rgb::new(
            self.r * inv + other.r * weight,
            self.g * inv + other.g * weight,
            self.b * inv + other.b * weight,
        )
    }

    /// `true` wenn ein Kanal negativ ist (Sentinel für "aus Verlauf interpolieren").
    pub fn is_sentinel(&self) -> bool {
        self.r < 0.0 || self.g < 0.0 || self.b < 0.0
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}
