//! Schnittstelle zum externen Farbwähler.

use crate::core::Rgb;

/// Synchroner Farbwähler: liefert die gewählte Farbe oder `None` bei Abbruch.
pub trait ColorPicker {
    /// Zeigt den Wähler mit `current` als Startfarbe.
    fn pick_color(&mut self, current: Rgb) -> Option<Rgb>;
}

impl<F> ColorPicker for F
where
    F: FnMut(Rgb) -> Option<Rgb>,
{
    fn pick_color(&mut self, current: Rgb) -> Option<Rgb> {
        self(current)
    }
}

/// Wähler ohne Benutzerinteraktion: übernimmt die Startfarbe unverändert.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepColor;

impl ColorPicker for KeepColor {
    fn pick_color(&mut self, current: Rgb) -> Option<Rgb> {
        Some(current)
    }
}
