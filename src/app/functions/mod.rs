//! Editierbare Chart-Funktionen als geschlossener Summentyp.
//!
//! Jede Operation erhält den Host-Chart (`ChartView`) pro Aufruf; die
//! Funktionen halten keine Referenz auf ihn.

pub mod bezier;
pub mod color_picker;
pub mod gaussian;
pub mod notify;
pub mod transfer;

pub use bezier::{BezierCurve, BezierPoint};
pub use color_picker::{ColorPicker, KeepColor};
pub use gaussian::GaussianCurve;
pub use notify::ChangeNotifier;
pub use transfer::{GradientStop, TransferFunction};

use crate::core::{ChartView, Rgb};
use glam::IVec2;

/// Eine Funktion im Chart: Transferfunktion, Bézier- oder Gauss-Kurve.
#[derive(Debug)]
pub enum ChartFunction {
    Transfer(TransferFunction),
    Bezier(BezierCurve),
    Gaussian(GaussianCurve),
}

impl ChartFunction {
    /// Selektiert den Punkt unter `pixel`; `x_hint` siehe `TransferFunction::select_point`.
    pub fn select_point(
        &mut self,
        view: &ChartView,
        pixel: IVec2,
        x_hint: Option<&mut i32>,
    ) -> Option<usize> {
        match self {
            Self::Transfer(f) => f.select_point(view, pixel, x_hint),
            Self::Bezier(f) => f.select_point(view, pixel, x_hint),
            Self::Gaussian(f) => f.select_point(view, pixel),
        }
    }

    /// Fügt einen Punkt bei `pixel` ein (Gauss: nie).
    pub fn add_point(&mut self, view: &ChartView, pixel: IVec2) -> Option<usize> {
        match self {
            Self::Transfer(f) => f.add_point(view, pixel),
            Self::Bezier(f) => f.add_point(view, pixel),
            Self::Gaussian(f) => f.add_point(),
        }
    }

    /// Setzt die Farbe eines neuen Knotens (nur Transferfunktion).
    pub fn add_color_point(&mut self, view: &ChartView, pixel_x: i32, color: Option<Rgb>) {
        if let Self::Transfer(f) = self {
            f.add_color_point(view, pixel_x, color);
        }
    }

    /// Entfernt einen Punkt; `false` wenn nichts passiert ist.
    pub fn remove_point(&mut self, index: usize) -> bool {
        match self {
            Self::Transfer(f) => f.remove_point(index),
            Self::Bezier(f) => f.remove_point(index),
            Self::Gaussian(_) => false,
        }
    }

    /// Verschiebt den selektierten Punkt an die Pixelposition.
    pub fn move_selected_point(&mut self, view: &ChartView, pixel: IVec2) {
        match self {
            Self::Transfer(f) => f.move_selected_point(view, pixel),
            Self::Bezier(f) => f.move_selected_point(view, pixel),
            Self::Gaussian(f) => f.move_selected_point(view, pixel),
        }
    }

    /// `true` für den ersten oder letzten Punkt der Funktion
    pub fn is_endpoint(&self, index: usize) -> bool {
        match self {
            Self::Transfer(f) => f.is_endpoint(index),
            Self::Bezier(f) => f.is_endpoint(index),
            Self::Gaussian(f) => f.is_endpoint(index),
        }
    }

    /// `true` wenn der Punkt entfernt werden darf
    pub fn is_deletable(&self, index: usize) -> bool {
        match self {
            Self::Transfer(f) => f.is_deletable(index),
            Self::Bezier(f) => f.is_deletable(index),
            Self::Gaussian(f) => f.is_deletable(index),
        }
    }

    /// Setzt die Funktion in ihren Grundzustand zurück.
    pub fn reset(&mut self, view: &ChartView) {
        match self {
            Self::Transfer(f) => f.reset(view),
            Self::Bezier(f) => f.reset(view),
            Self::Gaussian(f) => f.reset(),
        }
    }

    /// Anzahl der editierbaren Punkte
    pub fn num_points(&self) -> usize {
        match self {
            Self::Transfer(f) => f.num_points(),
            Self::Bezier(f) => f.num_points(),
            Self::Gaussian(f) => f.num_points(),
        }
    }

    /// Aktuell selektierter Punkt
    pub fn selected_point(&self) -> Option<usize> {
        match self {
            Self::Transfer(f) => f.selected_point(),
            Self::Bezier(f) => f.selected_point(),
            Self::Gaussian(f) => f.selected_point(),
        }
    }

    /// Setzt die Selektion (ungültige Indizes heben sie auf).
    pub fn set_selected_point(&mut self, index: Option<usize>) {
        match self {
            Self::Transfer(f) => f.set_selected_point(index),
            Self::Bezier(f) => f.set_selected_point(index),
            Self::Gaussian(f) => f.set_selected_point(index),
        }
    }

    /// Anzeigename für Menüs und Logs
    pub fn name(&self) -> String {
        match self {
            Self::Transfer(_) => "Transfer Function".to_string(),
            Self::Bezier(f) => f.name(),
            Self::Gaussian(f) => f.name(),
        }
    }

    /// `true` wenn die Punkte eigene Farben tragen
    pub fn is_colored(&self) -> bool {
        matches!(self, Self::Transfer(_))
    }

    /// Loslassen nach dem Einfügen eines neuen Punkts.
    ///
    /// Transferfunktion: Farbwähler, bei Abbruch wird der Knoten entfernt.
    pub fn finish_new_point(&mut self, picker: &mut dyn ColorPicker) {
        if let Self::Transfer(f) = self {
            f.finish_new_point(picker);
        }
    }

    /// Loslassen nach jedem Drag.
    pub fn finish_drag(&mut self, view: &ChartView) {
        if let Self::Bezier(f) = self {
            f.finish_drag(view);
        }
    }

    /// Farbe des selektierten Punkts ändern (nur Transferfunktion).
    pub fn change_color(
        &mut self,
        view: &ChartView,
        pixel: Option<IVec2>,
        picker: &mut dyn ColorPicker,
    ) -> bool {
        match self {
            Self::Transfer(f) => f.change_color(view, pixel, picker),
            _ => false,
        }
    }

    /// Änderungs-Benachrichtigung der Funktion
    pub fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        match self {
            Self::Transfer(f) => f.notifier_mut(),
            Self::Bezier(f) => f.notifier_mut(),
            Self::Gaussian(f) => f.notifier_mut(),
        }
    }

    /// Anzahl gemeldeter Änderungen
    pub fn revision(&self) -> u64 {
        match self {
            Self::Transfer(f) => f.revision(),
            Self::Bezier(f) => f.revision(),
            Self::Gaussian(f) => f.revision(),
        }
    }

    pub fn as_transfer(&self) -> Option<&TransferFunction> {
        match self {
            Self::Transfer(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_transfer_mut(&mut self) -> Option<&mut TransferFunction> {
        match self {
            Self::Transfer(f) => Some(f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ChartView {
        ChartView::new([0.0, 100.0], [0.0, 1.0], 100, 101)
    }

    #[test]
    fn test_remove_endpoint_is_noop_for_all_variants() {
        let view = view();
        let mut functions = vec![
            ChartFunction::Transfer(TransferFunction::new(&view)),
            ChartFunction::Bezier(BezierCurve::new(&view, Rgb::BLACK)),
            ChartFunction::Gaussian(GaussianCurve::with_parameters(Rgb::BLACK, 50.0, 5.0, 1.0)),
        ];
        for function in &mut functions {
            let count = function.num_points();
            let last = count - 1;
            assert!(!function.remove_point(0), "{}", function.name());
            assert!(!function.remove_point(last), "{}", function.name());
            assert_eq!(function.num_points(), count);
        }
    }

    #[test]
    fn test_only_transfer_is_colored() {
        let view = view();
        assert!(ChartFunction::Transfer(TransferFunction::new(&view)).is_colored());
        assert!(!ChartFunction::Bezier(BezierCurve::new(&view, Rgb::BLACK)).is_colored());
    }

    #[test]
    fn test_gaussian_add_point_is_rejected() {
        let view = view();
        let mut function = ChartFunction::Gaussian(GaussianCurve::new(Rgb::BLACK));
        assert_eq!(function.add_point(&view, glam::IVec2::new(10, 10)), None);
    }
}
