//! Gauss-Kurve als Hilfsfunktion: drei Parameter, drei logische Griffe.
//!
//! Griffe (nicht gespeichert, bei Bedarf berechnet):
//! - 0: Scheitel bei (mean, Peak-Höhe)
//! - 1: linker Sigma-Griff bei mean − 2σ
//! - 2: rechter Sigma-Griff bei mean + 2σ

use super::notify::ChangeNotifier;
use crate::core::geometry::{gaussian, SQRT_TWO_PI};
use crate::core::{to_pixel, ChartView, Rgb};
use glam::{DVec2, IVec2};

/// Griff-Index des Scheitels
pub const PEAK: usize = 0;
/// Griff-Index des linken Sigma-Griffs
pub const LEFT_SIGMA: usize = 1;
/// Griff-Index des rechten Sigma-Griffs
pub const RIGHT_SIGMA: usize = 2;

/// Abstand der Sigma-Griffe vom Mittelwert in Vielfachen von Sigma
const HANDLE_SIGMAS: f64 = 2.0;
/// Bereich um den Mittelwert (in Sigma), der fein abgetastet wird
const FINE_SAMPLING_SIGMAS: f64 = 3.0;
/// Obergrenze der Stützstellen pro Abtastung
const MAX_SAMPLES: usize = 100_000;

/// Gauss-Hilfsfunktion
#[derive(Debug)]
pub struct GaussianCurve {
    mean: f64,
    sigma: f64,
    multiplier: f64,
    selected: Option<usize>,
    color: Rgb,
    notifier: ChangeNotifier,
}

impl GaussianCurve {
    /// Erstellt eine Kurve mit allen Parametern auf 0 (vor Benutzung setzen).
    pub fn new(color: Rgb) -> Self {
        Self {
            mean: 0.0,
            sigma: 0.0,
            multiplier: 0.0,
            selected: None,
            color,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Erstellt eine Kurve mit gesetzten Parametern.
    pub fn with_parameters(color: Rgb, mean: f64, sigma: f64, multiplier: f64) -> Self {
        let mut curve = Self::new(color);
        curve.mean = mean;
        curve.sigma = sigma;
        curve.multiplier = multiplier;
        curve
    }

    /// Änderungs-Benachrichtigung (für den Host)
    pub fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        &mut self.notifier
    }

    /// Anzahl gemeldeter Änderungen
    pub fn revision(&self) -> u64 {
        self.notifier.revision()
    }

    /// Mittelwert (Lage des Maximums)
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Standardabweichung
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Flächenfaktor (Integral der Kurve)
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Setzt den Mittelwert und meldet die Änderung.
    pub fn set_mean(&mut self, mean: f64) {
        self.mean = mean;
        self.notifier.notify();
    }

    /// Setzt die Standardabweichung und meldet die Änderung.
    pub fn set_sigma(&mut self, sigma: f64) {
        self.sigma = sigma;
        self.notifier.notify();
    }

    /// Setzt den Flächenfaktor und meldet die Änderung.
    pub fn set_multiplier(&mut self, multiplier: f64) {
        self.multiplier = multiplier;
        self.notifier.notify();
    }

    /// Zeichenfarbe
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Aktuell selektierter Griff
    pub fn selected_point(&self) -> Option<usize> {
        self.selected
    }

    /// Setzt die Selektion (nur 0..3 gültig).
    pub fn set_selected_point(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < 3);
    }

    /// Konstant 3 logische Griffe
    pub fn num_points(&self) -> usize {
        3
    }

    /// Alle Griffe gelten als Endpunkte.
    pub fn is_endpoint(&self, _index: usize) -> bool {
        true
    }

    /// Nichts ist strukturell löschbar.
    pub fn is_deletable(&self, _index: usize) -> bool {
        false
    }

    /// Anzeigename mit Parametern
    pub fn name(&self) -> String {
        format!(
            "Gaussian (mean: {}, sigma: {}, multiplier: {})",
            self.mean, self.sigma, self.multiplier
        )
    }

    /// Setzt alle Parameter auf 0.
    pub fn reset(&mut self) {
        self.mean = 0.0;
        self.sigma = 0.0;
        self.multiplier = 0.0;
        self.selected = None;
        self.notifier.notify();
    }

    /// Skalierte Normalverteilungsdichte an `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        gaussian(x, self.mean, self.sigma, self.multiplier)
    }

    /// Funktionswert am Mittelwert: `multiplier / (sigma · √(2π))`
    pub fn peak_value(&self) -> f64 {
        self.evaluate(self.mean)
    }

    /// Wertepositionen der drei Griffe (Index = Griff-Index)
    pub fn handle_positions(&self) -> [DVec2; 3] {
        let peak = self.peak_value();
        let offset = HANDLE_SIGMAS * self.sigma;
        [
            DVec2::new(self.mean, peak),
            DVec2::new(self.mean - offset, peak),
            DVec2::new(self.mean + offset, peak),
        ]
    }

    /// Prüft linken, rechten Sigma-Griff (halber Radius) und dann den Scheitel.
    pub fn select_point(&mut self, view: &ChartView, pixel: IVec2) -> Option<usize> {
        let radius = view.point_radius(self.selected.is_some());
        let handles = self.handle_positions();
        let hit = |index: usize, r: i32| {
            let d = (pixel - view.data_to_pixel_rounded(handles[index])).abs();
            d.x <= r && d.y <= r
        };
        let index = [(LEFT_SIGMA, radius / 2), (RIGHT_SIGMA, radius / 2), (PEAK, radius)]
            .into_iter()
            .find(|&(index, r)| hit(index, r))
            .map(|(index, _)| index);
        self.selected = index;
        index
    }

    /// Gauss-Kurven haben keine einfügbaren Punkte.
    pub fn add_point(&mut self) -> Option<usize> {
        None
    }

    /// Verschiebt den selektierten Griff nach `pixel`.
    ///
    /// Scheitel: Mittelwert folgt x (auf den Bereich geklemmt). Sigma-Griff:
    /// `sigma = |mean − x| / 2`. In beiden Fällen wird der Multiplikator so
    /// gesetzt, dass die Peak-Höhe dem Pixel-y entspricht.
    pub fn move_selected_point(&mut self, view: &ChartView, pixel: IVec2) {
        let Some(selected) = self.selected else {
            return;
        };
        let max_x = to_pixel(view.full_chart_width() - 1.0).max(0);
        let px = pixel.x.clamp(0, max_x);
        let py = pixel.y.clamp(0, view.max_pixel_y().max(0));
        let data_x = view.pixel_to_data_x(f64::from(px));

        if selected == PEAK {
            let [x_min, x_max] = view.x_bounds();
            self.mean = data_x.clamp(x_min, x_max);
        } else {
            let mut sigma = (self.mean - data_x).abs() / HANDLE_SIGMAS;
            if sigma <= f64::EPSILON {
                let neighbour_x = view.pixel_to_data_x(f64::from(px + 1));
                sigma = (self.mean - neighbour_x).abs() / HANDLE_SIGMAS;
            }
            self.sigma = sigma;
        }
        self.multiplier = view.pixel_to_data_y(f64::from(py)) * self.sigma * SQRT_TWO_PI;
        self.notifier.notify();
    }

    /// Abtastung über den x-Bereich: fein nahe dem Mittelwert, grob in den Ausläufern.
    pub fn sample(&self, view: &ChartView) -> Vec<DVec2> {
        let [x_min, x_max] = view.x_bounds();
        let pixel_step = view.x_range() / view.full_chart_width().max(1.0);
        let coarse = pixel_step * 4.0;
        let fine = if self.sigma > f64::EPSILON {
            (self.sigma / 10.0).min(pixel_step).max(pixel_step / 64.0)
        } else {
            coarse
        };
        let near = FINE_SAMPLING_SIGMAS * self.sigma.abs();

        let mut samples = Vec::new();
        let mut x = x_min;
        while x < x_max && samples.len() < MAX_SAMPLES {
            samples.push(DVec2::new(x, self.evaluate(x)));
            x += if (x - self.mean).abs() <= near { fine } else { coarse };
        }
        samples.push(DVec2::new(x_max, self.evaluate(x_max)));
        samples
    }
}
