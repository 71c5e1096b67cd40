//! Stückweise kubische Bézier-Kurve als Hilfsfunktion im Chart.
//!
//! Punktfolge: Index `i` ist Ankerpunkt (auf der Kurve) genau dann, wenn
//! `i % 3 == 0`; alle anderen sind Tangenten-Griffe des nächsten Ankers.
//! Länge ≡ 1 (mod 3), mindestens 4. Erster und letzter Punkt sind Endpunkte.

mod drag;
#[cfg(test)]
mod tests;

use super::notify::ChangeNotifier;
use crate::core::geometry::cubic_bezier;
use crate::core::{ChartView, Rgb};
use crate::shared::CONTROL_DISTANCE_DIVISOR;
use glam::{DVec2, IVec2};

/// Kurvenpunkt: echter Wert plus auf den sichtbaren Bereich geklemmte Ansicht.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierPoint {
    /// Definierender Wert
    pub value: DVec2,
    /// Position zum Zeichnen/Picken (innerhalb des sichtbaren Rechtecks)
    pub view: DVec2,
}

impl BezierPoint {
    fn new(value: DVec2) -> Self {
        Self { value, view: value }
    }
}

/// Bézier-Hilfsfunktion
#[derive(Debug)]
pub struct BezierCurve {
    points: Vec<BezierPoint>,
    selected: Option<usize>,
    /// Abstand neuer Steuerpunkte vom Anker (Dateneinheiten, ohne Zoom)
    control_distance: f64,
    color: Rgb,
    notifier: ChangeNotifier,
}

/// Index des Ankers, zu dem `index` gehört.
pub fn anchor_index(index: usize) -> usize {
    match index % 3 {
        1 => index - 1,
        2 => index + 1,
        _ => index,
    }
}

/// Index des gegenüberliegenden Griffs am selben Anker (nur für Griffe).
pub fn opposite_index(index: usize) -> Option<usize> {
    match index % 3 {
        1 => index.checked_sub(2),
        2 => Some(index + 2),
        _ => None,
    }
}

/// `true` für Ankerpunkte
pub fn is_anchor(index: usize) -> bool {
    index % 3 == 0
}

impl BezierCurve {
    /// Erstellt eine zurückgesetzte Kurve (ein Segment über den ganzen Bereich).
    pub fn new(view: &ChartView, color: Rgb) -> Self {
        let mut curve = Self::empty(view, color);
        curve.reset(view);
        curve
    }

    /// Erstellt eine Kurve ohne Punkte (zum Befüllen per `push_back`).
    pub fn empty(view: &ChartView, color: Rgb) -> Self {
        Self {
            points: Vec::new(),
            selected: None,
            control_distance: view.x_range() / CONTROL_DISTANCE_DIVISOR,
            color,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Setzt den Steuerpunkt-Abstand aus Bereich und Divisor neu.
    pub fn set_control_distance_divisor(&mut self, view: &ChartView, divisor: f64) {
        if divisor > 0.0 {
            self.control_distance = view.x_range() / divisor;
        } else {
            log::warn!("Steuerpunkt-Divisor {} ungueltig, ignoriert", divisor);
        }
    }

    // ── Zugriff ─────────────────────────────────────────────────────

    /// Änderungs-Benachrichtigung (für den Host)
    pub fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        &mut self.notifier
    }

    /// Anzahl gemeldeter Änderungen
    pub fn revision(&self) -> u64 {
        self.notifier.revision()
    }

    /// Alle Punkte (Wert + Ansicht)
    pub fn bezier_points(&self) -> &[BezierPoint] {
        &self.points
    }

    /// Definierende Werte aller Punkte (für die Persistenz)
    pub fn points(&self) -> Vec<DVec2> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Anzahl aller Punkte (Anker und Griffe)
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Anzahl der Ankerpunkte
    pub fn num_anchors(&self) -> usize {
        (self.points.len() + 2) / 3
    }

    /// Aktuell selektierter Punkt
    pub fn selected_point(&self) -> Option<usize> {
        self.selected
    }

    /// Setzt die Selektion (ungültige Indizes heben sie auf).
    pub fn set_selected_point(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.points.len());
    }

    /// Zeichenfarbe
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Steuerpunkt-Abstand in Dateneinheiten
    pub fn control_distance(&self) -> f64 {
        self.control_distance
    }

    /// Anzeigename, z.B. "Bezier (3 points)"
    pub fn name(&self) -> String {
        format!("Bezier ({} points)", self.num_anchors())
    }

    /// `true` für den ersten und letzten Punkt
    pub fn is_endpoint(&self, index: usize) -> bool {
        index == 0 || index + 1 == self.points.len()
    }

    /// Nur innere Ankerpunkte sind löschbar.
    pub fn is_deletable(&self, index: usize) -> bool {
        is_anchor(index) && !self.is_endpoint(index) && index + 1 < self.points.len()
    }

    // ── Struktur ────────────────────────────────────────────────────

    /// Ein Segment bei y = 0, Steuerpunkte um den Steuerpunkt-Abstand eingerückt.
    pub fn reset(&mut self, view: &ChartView) {
        let [start, end] = view.x_bounds();
        self.points = vec![
            BezierPoint::new(DVec2::new(start, 0.0)),
            BezierPoint::new(DVec2::new(start + self.control_distance, 0.0)),
            BezierPoint::new(DVec2::new(end - self.control_distance, 0.0)),
            BezierPoint::new(DVec2::new(end, 0.0)),
        ];
        self.selected = None;
        self.notifier.notify();
    }

    /// Hängt einen Punkt an (Laden aus Datei).
    pub fn push_back(&mut self, x: f64, y: f64) {
        self.points.push(BezierPoint::new(DVec2::new(x, y)));
    }

    /// Sucht den Punkt unter `pixel` (erster Treffer gewinnt) und selektiert ihn.
    ///
    /// Punkte des selektierten Tripels haben den größeren Radius, Griffe den
    /// halben. `x_hint` wird wie bei der Transferfunktion fortgeschrieben.
    pub fn select_point(
        &mut self,
        view: &ChartView,
        pixel: IVec2,
        mut x_hint: Option<&mut i32>,
    ) -> Option<usize> {
        let selection_center = self.selected.map(|s| ((s + 1) / 3) * 3);
        let mut index = None;
        for (i, point) in self.points.iter().enumerate() {
            let in_selected_triple = selection_center.is_some_and(|c| i.abs_diff(c) <= 1);
            let divisor = if is_anchor(i) { 1 } else { 2 };
            let radius = view.point_radius(in_selected_triple) / divisor;
            let point_px = view.data_to_pixel_rounded(point.view);
            let d = (pixel - point_px).abs();
            if d.x <= radius && d.y <= radius {
                index = Some(i);
                break;
            }
            if let Some(hint) = x_hint.as_deref_mut() {
                *hint = if *hint == point_px.x { pixel.x + 1 } else { pixel.x };
            }
        }

        self.selected = index;
        index
    }

    /// Fügt ein Tripel (Griff, Anker, Griff) bei `pixel` ein; Rückgabe: Ankerindex.
    ///
    /// Eingefügt wird vor dem ersten Anker mit größerem x, aber nie vor dem
    /// ersten oder hinter dem letzten Anker.
    pub fn add_point(&mut self, view: &ChartView, pixel: IVec2) -> Option<usize> {
        if self.points.len() < 4 {
            self.reset(view);
            self.selected = Some(0);
            return Some(0);
        }
        let value = view.pixel_to_data(pixel.as_dvec2());
        let anchors = self.num_anchors();
        let k = (0..anchors)
            .find(|&a| self.points[a * 3].value.x > value.x)
            .unwrap_or(anchors)
            .clamp(1, anchors - 1);

        let offset = DVec2::new(self.control_distance / view.x_zoom(), 0.0);
        let triple = [
            BezierPoint::new(value - offset),
            BezierPoint::new(value),
            BezierPoint::new(value + offset),
        ];
        let at = k * 3 - 1;
        self.points.splice(at..at, triple);

        let anchor = k * 3;
        self.selected = Some(anchor);
        self.notifier.notify();
        Some(anchor)
    }

    /// Entfernt das Tripel um einen löschbaren Anker; sonst no-op.
    pub fn remove_point(&mut self, index: usize) -> bool {
        if !self.is_deletable(index) {
            return false;
        }
        self.points.drain(index - 1..=index + 1);
        self.selected = match self.selected {
            Some(s) if s.abs_diff(index) <= 1 => None,
            Some(s) if s > index => Some(s - 3),
            other => other,
        };
        self.notifier.notify();
        true
    }

    // ── Auswertung ──────────────────────────────────────────────────

    /// Tastet jedes Segment mit `steps` Schritten ab (Wertebereich).
    pub fn sample(&self, steps: usize) -> Vec<DVec2> {
        let steps = steps.max(1);
        let mut samples = Vec::with_capacity((self.points.len() / 3) * steps + 1);
        let mut start = 0;
        while start + 3 < self.points.len() {
            let [p0, p1, p2, p3] = [start, start + 1, start + 2, start + 3].map(|i| self.points[i].value);
            for s in 0..steps {
                let t = s as f64 / steps as f64;
                samples.push(cubic_bezier(p0, p1, p2, p3, t));
            }
            start += 3;
        }
        if start > 0 {
            samples.push(self.points[start].value);
        }
        samples
    }

    /// Pixelpositionen aller Ansichtspunkte (gerundet)
    pub fn view_pixels(&self, view: &ChartView) -> Vec<IVec2> {
        self.points
            .iter()
            .map(|p| view.data_to_pixel_rounded(p.view))
            .collect()
    }
}

/// Abstand zweier Wertepunkte in Pixeln
pub(crate) fn pixel_length(view: &ChartView, a: DVec2, b: DVec2) -> f64 {
    (view.data_to_pixel(b) - view.data_to_pixel(a)).length()
}
