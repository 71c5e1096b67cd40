//! Interaktive Transferfunktion: gepaarte Opazitäts- und Farb-Stützstellen.
//!
//! Invarianten:
//! - Opazitäts- und Farbliste sind gleich lang und teilen x
//! - x ist streng aufsteigend
//! - erster/letzter Knoten liegen auf den Bereichsgrenzen (x fix, y/Farbe änderbar)
//! - es existieren immer mindestens 2 Knoten

use super::color_picker::ColorPicker;
use super::notify::ChangeNotifier;
use crate::core::{map_value, to_pixel, ChartView, Rgb, TransferNode, TransferNodes};
use glam::IVec2;


/// Relative Toleranz (bezogen auf den x-Bereich), ab der ein neuer Knoten
/// als Kollision mit einem bestehenden gilt.
const COLLISION_TOLERANCE: f64 = 1e-9;

/// Halbe Bin-Breite für diskrete Wertebereiche
const DISCRETE_X_OFFSET: f64 = 0.5;

/// Stützstelle des abgeleiteten Farbverlaufs (Position normiert auf 0..=1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position relativ zur gezoomten Chart-Breite
    pub position: f64,
    /// Farbe an dieser Position
    pub color: Rgb,
}

/// Primäre Funktion des Charts, immer an Listenposition 0.
#[derive(Debug)]
pub struct TransferFunction {
    nodes: TransferNodes,
    selected: Option<usize>,
    x_offset: f64,
    notifier: ChangeNotifier,
}

impl TransferFunction {
    /// Erstellt eine zurückgesetzte Transferfunktion über den Bereich des Charts.
    pub fn new(view: &ChartView) -> Self {
        let mut tf = Self {
            nodes: TransferNodes::new(),
            selected: None,
            x_offset: 0.0,
            notifier: ChangeNotifier::new(),
        };
        tf.reset(view);
        tf
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

    /// Gepaarte Stützstellen
    pub fn transfer_nodes(&self) -> &TransferNodes {
        &self.nodes
    }

    /// Alle Stützstellen kombiniert
    pub fn nodes(&self) -> Vec<TransferNode> {
        self.nodes.nodes()
    }

    /// Anzahl der Knoten
    pub fn num_points(&self) -> usize {
        self.nodes.len()
    }

    /// Aktuell selektierter Knoten
    pub fn selected_point(&self) -> Option<usize> {
        self.selected
    }

    /// Setzt die Selektion (ungültige Indizes heben sie auf).
    pub fn set_selected_point(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.nodes.len());
    }

    /// Halbe-Bin-Verschiebung für diskrete Wertebereiche an/aus.
    pub fn set_discrete(&mut self, discrete: bool) {
        self.x_offset = if discrete { DISCRETE_X_OFFSET } else { 0.0 };
    }

    /// `true` bei Index 0 oder dem letzten Knoten
    pub fn is_endpoint(&self, index: usize) -> bool {
        index == 0 || index + 1 == self.nodes.len()
    }

    /// Nur innere Knoten sind löschbar.
    pub fn is_deletable(&self, index: usize) -> bool {
        !self.is_endpoint(index)
    }

    /// Opazität an `x` (stückweise linear)
    pub fn opacity_at(&self, x: f64) -> f64 {
        self.nodes.opacity_at(x)
    }

    /// Farbe an `x` (stückweise linear)
    pub fn color_at(&self, x: f64) -> Rgb {
        self.nodes.color_at(x)
    }

    // ── Koordinaten ─────────────────────────────────────────────────

    fn data_to_pixel_x(&self, view: &ChartView, x: f64) -> f64 {
        view.data_to_pixel_x(x + self.x_offset)
    }

    fn pixel_to_data_x(&self, view: &ChartView, px: f64) -> f64 {
        view.pixel_to_data_x(px) - self.x_offset
    }

    /// Opazität → Pixel-y (unabhängig von der y-Abbildung des Charts)
    pub fn opacity_to_pixel_y(view: &ChartView, opacity: f64) -> i32 {
        to_pixel(opacity * f64::from(view.chart_height().max(0)))
    }

    /// Pixel-y → Opazität
    pub fn pixel_y_to_opacity(view: &ChartView, py: i32) -> f64 {
        f64::from(py) / f64::from(view.chart_height().max(1))
    }

    fn node_pixel(&self, view: &ChartView, index: usize) -> Option<IVec2> {
        let node = self.nodes.opacity_nodes().get(index)?;
        Some(IVec2::new(
            to_pixel(self.data_to_pixel_x(view, node.x)),
            Self::opacity_to_pixel_y(view, node.opacity),
        ))
    }

    fn check_consistency(&self, operation: &str) -> bool {
        if self.nodes.is_consistent() {
            return true;
        }
        log::error!(
            "Transferfunktion inkonsistent ({} Opazitaets-, {} Farbknoten), {} abgebrochen",
            self.nodes.opacity_nodes().len(),
            self.nodes.color_nodes().len(),
            operation
        );
        false
    }

    // ── Interaktion ─────────────────────────────────────────────────

    /// Sucht den Knoten unter `pixel` (erster Treffer gewinnt) und selektiert ihn.
    ///
    /// `x_hint` wird für jeden nicht getroffenen Knoten überschrieben: mit
    /// `pixel.x + 1`, falls er der Pixel-x des Knotens entsprach, sonst mit `pixel.x`.
    pub fn select_point(
        &mut self,
        view: &ChartView,
        pixel: IVec2,
        mut x_hint: Option<&mut i32>,
    ) -> Option<usize> {
        let mut index = None;
        for i in 0..self.nodes.len() {
            let Some(node_px) = self.node_pixel(view, i) else {
                break;
            };
            let radius = view.point_radius(self.selected == Some(i));
            let d = (pixel - node_px).abs();
            if d.x < radius && d.y < radius {
                index = Some(i);
                break;
            }
            if let Some(hint) = x_hint.as_deref_mut() {
                *hint = if *hint == node_px.x { pixel.x + 1 } else { pixel.x };
            }
        }
        self.selected = index;
        index
    }

    /// Fügt einen Knoten bei `pixel` ein und selektiert ihn.
    ///
    /// Liegt x auf einem bestehenden Knoten, wird dieser selektiert und die
    /// Knotenzahl bleibt gleich. Außerhalb des Wertebereichs: `None`.
    pub fn add_point(&mut self, view: &ChartView, pixel: IVec2) -> Option<usize> {
        if !self.check_consistency("Einfuegen") {
            return None;
        }
        let x = self.pixel_to_data_x(view, f64::from(pixel.x));
        let [x_min, x_max] = view.x_bounds();
        if !(x_min..=x_max).contains(&x) {
            log::debug!(
                "Kein Knoten bei {}: ausserhalb des Bereichs [{}, {}]",
                x,
                x_min,
                x_max
            );
            self.selected = None;
            return None;
        }
        let opacity = Self::pixel_y_to_opacity(view, pixel.y).clamp(0.0, 1.0);

        let tolerance = COLLISION_TOLERANCE * view.x_range().abs();
        if let Some(existing) = self.nodes.find_x(x, tolerance) {
            self.selected = Some(existing);
            return Some(existing);
        }

        let color = self.nodes.color_at(x);
        let index = self.nodes.insert(TransferNode { x, opacity, color });
        self.selected = Some(index);
        self.notifier.notify();
        Some(index)
    }

    /// Setzt die Farbe des zuletzt eingefügten (selektierten) Knotens.
    ///
    /// `None` oder ein negativer Kanal: Farbe aus den umgebenden Verlaufs-
    /// Stützstellen an `pixel_x` interpolieren.
    pub fn add_color_point(&mut self, view: &ChartView, pixel_x: i32, color: Option<Rgb>) {
        if !self.check_consistency("Farbknoten setzen") {
            return;
        }
        let Some(index) = self.selected else {
            log::debug!("Kein neuer Knoten selektiert, Farbe wird nicht gesetzt");
            return;
        };
        let color = match color {
            Some(c) if !c.is_sentinel() => c,
            _ => {
                let stops = self.gradient_stops_excluding(view, Some(index));
                let position = f64::from(pixel_x) / view.full_chart_width();
                interpolate_stops(&stops, position).unwrap_or_else(|| {
                    self.nodes
                        .color_at(self.pixel_to_data_x(view, f64::from(pixel_x)))
                })
            }
        };
        self.nodes.set_color(index, color);
        self.notifier.notify();
    }

    /// Entfernt einen inneren Knoten (Endpunkte und die letzten 2 Knoten bleiben).
    pub fn remove_point(&mut self, index: usize) -> bool {
        if !self.check_consistency("Entfernen") {
            return false;
        }
        if self.nodes.len() <= 2 || index >= self.nodes.len() || self.is_endpoint(index) {
            return false;
        }
        self.nodes.remove(index);
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
        self.notifier.notify();
        true
    }

    /// Verschiebt den selektierten Knoten nach `pixel`.
    ///
    /// Innere Knoten bleiben streng zwischen ihren Nachbarn, Endpunkte ändern
    /// nur die Opazität. Die Farbe bleibt erhalten.
    pub fn move_selected_point(&mut self, view: &ChartView, pixel: IVec2) {
        let Some(index) = self.selected else {
            return;
        };
        if index >= self.nodes.len() || !self.check_consistency("Verschieben") {
            return;
        }
        let px = pixel.x.clamp(0, (view.chart_width() - 1).max(0));
        let py = pixel.y.clamp(0, (view.chart_height() - 1).max(0));
        let opacity = Self::pixel_y_to_opacity(view, py);

        if self.is_endpoint(index) {
            self.nodes.set_opacity(index, opacity);
            self.notifier.notify();
            return;
        }

        let opacity_nodes = self.nodes.opacity_nodes();
        let prev_x = opacity_nodes[index - 1].x;
        let next_x = opacity_nodes[index + 1].x;
        let mut x = self.pixel_to_data_x(view, f64::from(px));
        if x >= next_x {
            let snapped = to_pixel(self.data_to_pixel_x(view, next_x)) - 1;
            x = self.pixel_to_data_x(view, f64::from(snapped));
        } else if x <= prev_x {
            let snapped = to_pixel(self.data_to_pixel_x(view, prev_x)) + 1;
            x = self.pixel_to_data_x(view, f64::from(snapped));
        }
        if !(x > prev_x && x < next_x) {
            // Nachbarn liegen weniger als 2 Pixel auseinander
            x = prev_x + (next_x - prev_x) * 0.5;
        }
        self.nodes.set_position(index, x, opacity);
        self.notifier.notify();
    }

    /// Ändert die Farbe des selektierten Knotens über den Farbwähler.
    ///
    /// Mit `pixel` wird vorher der Knoten darunter selektiert.
    pub fn change_color(
        &mut self,
        view: &ChartView,
        pixel: Option<IVec2>,
        picker: &mut dyn ColorPicker,
    ) -> bool {
        if let Some(pixel) = pixel {
            self.select_point(view, pixel, None);
        }
        let Some(index) = self.selected else {
            return false;
        };
        let Some(current) = self.nodes.node(index).map(|n| n.color) else {
            return false;
        };
        match picker.pick_color(current) {
            Some(color) => {
                self.nodes.set_color(index, color);
                self.notifier.notify();
                true
            }
            None => false,
        }
    }

    /// Abschluss eines neu eingefügten Knotens beim Loslassen.
    ///
    /// Der Farbwähler wird gezeigt; bei Abbruch wird ein innerer neuer Knoten
    /// wieder entfernt. Rückgabe: `true` wenn der Knoten erhalten bleibt.
    pub fn finish_new_point(&mut self, picker: &mut dyn ColorPicker) -> bool {
        let Some(index) = self.selected else {
            return false;
        };
        let Some(current) = self.nodes.node(index).map(|n| n.color) else {
            return false;
        };
        match picker.pick_color(current) {
            Some(color) => {
                self.nodes.set_color(index, color);
                self.notifier.notify();
                true
            }
            None => {
                if self.is_deletable(index) {
                    self.remove_point(index);
                    false
                } else {
                    true
                }
            }
        }
    }

    /// Genau 2 Knoten: (min, 0, schwarz) und (max, 1, weiß).
    pub fn reset(&mut self, view: &ChartView) {
        let [x_min, x_max] = view.x_bounds();
        self.nodes = TransferNodes::from_nodes(&[
            TransferNode {
                x: x_min,
                opacity: 0.0,
                color: Rgb::BLACK,
            },
            TransferNode {
                x: x_max,
                opacity: 1.0,
                color: Rgb::WHITE,
            },
        ]);
        self.selected = None;
        self.notifier.notify();
    }

    /// Skaliert alle Knoten von `old_bounds` in den aktuellen Bereich des Charts.
    pub fn translate_to_new_range(&mut self, view: &ChartView, old_bounds: [f64; 2]) {
        let new_bounds = view.x_bounds();
        if approx_equal(new_bounds[0], old_bounds[0]) && approx_equal(new_bounds[1], old_bounds[1]) {
            return;
        }
        if !self.check_consistency("Bereichswechsel") {
            return;
        }
        if (old_bounds[1] - old_bounds[0]).abs() < f64::EPSILON {
            log::warn!(
                "Alter Bereich [{}, {}] ist leer, Transferfunktion wird zurueckgesetzt",
                old_bounds[0],
                old_bounds[1]
            );
            self.reset(view);
            return;
        }
        for i in 0..self.nodes.len() {
            let old_x = self.nodes.opacity_nodes()[i].x;
            let x = map_value(old_bounds[0], old_bounds[1], new_bounds[0], new_bounds[1], old_x)
                .clamp(new_bounds[0], new_bounds[1]);
            self.nodes.set_x(i, x);
        }
        self.notifier.notify();
    }

    /// Übernimmt Knoten (z.B. aus einer Datei) und stellt die Invarianten her.
    ///
    /// x wird auf den Bereich geklemmt, Duplikate zusammengefasst, die Endknoten
    /// auf die Bereichsgrenzen gesetzt. Weniger als 2 Knoten: Reset.
    pub fn set_nodes(&mut self, view: &ChartView, nodes: &[TransferNode]) {
        let [x_min, x_max] = view.x_bounds();
        let clamped: Vec<TransferNode> = nodes
            .iter()
            .map(|n| TransferNode {
                x: n.x.clamp(x_min, x_max),
                opacity: n.opacity.clamp(0.0, 1.0),
                color: n.color,
            })
            .collect();
        let mut merged = TransferNodes::from_nodes(&clamped);
        if merged.len() < 2 {
            log::warn!(
                "Transferfunktion mit {} Knoten ungueltig, wird zurueckgesetzt",
                merged.len()
            );
            self.reset(view);
            return;
        }
        let last = merged.len() - 1;
        merged.set_x(0, x_min);
        merged.set_x(last, x_max);
        self.nodes = merged;
        self.selected = None;
        self.notifier.notify();
    }

    /// Abgeleiteter Farbverlauf über die gezoomte Chart-Breite.
    pub fn gradient_stops(&self, view: &ChartView) -> Vec<GradientStop> {
        self.gradient_stops_excluding(view, None)
    }

    fn gradient_stops_excluding(&self, view: &ChartView, skip: Option<usize>) -> Vec<GradientStop> {
        let width = view.full_chart_width();
        self.nodes
            .color_nodes()
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .map(|(_, node)| GradientStop {
                position: (self.data_to_pixel_x(view, node.x) / width).clamp(0.0, 1.0),
                color: node.color,
            })
            .collect()
    }
}

/// Interpoliert zwischen den beiden Stützstellen um `position`.
///
/// Fallen beide Stützstellen zusammen, erhält die spätere Gewicht 1.
fn interpolate_stops(stops: &[GradientStop], position: f64) -> Option<Rgb> {
    if stops.is_empty() {
        return None;
    }
    let upper = stops
        .iter()
        .position(|s| s.position >= position)
        .unwrap_or(stops.len());
    let first = stops[upper.saturating_sub(1)];
    let second = stops[upper.min(stops.len() - 1)];
    let weight = if second.position == first.position {
        1.0
    } else {
        (position - first.position) / (second.position - first.position)
    };
    Some(first.color.lerp(second.color, weight))
}

fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
}
