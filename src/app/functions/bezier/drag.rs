//! Drag-Logik der Bézier-Kurve: Anker verschieben, Tangenten spiegeln,
//! Ansichtspunkte auf den sichtbaren Bereich klemmen.

use super::{anchor_index, is_anchor, opposite_index, pixel_length, BezierCurve};
use crate::core::geometry::unit_or_zero;
use crate::core::ChartView;
use glam::{DVec2, IVec2};

impl BezierCurve {
    /// Verschiebt den selektierten Punkt nach `pixel`.
    ///
    /// Anker werden auf den Chart geklemmt (Endpunkte bleiben bei y = 0) und
    /// nehmen ihre Griffe mit. Ein Griff verschiebt nur sich selbst; der
    /// gegenüberliegende Griff wird durch den Anker gespiegelt.
    pub fn move_selected_point(&mut self, view: &ChartView, pixel: IVec2) {
        let Some(selected) = self.selected else {
            return;
        };
        let anchor = anchor_index(selected);
        if selected >= self.points.len() || anchor >= self.points.len() {
            return;
        }

        let mut pixel = pixel.as_dvec2();
        let selected_is_anchor = is_anchor(selected);
        if selected_is_anchor {
            let max_x = (view.full_chart_width() - 1.0).max(0.0);
            let max_y = f64::from(view.max_pixel_y().max(0));
            pixel = DVec2::new(pixel.x.clamp(0.0, max_x), pixel.y.clamp(0.0, max_y));
            if self.is_endpoint(selected) {
                pixel.y = 0.0;
            }
        }

        // Abstand Ansicht ↔ Wert bleibt während des Drags erhalten
        let length = pixel_length(view, self.points[selected].view, self.points[selected].value);
        let direction = unit_or_zero(
            view.data_to_pixel(self.points[selected].view) - view.data_to_pixel(self.points[anchor].view),
        );
        let view_value = view.pixel_to_data(pixel);
        let value = view.pixel_to_data(pixel + direction * length);
        // Länge des Gegengriffs vor dem Schreiben messen
        let opposite_length = opposite_index(selected)
            .and_then(|o| self.points.get(o))
            .map(|o| pixel_length(view, self.points[anchor].value, o.value));

        if selected_is_anchor {
            let delta = value - self.points[selected].value;
            if selected > 0 {
                self.points[selected - 1].value += delta;
                self.set_view_point(view, selected - 1);
            }
            if selected + 1 < self.points.len() {
                self.points[selected + 1].value += delta;
                self.set_view_point(view, selected + 1);
            }
        }

        let point = &mut self.points[selected];
        point.value = value;
        point.view = view_value;

        if let Some(opposite_length) = opposite_length {
            self.mirror_opposite(view, selected, opposite_length);
        }
        self.notifier.notify();
    }

    /// Abschluss eines Drags: Ansichtspunkt des selektierten Punkts neu klemmen.
    pub fn finish_drag(&mut self, view: &ChartView) {
        if let Some(selected) = self.selected {
            self.set_view_point(view, selected);
        }
    }

    /// Berechnet alle Ansichtspunkte neu (z.B. nach Zoom oder Bereichswechsel).
    pub fn sync_view_points(&mut self, view: &ChartView) {
        for i in 0..self.points.len() {
            self.set_view_point(view, i);
        }
    }

    /// Spiegelt den Griff gegenüber von `selected` durch dessen Anker.
    ///
    /// Neue Position: `anker − einheit(griff − anker) · opposite_length` in Pixeln.
    fn mirror_opposite(&mut self, view: &ChartView, selected: usize, opposite_length: f64) {
        let anchor = anchor_index(selected);
        let Some(opposite) = opposite_index(selected).filter(|&o| o < self.points.len()) else {
            return;
        };

        let anchor_px = view.data_to_pixel(self.points[anchor].value);
        let handle_px = view.data_to_pixel(self.points[selected].value);
        let offset = handle_px - anchor_px;
        if offset.length() <= f64::EPSILON {
            return;
        }
        let mirrored_px = anchor_px - offset.normalize() * opposite_length;
        self.points[opposite].value = view.pixel_to_data(mirrored_px);
        self.set_view_point(view, opposite);
    }

    /// Klemmt den Ansichtspunkt von `index` auf das sichtbare Rechteck.
    ///
    /// Anker: Ansicht = Wert. Griffe außerhalb: Schnittpunkt der Strecke
    /// Anker → Griff mit dem Rand (vertikaler Rand vor horizontalem, nur t > 0).
    pub(super) fn set_view_point(&mut self, view: &ChartView, index: usize) {
        let Some(point) = self.points.get(index).copied() else {
            return;
        };
        let anchor = anchor_index(index);
        let Some(anchor_value) = self.points.get(anchor).map(|p| p.value) else {
            self.points[index].view = point.value;
            return;
        };
        if anchor == index {
            self.points[index].view = point.value;
            return;
        }
        self.points[index].view = clip_to_visible(view, anchor_value, point.value);
    }
}

/// Schneidet die Strecke `from → to` mit dem Rand des sichtbaren Rechtecks,
/// falls `to` außerhalb liegt.
pub(crate) fn clip_to_visible(view: &ChartView, from: DVec2, to: DVec2) -> DVec2 {
    let [x_min, x_max] = view.x_bounds();
    let y_min = view.y_bounds()[0];
    let y_max = view.visible_y_max();
    let inside = (x_min..=x_max).contains(&to.x) && (y_min..=y_max).contains(&to.y);
    if inside {
        return to;
    }

    let d = to - from;
    if (to.x < x_min || to.x > x_max) && d.x != 0.0 {
        let border_x = if to.x < x_min { x_min } else { x_max };
        let t = (border_x - from.x) / d.x;
        let y = from.y + t * d.y;
        if t > 0.0 && (y_min..=y_max).contains(&y) {
            return DVec2::new(border_x, y);
        }
    }
    if (to.y < y_min || to.y > y_max) && d.y != 0.0 {
        let border_y = if to.y < y_min { y_min } else { y_max };
        let t = (border_y - from.y) / d.y;
        let x = from.x + t * d.x;
        if t > 0.0 && (x_min..=x_max).contains(&x) {
            return DVec2::new(x, border_y);
        }
    }
    DVec2::new(to.x.clamp(x_min, x_max), to.y.clamp(y_min, y_max))
}
