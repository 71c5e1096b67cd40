//! Geometrie des Host-Charts: Wertebereiche, Pixelgröße, Zoom und Mapper.
//!
//! Pixel-Koordinaten sind chart-lokal, Ursprung unten links, y wächst nach oben.

use super::mapper::{CoordinateMapper, LinearMapper, LogarithmicMapper};
use crate::shared::options::{LOG_Y_MIN, POINT_RADIUS_PX, SELECTED_POINT_RADIUS_PX};
use crate::shared::ChartOptions;
use glam::{DVec2, IVec2};

/// Kleinste Chart-Höhe; die y-Zielspanne `höhe − 1` muss positiv sein.
const MIN_CHART_HEIGHT_PX: i32 = 2;

/// Abbildungsmodus der y-Achse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YMapping {
    /// Lineare y-Achse
    #[default]
    Linear,
    /// Logarithmische y-Achse
    Logarithmic,
}

/// Sichtbarer Chart-Ausschnitt, wie ihn die Kurvenfunktionen pro Aufruf sehen.
#[derive(Debug, Clone)]
pub struct ChartView {
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    chart_width: i32,
    chart_height: i32,
    x_zoom: f64,
    y_zoom: f64,
    /// Horizontale Verschiebung (Pan) in Dateneinheiten
    x_shift: f64,
    y_mapping: YMapping,
    x_mapper: CoordinateMapper,
    y_mapper: CoordinateMapper,
    point_radius: i32,
    selected_point_radius: i32,
    log_y_min: f64,
}

impl ChartView {
    /// Erstellt einen Chart mit Datenbereichen und Pixelgröße (Zoom 1.0, linear).
    pub fn new(x_bounds: [f64; 2], y_bounds: [f64; 2], chart_width: i32, chart_height: i32) -> Self {
        let mut view = Self {
            x_bounds: ensure_non_zero_range(x_bounds),
            y_bounds: ensure_non_zero_range(y_bounds),
            chart_width: chart_width.max(1),
            chart_height: chart_height.max(MIN_CHART_HEIGHT_PX),
            x_zoom: 1.0,
            y_zoom: 1.0,
            x_shift: 0.0,
            y_mapping: YMapping::Linear,
            x_mapper: CoordinateMapper::Linear(LinearMapper::new(0.0, 1.0, 0.0, 1.0)),
            y_mapper: CoordinateMapper::Linear(LinearMapper::new(0.0, 1.0, 0.0, 1.0)),
            point_radius: POINT_RADIUS_PX,
            selected_point_radius: SELECTED_POINT_RADIUS_PX,
            log_y_min: LOG_Y_MIN,
        };
        view.update_mappers();
        view
    }

    /// Übernimmt Pick-Radien und Log-Minimum aus den Optionen.
    pub fn apply_options(&mut self, options: &ChartOptions) {
        self.point_radius = options.point_radius_px;
        self.selected_point_radius = options.selected_point_radius_px;
        self.log_y_min = options.log_y_min;
        self.update_mappers();
    }

    /// Setzt den Datenbereich der x-Achse.
    pub fn set_x_bounds(&mut self, min: f64, max: f64) {
        self.x_bounds = ensure_non_zero_range([min, max]);
        self.update_mappers();
    }

    /// Setzt den Datenbereich der y-Achse.
    pub fn set_y_bounds(&mut self, min: f64, max: f64) {
        self.y_bounds = ensure_non_zero_range([min, max]);
        self.update_mappers();
    }

    /// Setzt die Pixelgröße der Zeichenfläche.
    pub fn set_size(&mut self, chart_width: i32, chart_height: i32) {
        self.chart_width = chart_width.max(1);
        self.chart_height = chart_height.max(MIN_CHART_HEIGHT_PX);
        self.update_mappers();
    }

    /// Setzt die Zoom-Faktoren beider Achsen.
    pub fn set_zoom(&mut self, x_zoom: f64, y_zoom: f64) {
        if x_zoom <= 0.0 || y_zoom <= 0.0 {
            log::warn!("Zoom muss positiv sein (x={}, y={}), ignoriert", x_zoom, y_zoom);
            return;
        }
        self.x_zoom = x_zoom;
        self.y_zoom = y_zoom;
        self.update_mappers();
    }

    /// Setzt die horizontale Verschiebung (Dateneinheiten).
    pub fn set_x_shift(&mut self, x_shift: f64) {
        self.x_shift = x_shift;
    }

    /// Schaltet zwischen linearer und logarithmischer y-Achse um.
    pub fn set_y_mapping(&mut self, mapping: YMapping) {
        self.y_mapping = mapping;
        self.update_mappers();
    }

    /// Berechnet beide Mapper aus Bereichen, Größe und Zoom neu.
    pub fn update_mappers(&mut self) {
        let x_dst_max = f64::from(self.chart_width);
        match &mut self.x_mapper {
            CoordinateMapper::Linear(m) => {
                m.update(self.x_bounds[0], self.x_bounds[1], 0.0, x_dst_max, self.x_zoom)
            }
            other => {
                let mut m = LinearMapper::new(self.x_bounds[0], self.x_bounds[1], 0.0, x_dst_max);
                m.update(self.x_bounds[0], self.x_bounds[1], 0.0, x_dst_max, self.x_zoom);
                *other = CoordinateMapper::Linear(m);
            }
        }

        let y_dst_max = f64::from(self.chart_height - 1);
        match self.y_mapping {
            YMapping::Linear => {
                let mut m = LinearMapper::new(self.y_bounds[0], self.y_bounds[1], 0.0, y_dst_max);
                m.update(self.y_bounds[0], self.y_bounds[1], 0.0, y_dst_max, self.y_zoom);
                self.y_mapper = CoordinateMapper::Linear(m);
            }
            YMapping::Logarithmic => {
                let y_min = if self.y_bounds[0] > 0.0 {
                    self.y_bounds[0]
                } else {
                    log::warn!(
                        "Ungueltiges y-Minimum {} fuer logarithmische Abbildung, verwende {}",
                        self.y_bounds[0],
                        self.log_y_min
                    );
                    self.log_y_min
                };
                match &mut self.y_mapper {
                    CoordinateMapper::Logarithmic(m) => {
                        m.update(y_min, self.y_bounds[1], 0.0, y_dst_max, self.y_zoom)
                    }
                    other => {
                        let mut m = LogarithmicMapper::new(y_min, self.y_bounds[1], 0.0, y_dst_max);
                        m.update(y_min, self.y_bounds[1], 0.0, y_dst_max, self.y_zoom);
                        *other = CoordinateMapper::Logarithmic(m);
                    }
                }
            }
        }
    }

    /// Datenbereich der x-Achse
    pub fn x_bounds(&self) -> [f64; 2] {
        self.x_bounds
    }

    /// Datenbereich der y-Achse
    pub fn y_bounds(&self) -> [f64; 2] {
        self.y_bounds
    }

    /// Breite des x-Datenbereichs
    pub fn x_range(&self) -> f64 {
        self.x_bounds[1] - self.x_bounds[0]
    }

    /// Breite der Zeichenfläche in Pixeln (ohne Zoom)
    pub fn chart_width(&self) -> i32 {
        self.chart_width
    }

    /// Höhe der Zeichenfläche in Pixeln (ohne Zoom)
    pub fn chart_height(&self) -> i32 {
        self.chart_height
    }

    /// Horizontaler Zoom-Faktor
    pub fn x_zoom(&self) -> f64 {
        self.x_zoom
    }

    /// Vertikaler Zoom-Faktor
    pub fn y_zoom(&self) -> f64 {
        self.y_zoom
    }

    /// Horizontale Verschiebung in Dateneinheiten
    pub fn x_shift(&self) -> f64 {
        self.x_shift
    }

    /// Aktueller y-Abbildungsmodus
    pub fn y_mapping(&self) -> YMapping {
        self.y_mapping
    }

    /// Gezoomte Gesamtbreite in Pixeln
    pub fn full_chart_width(&self) -> f64 {
        f64::from(self.chart_width) * self.x_zoom
    }

    /// Größter erreichbarer Pixel-y-Wert (gezoomt)
    pub fn max_pixel_y(&self) -> i32 {
        (f64::from(self.chart_height - 1) * self.y_zoom) as i32
    }

    /// Obere Grenze des sichtbaren y-Datenbereichs
    pub fn visible_y_max(&self) -> f64 {
        self.y_bounds[1] / self.y_zoom
    }

    /// x-Mapper (immer linear)
    pub fn x_mapper(&self) -> &CoordinateMapper {
        &self.x_mapper
    }

    /// y-Mapper (linear oder logarithmisch)
    pub fn y_mapper(&self) -> &CoordinateMapper {
        &self.y_mapper
    }

    /// Pick-Radius in Pixeln; selektierte Punkte sind größer.
    pub fn point_radius(&self, selected: bool) -> i32 {
        if selected {
            self.selected_point_radius
        } else {
            self.point_radius
        }
    }

    /// Datenwert (x) → Pixel (unter Berücksichtigung der Verschiebung)
    pub fn data_to_pixel_x(&self, x: f64) -> f64 {
        self.x_mapper.src_to_dst(x - self.x_shift)
    }

    /// Pixel → Datenwert (x)
    pub fn pixel_to_data_x(&self, px: f64) -> f64 {
        self.x_mapper.dst_to_src(px) + self.x_shift
    }

    /// Datenwert (y) → Pixel
    pub fn data_to_pixel_y(&self, y: f64) -> f64 {
        self.y_mapper.src_to_dst(y)
    }

    /// Pixel → Datenwert (y)
    pub fn pixel_to_data_y(&self, py: f64) -> f64 {
        self.y_mapper.dst_to_src(py)
    }

    /// Wertepunkt → Pixel (nicht gerundet)
    pub fn data_to_pixel(&self, point: DVec2) -> DVec2 {
        DVec2::new(self.data_to_pixel_x(point.x), self.data_to_pixel_y(point.y))
    }

    /// Wertepunkt → ganzzahliges Pixel
    pub fn data_to_pixel_rounded(&self, point: DVec2) -> IVec2 {
        let p = self.data_to_pixel(point);
        IVec2::new(to_pixel(p.x), to_pixel(p.y))
    }

    /// Pixel → Wertepunkt
    pub fn pixel_to_data(&self, pixel: DVec2) -> DVec2 {
        DVec2::new(self.pixel_to_data_x(pixel.x), self.pixel_to_data_y(pixel.y))
    }
}

/// Rundet eine Pixelkoordinate auf ganze Pixel.
pub fn to_pixel(value: f64) -> i32 {
    value.round() as i32
}

fn ensure_non_zero_range(bounds: [f64; 2]) -> [f64; 2] {
    if bounds[1] > bounds[0] {
        return bounds;
    }
    if bounds[1] == bounds[0] {
        log::warn!("Leerer Datenbereich [{0}, {0}], erweitere auf [{0}, {1}]", bounds[0], bounds[0] + 1.0);
        return [bounds[0], bounds[0] + 1.0];
    }
    [bounds[1], bounds[0]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_data_pixel_roundtrip_x() {
        let view = ChartView::new([0.0, 255.0], [0.0, 1.0], 256, 101);
        assert_relative_eq!(view.data_to_pixel_x(0.0), 0.0);
        assert_relative_eq!(view.data_to_pixel_x(255.0), 256.0);
        assert_relative_eq!(view.pixel_to_data_x(view.data_to_pixel_x(128.0)), 128.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zoom_widens_pixel_range() {
        let mut view = ChartView::new([0.0, 100.0], [0.0, 1.0], 200, 100);
        view.set_zoom(2.0, 1.0);
        assert_relative_eq!(view.full_chart_width(), 400.0);
        assert_relative_eq!(view.data_to_pixel_x(100.0), 400.0);
    }

    #[test]
    fn test_shift_offsets_data() {
        let mut view = ChartView::new([0.0, 100.0], [0.0, 1.0], 100, 100);
        view.set_x_shift(10.0);
        assert_relative_eq!(view.data_to_pixel_x(10.0), 0.0);
        assert_relative_eq!(view.pixel_to_data_x(0.0), 10.0);
    }

    #[test]
    fn test_log_mapping_falls_back_on_non_positive_minimum() {
        let mut view = ChartView::new([0.0, 100.0], [0.0, 1024.0], 100, 101);
        view.set_y_mapping(YMapping::Logarithmic);
        assert!(view.y_mapper().is_logarithmic());
        assert_relative_eq!(view.data_to_pixel_y(1.0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(view.data_to_pixel_y(1024.0), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_bounds_are_widened() {
        let view = ChartView::new([5.0, 5.0], [0.0, 1.0], 100, 100);
        assert_eq!(view.x_bounds(), [5.0, 6.0]);
    }

    #[test]
    fn test_single_pixel_height_is_widened() {
        let mut view = ChartView::new([0.0, 100.0], [0.0, 1.0], 100, 1);
        assert_eq!(view.chart_height(), 2);
        let data = view.pixel_to_data(DVec2::new(40.0, 0.0));
        assert!(data.x.is_finite() && data.y.is_finite());
        assert_relative_eq!(view.data_to_pixel_y(1.0), 1.0, epsilon = 1e-9);

        view.set_size(100, 0);
        assert_eq!(view.chart_height(), 2);
        assert!(view.pixel_to_data(DVec2::new(10.0, 1.0)).y.is_finite());
    }
}
