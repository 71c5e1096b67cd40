//! Bidirektionale Abbildung zwischen Datenwerten und Pixel-Koordinaten.
//!
//! Zwei Varianten: linear und logarithmisch (Basis 2). Der Host-Chart
//! aktualisiert seine Mapper bei jeder Änderung von Bereich, Größe oder Zoom.

/// Lineare Abbildung `dst = (src - src_min) * factor + dst_min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMapper {
    src_min: f64,
    dst_min: f64,
    factor: f64,
}

impl LinearMapper {
    /// Erstellt einen Mapper von `[src_min, src_max]` nach `[dst_min, dst_max]` (Zoom 1.0).
    pub fn new(src_min: f64, src_max: f64, dst_min: f64, dst_max: f64) -> Self {
        let mut mapper = Self {
            src_min: 0.0,
            dst_min: 0.0,
            factor: 1.0,
        };
        mapper.update(src_min, src_max, dst_min, dst_max, 1.0);
        mapper
    }

    /// Setzt die Abbildungsparameter neu.
    ///
    /// Die Zielspanne wird mit `zoom` gestreckt. Ein leerer Quell- oder
    /// Zielbereich wird verworfen, der bisherige Faktor bleibt erhalten.
    pub fn update(&mut self, src_min: f64, src_max: f64, dst_min: f64, dst_max: f64, zoom: f64) {
        let src_range = src_max - src_min;
        if src_range.abs() < f64::EPSILON || !src_range.is_finite() {
            log::warn!(
                "Lineare Abbildung mit leerem Quellbereich [{}, {}] ignoriert",
                src_min,
                src_max
            );
            return;
        }
        let dst_span = (dst_max - dst_min) * zoom;
        if dst_span.abs() < f64::EPSILON || !dst_span.is_finite() {
            log::warn!(
                "Lineare Abbildung mit leerem Zielbereich [{}, {}] (Zoom {}) ignoriert",
                dst_min,
                dst_max,
                zoom
            );
            return;
        }
        self.src_min = src_min;
        self.dst_min = dst_min;
        self.factor = dst_span / src_range;
    }

    /// Datenwert → Zielkoordinate
    pub fn src_to_dst(&self, src: f64) -> f64 {
        (src - self.src_min) * self.factor + self.dst_min
    }

    /// Zielkoordinate → Datenwert
    pub fn dst_to_src(&self, dst: f64) -> f64 {
        (dst - self.dst_min) / self.factor + self.src_min
    }

    /// Skalierungsfaktor (Ziel-Einheiten pro Quell-Einheit).
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

/// Logarithmische Abbildung (Basis 2) mit Klemmung auf den Quellbereich.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogarithmicMapper {
    src_log_min: f64,
    src_log_max: f64,
    dst_min: f64,
    dst_max: f64,
}

impl LogarithmicMapper {
    /// Erstellt einen Mapper; `src_min` und `src_max` müssen positiv sein.
    ///
    /// Bei ungültigen Grenzen entsteht die Identität auf `[1, 2] → [dst_min, dst_max]`,
    /// damit nachfolgende Aufrufe keine NaN erzeugen.
    pub fn new(src_min: f64, src_max: f64, dst_min: f64, dst_max: f64) -> Self {
        let mut mapper = Self {
            src_log_min: 0.0,
            src_log_max: 1.0,
            dst_min,
            dst_max,
        };
        mapper.update(src_min, src_max, dst_min, dst_max, 1.0);
        mapper
    }

    /// Setzt die Abbildungsparameter neu.
    ///
    /// Nicht-positive Grenzen (oder `src_min >= src_max`) werden verworfen und
    /// mit einer Warnung geloggt; der vorherige Zustand bleibt erhalten.
    pub fn update(&mut self, src_min: f64, src_max: f64, dst_min: f64, dst_max: f64, zoom: f64) {
        if src_min <= 0.0 || src_max <= 0.0 || src_min >= src_max {
            log::warn!(
                "Ungueltige Grenzen fuer logarithmische Abbildung: [{}, {}] (beide muessen > 0 sein), Abbildung unveraendert",
                src_min,
                src_max
            );
            return;
        }
        self.src_log_min = src_min.log2();
        self.src_log_max = src_max.log2();
        self.dst_min = dst_min;
        self.dst_max = dst_min + (dst_max - dst_min) * zoom;
    }

    /// Datenwert → Zielkoordinate. Werte `<= 0` landen am unteren Ende.
    pub fn src_to_dst(&self, src: f64) -> f64 {
        let src_log = if src > 0.0 {
            src.log2().clamp(self.src_log_min, self.src_log_max)
        } else {
            self.src_log_min
        };
        map_value(
            self.src_log_min,
            self.src_log_max,
            self.dst_min,
            self.dst_max,
            src_log,
        )
    }

    /// Zielkoordinate → Datenwert
    pub fn dst_to_src(&self, dst: f64) -> f64 {
        let src_log = map_value(
            self.dst_min,
            self.dst_max,
            self.src_log_min,
            self.src_log_max,
            dst,
        );
        src_log.exp2()
    }
}

/// Abbildung eines Chart-Achsenwerts auf Pixel und zurück.
///
/// Geschlossener Summentyp: ein Mapper ist entweder linear oder logarithmisch.
/// `PartialEq` vergleicht die Parameter; verschiedene Varianten sind nie gleich.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateMapper {
    /// Lineare Achse
    Linear(LinearMapper),
    /// Logarithmische Achse (Basis 2)
    Logarithmic(LogarithmicMapper),
}

impl CoordinateMapper {
    /// Datenwert → Pixel
    pub fn src_to_dst(&self, src: f64) -> f64 {
        match self {
            CoordinateMapper::Linear(m) => m.src_to_dst(src),
            CoordinateMapper::Logarithmic(m) => m.src_to_dst(src),
        }
    }

    /// Pixel → Datenwert
    pub fn dst_to_src(&self, dst: f64) -> f64 {
        match self {
            CoordinateMapper::Linear(m) => m.dst_to_src(dst),
            CoordinateMapper::Logarithmic(m) => m.dst_to_src(dst),
        }
    }

    /// Aktualisiert die Parameter der jeweiligen Variante.
    pub fn update(&mut self, src_min: f64, src_max: f64, dst_min: f64, dst_max: f64, zoom: f64) {
        match self {
            CoordinateMapper::Linear(m) => m.update(src_min, src_max, dst_min, dst_max, zoom),
            CoordinateMapper::Logarithmic(m) => m.update(src_min, src_max, dst_min, dst_max, zoom),
        }
    }

    /// Gibt `true` zurück für die logarithmische Variante.
    pub fn is_logarithmic(&self) -> bool {
        matches!(self, CoordinateMapper::Logarithmic(_))
    }
}

/// Bildet `value` linear von `[src_min, src_max]` nach `[dst_min, dst_max]` ab.
///
/// Ein leerer Quellbereich liefert `dst_min`.
pub fn map_value(src_min: f64, src_max: f64, dst_min: f64, dst_max: f64, value: f64) -> f64 {
    let src_range = src_max - src_min;
    if src_range == 0.0 {
        return dst_min;
    }
    dst_min + (value - src_min) * (dst_max - dst_min) / src_range
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_roundtrip_with_zoom() {
        for zoom in [0.5, 1.0, 3.7] {
            let mut mapper = LinearMapper::new(0.0, 1.0, 0.0, 1.0);
            mapper.update(-20.0, 255.0, 0.0, 399.0, zoom);
            for i in 0..=100 {
                let x = -20.0 + 275.0 * i as f64 / 100.0;
                assert_relative_eq!(mapper.dst_to_src(mapper.src_to_dst(x)), x, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_linear_zoom_stretches_destination() {
        let mut mapper = LinearMapper::new(0.0, 100.0, 0.0, 200.0);
        assert_relative_eq!(mapper.src_to_dst(100.0), 200.0);
        mapper.update(0.0, 100.0, 0.0, 200.0, 2.0);
        assert_relative_eq!(mapper.src_to_dst(100.0), 400.0);
    }

    #[test]
    fn test_linear_rejects_empty_source_range() {
        let mut mapper = LinearMapper::new(0.0, 10.0, 0.0, 100.0);
        let before = mapper;
        mapper.update(5.0, 5.0, 0.0, 100.0, 1.0);
        assert_eq!(mapper, before);
    }

    #[test]
    fn test_linear_rejects_empty_destination_range() {
        let mut mapper = LinearMapper::new(0.0, 10.0, 0.0, 100.0);
        let before = mapper;
        mapper.update(0.0, 1.0, 0.0, 0.0, 1.0);
        assert_eq!(mapper, before);
        mapper.update(0.0, 1.0, 0.0, 100.0, f64::INFINITY);
        assert_eq!(mapper, before);
        assert_relative_eq!(mapper.dst_to_src(50.0), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_log_endpoints_and_spacing() {
        let mapper = LogarithmicMapper::new(1.0, 1000.0, 0.0, 100.0);
        assert_relative_eq!(mapper.src_to_dst(1.0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(mapper.src_to_dst(1000.0), 100.0, epsilon = 1e-9);
        let ten = mapper.src_to_dst(10.0);
        assert!(ten > 0.0 && ten < 100.0);
        // Linear läge 10 bei knapp 0.9 Pixeln
        let linear_ten = LinearMapper::new(1.0, 1000.0, 0.0, 100.0).src_to_dst(10.0);
        assert!((ten - linear_ten).abs() > 10.0);
    }

    #[test]
    fn test_log_roundtrip() {
        let mapper = LogarithmicMapper::new(1.0, 1000.0, 0.0, 100.0);
        for x in [1.0, 2.5, 10.0, 99.0, 500.0, 1000.0] {
            assert_relative_eq!(mapper.dst_to_src(mapper.src_to_dst(x)), x, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_log_non_positive_source_maps_to_zero() {
        let mapper = LogarithmicMapper::new(1.0, 1000.0, 0.0, 100.0);
        assert_eq!(mapper.src_to_dst(0.0), 0.0);
        assert_eq!(mapper.src_to_dst(-5.0), 0.0);
    }

    #[test]
    fn test_log_invalid_update_keeps_previous_state() {
        let mut mapper = LogarithmicMapper::new(1.0, 1000.0, 0.0, 100.0);
        let before = mapper;
        mapper.update(0.0, 1000.0, 0.0, 50.0, 1.0);
        assert_eq!(mapper, before);
        mapper.update(-3.0, 10.0, 0.0, 50.0, 1.0);
        assert_eq!(mapper, before);
    }

    #[test]
    fn test_mapper_equality_compares_parameters() {
        let a = CoordinateMapper::Linear(LinearMapper::new(0.0, 10.0, 0.0, 100.0));
        let b = CoordinateMapper::Linear(LinearMapper::new(0.0, 10.0, 0.0, 100.0));
        let c = CoordinateMapper::Linear(LinearMapper::new(0.0, 20.0, 0.0, 100.0));
        let d = CoordinateMapper::Logarithmic(LogarithmicMapper::new(1.0, 10.0, 0.0, 100.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }
}
