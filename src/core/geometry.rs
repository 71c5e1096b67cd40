//! Rein-mathematische Kurvenhilfen ohne Chart-Abhängigkeit.

use glam::DVec2;

/// √(2π), Normierungsfaktor der Normalverteilung
pub const SQRT_TWO_PI: f64 = 2.506_628_274_631_000_2;

/// B(t) = (1-t)³·P0 + 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³·P3
pub fn cubic_bezier(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> DVec2 {
    let inv = 1.0 - t;
    let inv2 = inv * inv;
    let t2 = t * t;
    inv2 * inv * p0 + 3.0 * inv2 * t * p1 + 3.0 * inv * t2 * p2 + t2 * t * p3
}

/// Skalierte Normalverteilungsdichte `multiplier · φ((x − mean) / sigma) / sigma`.
///
/// Für `sigma ≈ 0` wird 0 geliefert statt Inf/NaN.
pub fn gaussian(x: f64, mean: f64, sigma: f64, multiplier: f64) -> f64 {
    if sigma.abs() <= f64::EPSILON {
        return 0.0;
    }
    let d = (x - mean) / sigma;
    multiplier * (-0.5 * d * d).exp() / (sigma.abs() * SQRT_TWO_PI)
}

/// Normierter Richtungsvektor; Null-Vektor bei Länge 0.
pub fn unit_or_zero(v: DVec2) -> DVec2 {
    let length = v.length();
    if length > 0.0 && length.is_finite() {
        v / length
    } else {
        DVec2::ZERO
    }
}
