//! Gepaarte Stützstellen einer Transferfunktion (Opazität + Farbe).
//!
//! Beide Listen teilen sich den Index-Raum: Eintrag `i` der Opazitätsliste und
//! Eintrag `i` der Farbliste haben dieselbe x-Position. Die Listen sind nach x
//! streng aufsteigend sortiert.

use super::color::Rgb;
use serde::{Deserialize, Serialize};

/// Opazitäts-Stützstelle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpacityNode {
    /// Position im Wertebereich
    pub x: f64,
    /// Opazität 0.0..=1.0
    pub opacity: f64,
}

/// Farb-Stützstelle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorNode {
    /// Position im Wertebereich
    pub x: f64,
    /// Farbe an dieser Position
    pub color: Rgb,
}

/// Kombinierte Sicht auf eine Stützstelle (für Persistenz und Tabellen).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferNode {
    /// Position im Wertebereich
    pub x: f64,
    /// Opazität 0.0..=1.0
    pub opacity: f64,
    /// Farbe
    pub color: Rgb,
}

/// Paar aus Opazitäts- und Farbliste.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferNodes {
    opacity: Vec<OpacityNode>,
    color: Vec<ColorNode>,
}

impl TransferNodes {
    /// Erstellt leere Listen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Übernimmt fremde Listen unverändert (z.B. aus einem Renderer-Backend).
    ///
    /// Die Listen werden nicht geprüft; Aufrufer sollten `is_consistent()` abfragen.
    pub fn from_parts(opacity: Vec<OpacityNode>, color: Vec<ColorNode>) -> Self {
        Self { opacity, color }
    }

    /// Baut sortierte, gepaarte Listen aus kombinierten Stützstellen.
    ///
    /// Doppelte x-Positionen werden zusammengefasst (der spätere Eintrag gewinnt).
    pub fn from_nodes(nodes: &[TransferNode]) -> Self {
        let mut sorted: Vec<TransferNode> = nodes.iter().copied().filter(|n| n.x.is_finite()).collect();
        sorted.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let mut result = Self::new();
        for node in sorted {
            if let Some(last) = result.opacity.last() {
                if last.x == node.x {
                    result.opacity.pop();
                    result.color.pop();
                }
            }
            result.opacity.push(OpacityNode {
                x: node.x,
                opacity: node.opacity,
            });
            result.color.push(ColorNode {
                x: node.x,
                color: node.color,
            });
        }
        result
    }

    /// Anzahl der Opazitäts-Stützstellen
    pub fn len(&self) -> usize {
        self.opacity.len()
    }

    /// `true` wenn keine Stützstellen existieren
    pub fn is_empty(&self) -> bool {
        self.opacity.is_empty()
    }

    /// Prüft gleiche Länge und gleiche x-Positionen beider Listen.
    pub fn is_consistent(&self) -> bool {
        self.opacity.len() == self.color.len()
            && self
                .opacity
                .iter()
                .zip(&self.color)
                .all(|(o, c)| o.x == c.x)
    }

    /// `true` wenn x streng aufsteigend ist
    pub fn is_sorted(&self) -> bool {
        self.opacity.windows(2).all(|w| w[0].x < w[1].x)
    }

    /// Opazitäts-Stützstellen
    pub fn opacity_nodes(&self) -> &[OpacityNode] {
        &self.opacity
    }

    /// Farb-Stützstellen
    pub fn color_nodes(&self) -> &[ColorNode] {
        &self.color
    }

    /// Kombinierte Stützstelle an `index`
    pub fn node(&self, index: usize) -> Option<TransferNode> {
        let o = self.opacity.get(index)?;
        let c = self.color.get(index)?;
        Some(TransferNode {
            x: o.x,
            opacity: o.opacity,
            color: c.color,
        })
    }

    /// Alle Stützstellen kombiniert (nur bei konsistenten Listen vollständig)
    pub fn nodes(&self) -> Vec<TransferNode> {
        (0..self.len().min(self.color.len()))
            .filter_map(|i| self.node(i))
            .collect()
    }

    /// Index einer Stützstelle, deren x innerhalb `tolerance` liegt.
    pub fn find_x(&self, x: f64, tolerance: f64) -> Option<usize> {
        self.opacity.iter().position(|n| (n.x - x).abs() <= tolerance)
    }

    /// Fügt ein Paar sortiert ein und gibt den neuen Index zurück.
    pub fn insert(&mut self, node: TransferNode) -> usize {
        let index = self.opacity.partition_point(|n| n.x < node.x);
        self.opacity.insert(
            index,
            OpacityNode {
                x: node.x,
                opacity: node.opacity,
            },
        );
        self.color.insert(
            index,
            ColorNode {
                x: node.x,
                color: node.color,
            },
        );
        index
    }

    /// Entfernt das Paar an `index`.
    pub fn remove(&mut self, index: usize) -> Option<TransferNode> {
        let node = self.node(index)?;
        self.opacity.remove(index);
        self.color.remove(index);
        Some(node)
    }

    /// Setzt x und Opazität an `index` (Farbliste erhält dasselbe x).
    pub fn set_position(&mut self, index: usize, x: f64, opacity: f64) {
        if let (Some(o), Some(c)) = (self.opacity.get_mut(index), self.color.get_mut(index)) {
            o.x = x;
            o.opacity = opacity;
            c.x = x;
        }
    }

    /// Setzt nur die Opazität an `index`.
    pub fn set_opacity(&mut self, index: usize, opacity: f64) {
        if let Some(o) = self.opacity.get_mut(index) {
            o.opacity = opacity;
        }
    }

    /// Setzt nur die Farbe an `index`.
    pub fn set_color(&mut self, index: usize, color: Rgb) {
        if let Some(c) = self.color.get_mut(index) {
            c.color = color;
        }
    }

    /// Setzt die x-Position beider Listen an `index`.
    pub fn set_x(&mut self, index: usize, x: f64) {
        if let (Some(o), Some(c)) = (self.opacity.get_mut(index), self.color.get_mut(index)) {
            o.x = x;
            c.x = x;
        }
    }

    /// Stückweise lineare Opazität an `x` (außerhalb: Randwert).
    pub fn opacity_at(&self, x: f64) -> f64 {
        interpolate(&self.opacity, |n| n.x, x)
            .map(|(a, b, w)| a.opacity + (b.opacity - a.opacity) * w)
            .unwrap_or(0.0)
    }

    /// Stückweise lineare Farbe an `x` (außerhalb: Randwert).
    pub fn color_at(&self, x: f64) -> Rgb {
        interpolate(&self.color, |n| n.x, x)
            .map(|(a, b, w)| a.color.lerp(b.color, w))
            .unwrap_or_default()
    }
}

/// Sucht das Intervall um `x` und liefert beide Nachbarn mit Gewicht des rechten.
fn interpolate<T: Copy>(nodes: &[T], key: impl Fn(&T) -> f64, x: f64) -> Option<(T, T, f64)> {
    let first = *nodes.first()?;
    let last = *nodes.last()?;
    if x <= key(&first) {
        return Some((first, first, 0.0));
    }
    if x >= key(&last) {
        return Some((last, last, 0.0));
    }
    let upper = nodes.partition_point(|n| key(n) <= x);
    let a = nodes[upper - 1];
    let b = nodes[upper];
    let span = key(&b) - key(&a);
    let weight = if span > 0.0 { (x - key(&a)) / span } else { 1.0 };
    Some((a, b, weight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> TransferNodes {
        TransferNodes::from_nodes(&[
            TransferNode {
                x: 0.0,
                opacity: 0.0,
                color: Rgb::BLACK,
            },
            TransferNode {
                x: 100.0,
                opacity: 1.0,
                color: Rgb::WHITE,
            },
        ])
    }

    #[test]
    fn test_insert_keeps_order_and_pairing() {
        let mut nodes = ramp();
        let idx = nodes.insert(TransferNode {
            x: 40.0,
            opacity: 0.3,
            color: Rgb::new(1.0, 0.0, 0.0),
        });
        assert_eq!(idx, 1);
        assert!(nodes.is_consistent());
        assert!(nodes.is_sorted());
        assert_eq!(nodes.color_nodes()[1].color, Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_from_nodes_sorts_and_merges_duplicates() {
        let nodes = TransferNodes::from_nodes(&[
            TransferNode {
                x: 50.0,
                opacity: 0.2,
                color: Rgb::BLACK,
            },
            TransferNode {
                x: 0.0,
                opacity: 0.0,
                color: Rgb::BLACK,
            },
            TransferNode {
                x: 50.0,
                opacity: 0.7,
                color: Rgb::WHITE,
            },
        ]);
        assert_eq!(nodes.len(), 2);
        assert_relative_eq!(nodes.opacity_nodes()[1].opacity, 0.7);
    }

    #[test]
    fn test_piecewise_linear_evaluation() {
        let nodes = ramp();
        assert_relative_eq!(nodes.opacity_at(25.0), 0.25);
        assert_relative_eq!(nodes.color_at(50.0).g, 0.5);
        assert_relative_eq!(nodes.opacity_at(-10.0), 0.0);
        assert_relative_eq!(nodes.opacity_at(500.0), 1.0);
    }

    #[test]
    fn test_from_parts_detects_mismatch() {
        let nodes = TransferNodes::from_parts(
            vec![OpacityNode { x: 0.0, opacity: 0.0 }],
            Vec::new(),
        );
        assert!(!nodes.is_consistent());
    }
}
