//! Persistierbare Darstellung aller Chart-Funktionen.

use super::transfer_nodes::TransferNode;
use glam::DVec2;

/// Gespeicherte Hilfsfunktion
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionRecord {
    /// Alle Kurvenpunkte (Anker und Griffe verschränkt, jeder dritte ein Anker)
    Bezier(Vec<DVec2>),
    /// Parameter einer Gauss-Kurve
    Gaussian {
        mean: f64,
        sigma: f64,
        multiplier: f64,
    },
}

/// Inhalt einer Funktionsdatei: optionale Transferfunktion plus Hilfsfunktionen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionsDocument {
    /// Knoten der Transferfunktion (implizit Eintrag 0)
    pub transfer: Option<Vec<TransferNode>>,
    /// Hilfsfunktionen in Listenreihenfolge
    pub functions: Vec<FunctionRecord>,
}

impl FunctionsDocument {
    /// `true` wenn weder Transferfunktion noch Hilfsfunktionen enthalten sind
    pub fn is_empty(&self) -> bool {
        self.transfer.is_none() && self.functions.is_empty()
    }
}
