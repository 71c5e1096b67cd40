//! Rückmeldungen des Charts an die umgebende Oberfläche.

/// Ergebnis einer Selektion (z.B. zum Aktivieren der Lösch-Aktion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartEvent {
    /// Ein innerer Punkt ist selektiert
    PointSelected,
    /// Ein Endpunkt ist selektiert (nicht löschbar)
    EndPointSelected,
    /// Nichts selektiert
    NoPointSelected,
}
