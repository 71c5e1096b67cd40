//! Application-Layer: Host-Chart, Funktionen und Rückmeldungen.

pub mod chart;
pub mod events;
/// Editierbare Kurvenfunktionen (Transferfunktion, Bézier, Gauss)
pub mod functions;

pub use chart::{ChartWithFunctions, InteractionMode};
pub use events::ChartEvent;
pub use functions::{
    BezierCurve, ChangeNotifier, ChartFunction, ColorPicker, GaussianCurve, KeepColor,
    TransferFunction,
};
