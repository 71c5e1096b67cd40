//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen, die zwischen `core`, `app` und der
//! Kommandozeile geteilt werden.

pub mod options;

pub use options::ChartOptions;
pub use options::{CONTROL_DISTANCE_DIVISOR, LOG_Y_MIN};
