//! Chart Function Editor Library.
//! Editiermodell für Transferfunktionen, Bézier- und Gauss-Kurven über einem
//! 2D-Diagramm, ohne Rendering und ohne GUI-Abhängigkeit.

pub mod app;
pub mod core;
pub mod shared;
pub mod xml;

pub use app::{
    BezierCurve, ChangeNotifier, ChartEvent, ChartFunction, ChartWithFunctions, ColorPicker,
    GaussianCurve, InteractionMode, KeepColor, TransferFunction,
};
pub use core::{
    ChartView, CoordinateMapper, FunctionRecord, FunctionsDocument, LinearMapper,
    LogarithmicMapper, Rgb, TransferNode, TransferNodes, YMapping,
};
pub use shared::ChartOptions;
pub use xml::{parse_functions, write_functions};
