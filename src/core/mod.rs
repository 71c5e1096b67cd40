//! Core-Domänentypen: Mapper, Farben, Chart-Geometrie, Stützstellen, Kurvenmathe.

pub mod chart_view;
pub mod color;
pub mod geometry;
pub mod mapper;
pub mod records;
pub mod transfer_nodes;

pub use chart_view::{to_pixel, ChartView, YMapping};
pub use color::Rgb;
pub use mapper::{map_value, CoordinateMapper, LinearMapper, LogarithmicMapper};
pub use records::{FunctionRecord, FunctionsDocument};
pub use transfer_nodes::{ColorNode, OpacityNode, TransferNode, TransferNodes};
