//! XML Import/Export der Chart-Funktionen.
//!
//! Das Dokument hat ein `<functions>`-Element mit optionaler `<transfer>`-Liste
//! sowie beliebig vielen `<bezier>`- und `<gaussian>`-Einträgen. Alle Werte
//! stehen in Attributen.

pub mod parser;
pub mod writer;

pub use parser::parse_functions;
pub use writer::write_functions;
