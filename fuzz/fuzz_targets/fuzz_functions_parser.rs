#![no_main]

use chart_function_editor::{parse_functions, write_functions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(document) = parse_functions(text) else {
        return;
    };
    // Alles, was gelesen wurde, muss sich auch wieder schreiben lassen
    let written = write_functions(&document).expect("Export eines gelesenen Dokuments");
    let reparsed = parse_functions(&written).expect("Re-Parsing des Exports");
    assert_eq!(reparsed, document);
});
