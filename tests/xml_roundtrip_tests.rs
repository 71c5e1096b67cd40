use approx::assert_relative_eq;
use chart_function_editor::{
    parse_functions, write_functions, ChartFunction, ChartView, ChartWithFunctions,
    FunctionRecord,
};

fn chart() -> ChartWithFunctions {
    ChartWithFunctions::new(ChartView::new([0.0, 255.0], [0.0, 1.0], 255, 100))
}

#[test]
fn test_fixture_parses_all_functions() {
    let document = parse_functions(include_str!("fixtures/functions.xml"))
        .expect("Parsing der Fixture fehlgeschlagen");

    assert_eq!(document.transfer.as_ref().map(Vec::len), Some(4));
    assert_eq!(document.functions.len(), 3);
    assert!(matches!(&document.functions[0], FunctionRecord::Bezier(p) if p.len() == 7));
    assert!(matches!(document.functions[1], FunctionRecord::Gaussian { .. }));
}

#[test]
fn test_xml_roundtrip_through_chart_preserves_functions() {
    let document = parse_functions(include_str!("fixtures/functions.xml"))
        .expect("Parsing der Fixture fehlgeschlagen");

    let mut chart = chart();
    chart.load_document(&document);
    assert_eq!(chart.functions().len(), 4);
    assert_eq!(chart.document(), document);

    let written = write_functions(&chart.document()).expect("XML-Export fehlgeschlagen");
    let reparsed = parse_functions(&written).expect("Re-Parsing fehlgeschlagen");
    assert_eq!(reparsed, document);
}

#[test]
fn test_loading_replaces_existing_auxiliary_functions() {
    let document = parse_functions(include_str!("fixtures/functions.xml"))
        .expect("Parsing der Fixture fehlgeschlagen");

    let mut chart = chart();
    chart.add_gaussian(1.0, 1.0, 1.0);
    chart.add_gaussian(2.0, 1.0, 1.0);
    chart.add_gaussian(3.0, 1.0, 1.0);
    chart.add_gaussian(4.0, 1.0, 1.0);
    chart.load_document(&document);

    assert_eq!(chart.functions().len(), 4);
    assert_eq!(chart.selected_function_index(), 0);
    match &chart.functions()[2] {
        ChartFunction::Gaussian(g) => {
            assert_relative_eq!(g.mean(), 200.0);
            assert_relative_eq!(g.sigma(), 12.75);
        }
        other => panic!("Gauss erwartet: {}", other.name()),
    }
}

#[test]
fn test_edited_chart_roundtrip() {
    let mut chart = chart();
    chart.press(glam::IVec2::new(100, 40));
    chart.release(&mut chart_function_editor::KeepColor);
    chart.add_bezier_function(glam::IVec2::new(128, 60));
    chart.add_gaussian_function(glam::IVec2::new(40, 30));

    let xml = write_functions(&chart.document()).expect("XML-Export fehlgeschlagen");
    let parsed = parse_functions(&xml).expect("Re-Parsing fehlgeschlagen");

    let mut restored = self::chart();
    restored.load_document(&parsed);
    assert_eq!(restored.document(), chart.document());
}

#[test]
fn test_invalid_bezier_in_file_is_reported() {
    let xml = r#"
    <functions>
        <bezier>
            <node value="0" fktValue="0"/>
            <node value="1" fktValue="0"/>
        </bezier>
    </functions>
    "#;
    let err = parse_functions(xml).expect_err("Fehler erwartet");
    assert!(format!("{err:#}").contains("3n+1"));
}
