#![no_main]

use chart_function_editor::{ChartView, ChartWithFunctions, KeepColor, Rgb};
use glam::IVec2;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut chart = ChartWithFunctions::new(ChartView::new([0.0, 255.0], [0.0, 1.0], 255, 100));
    let mut cancel = |_: Rgb| -> Option<Rgb> { None };

    for chunk in data.chunks_exact(3) {
        let pixel = IVec2::new(i32::from(chunk[1]) - 8, i32::from(chunk[2]) / 2 - 8);
        match chunk[0] % 8 {
            0 => {
                chart.press(pixel);
            }
            1 => chart.drag(pixel),
            2 => chart.release(&mut KeepColor),
            3 => chart.release(&mut cancel),
            4 => {
                chart.delete_point();
            }
            5 => {
                chart.add_bezier_function(pixel);
            }
            6 => {
                chart.add_gaussian_function(pixel);
            }
            _ => chart.select_next_function(),
        }
        let nodes = chart.transfer_function().transfer_nodes();
        assert!(nodes.is_consistent() && nodes.is_sorted());
    }
});
