//! Host-Chart mit editierbaren Funktionen.
//!
//! Besitzt die Chart-Geometrie, die Funktionsliste (Eintrag 0 ist immer die
//! Transferfunktion) und die Auswahl der aktiven Funktion. Zeiger-Ereignisse
//! kommen als einfache Methodenaufrufe mit chart-lokalen Pixeln an.

use super::events::ChartEvent;
use super::functions::{
    BezierCurve, ChartFunction, ColorPicker, GaussianCurve, TransferFunction,
};
use crate::core::geometry::SQRT_TWO_PI;
use crate::core::{ChartView, FunctionRecord, FunctionsDocument, Rgb, TransferNode, YMapping};
use crate::shared::ChartOptions;
use glam::IVec2;

/// Laufender Zeiger-Modus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Kein Drag aktiv
    #[default]
    Idle,
    /// Bestehender Punkt wird gezogen
    MovePoint,
    /// Neu eingefügter Punkt wird gezogen
    MoveNewPoint,
}

/// Chart mit Transferfunktion und Hilfsfunktionen
#[derive(Debug)]
pub struct ChartWithFunctions {
    view: ChartView,
    options: ChartOptions,
    functions: Vec<ChartFunction>,
    selected_function: usize,
    mode: InteractionMode,
}

impl ChartWithFunctions {
    /// Erstellt den Chart mit Standard-Optionen.
    pub fn new(view: ChartView) -> Self {
        Self::with_options(view, ChartOptions::default())
    }

    /// Erstellt den Chart mit gegebenen Optionen und frischer Transferfunktion.
    pub fn with_options(mut view: ChartView, options: ChartOptions) -> Self {
        view.apply_options(&options);
        let transfer = TransferFunction::new(&view);
        Self {
            view,
            options,
            functions: vec![ChartFunction::Transfer(transfer)],
            selected_function: 0,
            mode: InteractionMode::Idle,
        }
    }

    // ── Zugriff ─────────────────────────────────────────────────────

    /// Aktueller Chart-Ausschnitt
    pub fn view(&self) -> &ChartView {
        &self.view
    }

    /// Aktive Optionen
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Alle Funktionen; Index 0 ist die Transferfunktion.
    pub fn functions(&self) -> &[ChartFunction] {
        &self.functions
    }

    /// Aktueller Interaktionsmodus
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Index der aktiven Funktion
    pub fn selected_function_index(&self) -> usize {
        self.selected_function
    }

    /// Aktive Funktion
    pub fn selected_function(&self) -> &ChartFunction {
        &self.functions[self.selected_function]
    }

    /// Selektierter Punkt der aktiven Funktion
    pub fn selected_point(&self) -> Option<usize> {
        self.selected_function().selected_point()
    }

    /// Die Transferfunktion (Eintrag 0)
    pub fn transfer_function(&self) -> &TransferFunction {
        match &self.functions[0] {
            ChartFunction::Transfer(tf) => tf,
            _ => unreachable!("Eintrag 0 ist immer die Transferfunktion"),
        }
    }

    fn transfer_function_mut(&mut self) -> &mut TransferFunction {
        match &mut self.functions[0] {
            ChartFunction::Transfer(tf) => tf,
            _ => unreachable!("Eintrag 0 ist immer die Transferfunktion"),
        }
    }

    /// Registriert einen Callback für Änderungen der Transferfunktion.
    pub fn on_transfer_function_changed(&mut self, callback: impl FnMut() + 'static) {
        self.transfer_function_mut().notifier_mut().subscribe(callback);
    }

    // ── Geometrie ───────────────────────────────────────────────────

    /// Setzt den x-Bereich und überträgt die Transferfunktion proportional.
    pub fn set_x_bounds(&mut self, min: f64, max: f64) {
        let old_bounds = self.view.x_bounds();
        self.view.set_x_bounds(min, max);
        let view = &self.view;
        for function in &mut self.functions {
            match function {
                ChartFunction::Transfer(tf) => tf.translate_to_new_range(view, old_bounds),
                ChartFunction::Bezier(curve) => curve.sync_view_points(view),
                ChartFunction::Gaussian(_) => {}
            }
        }
    }

    /// Setzt den y-Bereich.
    pub fn set_y_bounds(&mut self, min: f64, max: f64) {
        self.view.set_y_bounds(min, max);
        self.sync_bezier_views();
    }

    /// Setzt die Pixelgröße der Zeichenfläche.
    pub fn set_size(&mut self, width: i32, height: i32) {
        self.view.set_size(width, height);
        self.sync_bezier_views();
    }

    /// Setzt den Zoom beider Achsen.
    pub fn set_zoom(&mut self, x_zoom: f64, y_zoom: f64) {
        self.view.set_zoom(x_zoom, y_zoom);
        self.sync_bezier_views();
    }

    /// Schaltet die y-Achse zwischen linear und logarithmisch um.
    pub fn set_y_mapping(&mut self, mapping: YMapping) {
        self.view.set_y_mapping(mapping);
        self.sync_bezier_views();
    }

    fn sync_bezier_views(&mut self) {
        let view = &self.view;
        for function in &mut self.functions {
            if let ChartFunction::Bezier(curve) = function {
                curve.sync_view_points(view);
            }
        }
    }

    // ── Zeiger ──────────────────────────────────────────────────────

    /// Linke Maustaste gedrückt: Punkt selektieren oder neuen einfügen.
    pub fn press(&mut self, pixel: IVec2) -> ChartEvent {
        let view = &self.view;
        let function = &mut self.functions[self.selected_function];
        self.mode = InteractionMode::Idle;

        let mut selected = function.select_point(view, pixel, None);
        if selected.is_none() && pixel.x < 0 {
            return ChartEvent::NoPointSelected;
        }
        let mut added = false;
        let mut insert_pixel = pixel;
        if selected.is_none() {
            // Endpunkte nicht entfernen und neu einfügen
            insert_pixel = IVec2::new(
                pixel.x.clamp(1, (view.chart_width() - 1).max(1)),
                pixel.y.clamp(0, view.chart_height()),
            );
            let count_before = function.num_points();
            selected = function.add_point(view, insert_pixel);
            added = count_before < function.num_points();
        }
        let Some(index) = selected else {
            return ChartEvent::NoPointSelected;
        };

        if added {
            function.add_color_point(view, insert_pixel.x, None);
            self.mode = InteractionMode::MoveNewPoint;
        } else {
            self.mode = InteractionMode::MovePoint;
        }

        if function.is_endpoint(index) {
            ChartEvent::EndPointSelected
        } else {
            ChartEvent::PointSelected
        }
    }

    /// Zeiger bewegt bei gedrückter Taste.
    pub fn drag(&mut self, pixel: IVec2) {
        if self.mode == InteractionMode::Idle {
            return;
        }
        let view = &self.view;
        self.functions[self.selected_function].move_selected_point(view, pixel);
    }

    /// Taste losgelassen; nach einem neuen Punkt wird der Farbwähler gezeigt.
    pub fn release(&mut self, picker: &mut dyn ColorPicker) {
        let view = &self.view;
        let function = &mut self.functions[self.selected_function];
        if self.mode == InteractionMode::MoveNewPoint {
            function.finish_new_point(picker);
        }
        self.mode = InteractionMode::Idle;
        function.finish_drag(view);
    }

    /// Löscht den selektierten Punkt der aktiven Funktion, falls löschbar.
    pub fn delete_point(&mut self) -> Option<usize> {
        let function = &mut self.functions[self.selected_function];
        let index = function.selected_point()?;
        if !function.is_deletable(index) {
            return None;
        }
        function.remove_point(index).then_some(index)
    }

    /// Farbe ändern (Doppelklick bzw. Kontextmenü).
    pub fn change_color(&mut self, pixel: Option<IVec2>, picker: &mut dyn ColorPicker) -> bool {
        let view = &self.view;
        self.functions[self.selected_function].change_color(view, pixel, picker)
    }

    /// Setzt die Transferfunktion zurück.
    pub fn reset_transfer_function(&mut self) -> ChartEvent {
        let view = &self.view;
        if let ChartFunction::Transfer(tf) = &mut self.functions[0] {
            tf.reset(view);
        }
        ChartEvent::NoPointSelected
    }

    // ── Funktionsliste ──────────────────────────────────────────────

    fn next_function_color(&self) -> Rgb {
        Rgb::from_rgb8(self.options.function_color(self.functions.len()))
    }

    fn new_bezier(&self, color: Rgb) -> BezierCurve {
        let mut curve = BezierCurve::empty(&self.view, color);
        curve.set_control_distance_divisor(&self.view, self.options.control_distance_divisor);
        curve
    }

    /// Neue Bézier-Kurve mit einem Anker bei `pixel`; sie wird aktiv.
    pub fn add_bezier_function(&mut self, pixel: IVec2) -> usize {
        let mut curve = self.new_bezier(self.next_function_color());
        curve.reset(&self.view);
        curve.add_point(&self.view, pixel);
        self.push_function(ChartFunction::Bezier(curve))
    }

    /// Neue Gauss-Kurve mit Mittelwert bei `pixel`; Breite aus den Optionen.
    pub fn add_gaussian_function(&mut self, pixel: IVec2) -> usize {
        let view = &self.view;
        let mean = view.pixel_to_data_x(f64::from(pixel.x));
        let width_px = f64::from(view.chart_width()) / self.options.gaussian_width_divisor;
        let sigma = view.x_mapper().dst_to_src(width_px) - view.x_bounds()[0];
        let multiplier = view.pixel_to_data_y(f64::from(pixel.y)) * sigma * SQRT_TWO_PI;
        self.add_gaussian(mean, sigma, multiplier)
    }

    /// Neue Gauss-Kurve mit gegebenen Parametern; sie wird aktiv.
    pub fn add_gaussian(&mut self, mean: f64, sigma: f64, multiplier: f64) -> usize {
        let curve =
            GaussianCurve::with_parameters(self.next_function_color(), mean, sigma, multiplier);
        self.push_function(ChartFunction::Gaussian(curve))
    }

    fn push_function(&mut self, function: ChartFunction) -> usize {
        log::debug!("Funktion hinzugefuegt: {}", function.name());
        self.functions.push(function);
        self.selected_function = self.functions.len() - 1;
        self.selected_function
    }

    /// Entfernt die aktive Hilfsfunktion; die Transferfunktion bleibt immer.
    pub fn remove_function(&mut self) -> bool {
        if self.selected_function == 0 {
            log::warn!("Transferfunktion kann nicht entfernt werden");
            return false;
        }
        let removed = self.functions.remove(self.selected_function);
        log::debug!("Funktion entfernt: {}", removed.name());
        self.selected_function -= 1;
        self.mode = InteractionMode::Idle;
        true
    }

    /// Aktiviert die Funktion an `index` (ungültige Indizes werden ignoriert).
    pub fn select_function(&mut self, index: usize) {
        if index < self.functions.len() {
            self.selected_function = index;
            self.mode = InteractionMode::Idle;
        }
    }

    /// Nächste Funktion (mit Umlauf).
    pub fn select_next_function(&mut self) {
        self.selected_function = (self.selected_function + 1) % self.functions.len();
    }

    /// Vorherige Funktion (mit Umlauf).
    pub fn select_previous_function(&mut self) {
        self.selected_function = match self.selected_function {
            0 => self.functions.len() - 1,
            i => i - 1,
        };
    }

    // ── Persistenz ──────────────────────────────────────────────────

    /// Hilfsfunktionen als Datensätze (ohne Transferfunktion).
    pub fn auxiliary_records(&self) -> Vec<FunctionRecord> {
        self.functions
            .iter()
            .filter_map(|function| match function {
                ChartFunction::Transfer(_) => None,
                ChartFunction::Bezier(curve) => Some(FunctionRecord::Bezier(curve.points())),
                ChartFunction::Gaussian(g) => Some(FunctionRecord::Gaussian {
                    mean: g.mean(),
                    sigma: g.sigma(),
                    multiplier: g.multiplier(),
                }),
            })
            .collect()
    }

    /// Ersetzt alle Hilfsfunktionen durch die Datensätze.
    pub fn load_auxiliary_records(&mut self, records: &[FunctionRecord]) -> ChartEvent {
        self.functions.truncate(1);
        self.selected_function = 0;
        self.mode = InteractionMode::Idle;
        for (offset, record) in records.iter().enumerate() {
            let color = Rgb::from_rgb8(self.options.function_color(offset + 1));
            let function = match record {
                FunctionRecord::Bezier(points) => {
                    let mut curve = self.new_bezier(color);
                    for point in points {
                        curve.push_back(point.x, point.y);
                    }
                    curve.sync_view_points(&self.view);
                    ChartFunction::Bezier(curve)
                }
                FunctionRecord::Gaussian {
                    mean,
                    sigma,
                    multiplier,
                } => ChartFunction::Gaussian(GaussianCurve::with_parameters(
                    color,
                    *mean,
                    *sigma,
                    *multiplier,
                )),
            };
            self.functions.push(function);
        }
        log::info!("{} Hilfsfunktionen geladen", records.len());
        ChartEvent::NoPointSelected
    }

    /// Knoten der Transferfunktion
    pub fn transfer_records(&self) -> Vec<TransferNode> {
        self.transfer_function().nodes()
    }

    /// Ersetzt die Knoten der Transferfunktion.
    pub fn load_transfer_records(&mut self, nodes: &[TransferNode]) -> ChartEvent {
        let view = &self.view;
        if let ChartFunction::Transfer(tf) = &mut self.functions[0] {
            tf.set_nodes(view, nodes);
        }
        ChartEvent::NoPointSelected
    }

    /// Gesamter Funktionsinhalt zum Speichern
    pub fn document(&self) -> FunctionsDocument {
        FunctionsDocument {
            transfer: Some(self.transfer_records()),
            functions: self.auxiliary_records(),
        }
    }

    /// Lädt einen Funktionsinhalt; fehlende Transferfunktion bleibt unverändert.
    pub fn load_document(&mut self, document: &FunctionsDocument) -> ChartEvent {
        if let Some(nodes) = &document.transfer {
            self.load_transfer_records(nodes);
        }
        self.load_auxiliary_records(&document.functions)
    }
}
