use crate::PhotoApp;
use crate::stroke::PALETTE;
use crate::tools::{Tool, ToolKind, ToolType};

pub fn tools_panel(app: &mut PhotoApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active_kind = app.editor.active_tool().map(|tool| tool.kind());
            let has_image = app.editor.session().has_image();

            for kind in ToolKind::ALL {
                let label = format!("{} ({:?})", kind.label(), kind.shortcut());
                let response = ui.add_enabled(has_image, egui::SelectableLabel::new(active_kind == Some(kind), label));
                if response.clicked() {
                    let next = if active_kind == Some(kind) { None } else { Some(kind) };
                    app.editor.set_tool(next);
                }
            }
            ui.separator();

            // Undo/Redo section
            ui.horizontal(|ui| {
                let history = app.editor.session().history();
                let can_undo = has_image && history.can_undo();
                let can_redo = has_image && history.can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.editor.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.editor.redo();
                }
            });
            let history = app.editor.session().history();
            ui.label(format!(
                "History: {} / {} (redo {})",
                history.len(),
                history.capacity(),
                history.redo_len()
            ));

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("−").clicked() {
                    app.editor.zoom_out();
                }
                ui.label(format!("{:.0}%", app.editor.view().zoom_factor() * 100.0));
                if ui.button("+").clicked() {
                    app.editor.zoom_in();
                }
                if ui.button("Fit").clicked() {
                    app.editor.reset_zoom();
                }
            });

            let Some(tool) = app.editor.active_tool() else {
                return;
            };
            ui.separator();
            ui.horizontal(|ui| {
                ui.strong("Tool Options");
                ui.label(format!("({})", tool.current_state_name()));
            });
            tool_options(app, ui);
        });
}

fn tool_options(app: &mut PhotoApp, ui: &mut egui::Ui) {
    let Some(kind) = app.editor.active_tool().map(|tool| tool.kind()) else {
        return;
    };

    match kind {
        ToolKind::Crop => {
            ui.label("Drag a rectangle, then press Enter to crop or Escape to cancel.");
            ui.horizontal(|ui| {
                if ui.button("Crop").clicked() {
                    app.editor.confirm();
                }
                if ui.button("Cancel").clicked() {
                    app.editor.cancel();
                }
            });
        }
        ToolKind::Draw => {
            egui::Grid::new("palette_grid").num_columns(4).show(ui, |ui| {
                for (index, (name, color)) in PALETTE.iter().enumerate() {
                    let selected = app.prefs.palette_index == index;
                    let swatch = egui::Button::new("    ")
                        .fill(*color)
                        .stroke(if selected {
                            egui::Stroke::new(2.0, ui.visuals().selection.stroke.color)
                        } else {
                            egui::Stroke::NONE
                        });
                    if ui.add(swatch).on_hover_text(*name).clicked() {
                        app.prefs.palette_index = index;
                    }
                    if index % 4 == 3 {
                        ui.end_row();
                    }
                }
            });
            ui.horizontal(|ui| {
                ui.label("Size:");
                ui.add(egui::Slider::new(&mut app.prefs.brush_radius, 0..=50));
            });
        }
        ToolKind::Rotate => {
            let (mut degrees, mut expand) = match app.editor.active_tool() {
                Some(ToolType::Rotate(tool)) => (tool.degrees(), tool.expand()),
                _ => return,
            };
            let slider = ui.add(egui::Slider::new(&mut degrees, -180.0..=180.0).suffix("°"));
            let toggle = ui.checkbox(&mut expand, "Expand canvas");
            if slider.changed() || toggle.changed() {
                app.editor.set_rotation(degrees, expand);
            }
            ui.horizontal(|ui| {
                if ui.button("Apply").clicked() {
                    app.editor.confirm();
                }
                if ui.button("Cancel").clicked() {
                    app.editor.cancel();
                }
            });
        }
        ToolKind::ColorPop => {
            ui.label("Click a colour to keep it.");
            ui.horizontal(|ui| {
                ui.label("Tolerance:");
                ui.add(egui::Slider::new(&mut app.prefs.color_pop_tolerance, 0..=255));
            });
        }
    }
}
