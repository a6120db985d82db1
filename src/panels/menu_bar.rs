use crate::PhotoApp;
use crate::command::Command;
use crate::dialog::SliderDialog;
use crate::filters::Filter;
use crate::panels::{NewImageForm, ResizeForm};
use crate::tools::{Tool, ToolKind};

fn item(ui: &mut egui::Ui, enabled: bool, label: &str) -> bool {
    let clicked = ui.add_enabled(enabled, egui::Button::new(label)).clicked();
    if clicked {
        ui.close_menu();
    }
    clicked
}

pub fn menu_bar(app: &mut PhotoApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            let has_image = app.editor.session().has_image();

            ui.menu_button("File", |ui| {
                if item(ui, true, "New…") {
                    app.panels.new_image = Some(NewImageForm::default());
                }
                if item(ui, true, "Open…") {
                    app.open_with_dialog();
                }
                if item(ui, has_image, "Save") {
                    app.save();
                }
                if item(ui, has_image, "Save As…") {
                    app.save_with_dialog();
                }
                ui.separator();
                if item(ui, true, "Quit") {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                let history = app.editor.session().history();
                let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
                if item(ui, has_image && can_undo, "Undo (Z)") {
                    app.editor.undo();
                }
                if item(ui, has_image && can_redo, "Redo (Y)") {
                    app.editor.redo();
                }
                ui.separator();
                if item(ui, has_image, "Reset to Original") {
                    app.editor.reset();
                }
            });

            ui.menu_button("Image", |ui| {
                if item(ui, has_image, "Crop") {
                    app.editor.set_tool(Some(ToolKind::Crop));
                }
                if item(ui, has_image, "Rotate…") {
                    app.editor.set_tool(Some(ToolKind::Rotate));
                }
                if item(ui, has_image, "Transpose") {
                    app.editor.run(Command::QuarterTurn);
                }
                if item(ui, has_image, "Mirror") {
                    app.editor.run(Command::Mirror);
                }
                if item(ui, has_image, "Flip") {
                    app.editor.run(Command::Flip);
                }
                if item(ui, has_image, "Resize…") {
                    if let Some((width, height)) = app.editor.session().dimensions() {
                        app.panels.resize = Some(ResizeForm {
                            width,
                            height,
                            keep_aspect: true,
                        });
                    }
                }
            });

            ui.menu_button("Adjust", |ui| {
                if item(ui, has_image, "Brightness…") {
                    app.editor.open_dialog(SliderDialog::brightness);
                }
                if item(ui, has_image, "Contrast…") {
                    app.editor.open_dialog(SliderDialog::contrast);
                }
                if item(ui, has_image, "Saturation…") {
                    app.editor.open_dialog(SliderDialog::saturation);
                }
                if item(ui, has_image, "Colour Balance…") {
                    app.editor.open_dialog(SliderDialog::color_balance);
                }
                ui.separator();
                if item(ui, has_image, "Histogram") {
                    app.panels.show_histogram = true;
                }
            });

            ui.menu_button("Filter", |ui| {
                for filter in [Filter::Grayscale, Filter::Sepia, Filter::Invert, Filter::Posterize] {
                    if item(ui, has_image, filter.label()) {
                        app.editor.apply_filter(filter);
                    }
                }
                if item(ui, has_image, "Solarize…") {
                    app.panels.solarize = Some(128);
                }
                ui.separator();
                if item(ui, has_image, "Blur") {
                    app.editor.blur();
                }
                for filter in [Filter::Sharpen, Filter::Emboss] {
                    if item(ui, has_image, filter.label()) {
                        app.editor.apply_filter(filter);
                    }
                }
            });

            ui.menu_button("View", |ui| {
                if item(ui, true, "Zoom In (+)") {
                    app.editor.zoom_in();
                }
                if item(ui, true, "Zoom Out (-)") {
                    app.editor.zoom_out();
                }
                if item(ui, true, "Fit to Window (0)") {
                    app.editor.reset_zoom();
                }
            });
        });
    });
}

pub fn status_bar(app: &mut PhotoApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let session = app.editor.session();
            match session.path() {
                Some(path) => ui.label(path.display().to_string()),
                None if session.has_image() => ui.label("Untitled"),
                None => ui.label("No image open"),
            };
            if let Some((width, height)) = session.dimensions() {
                ui.separator();
                ui.label(format!("{width} × {height}"));
            }
            ui.separator();
            ui.label(format!("{:.0}%", app.editor.view().zoom_factor() * 100.0));
            if let Some(tool) = app.editor.active_tool() {
                ui.separator();
                ui.label(format!("{} ({})", tool.name(), tool.current_state_name()));
            }
            if session.has_uncommitted_changes() || session.is_previewing() {
                ui.separator();
                ui.label("Preview");
            }
        });
    });
}
