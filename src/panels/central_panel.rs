use crate::PhotoApp;
use crate::file_handler::FileHandler;
use crate::tools::Tool;

pub fn central_panel(app: &mut PhotoApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let canvas_rect = ui.available_rect_before_wrap();
            let response = ui.allocate_rect(canvas_rect, egui::Sense::click_and_drag());

            app.editor.set_viewport(canvas_rect.size());
            app.input.set_canvas_rect(canvas_rect);

            // Handle input
            let hovered = response.hovered() || response.dragged();
            for event in app.input.process_input(ctx, hovered) {
                app.editor.handle_input(&event);
            }

            // Render the canvas
            let overlay = app.editor.active_tool().and_then(|tool| tool.overlay_rect());
            let painter = ui.painter_at(canvas_rect);
            app.renderer
                .render(&painter, canvas_rect, app.editor.session(), app.editor.view(), overlay);

            if !app.editor.session().has_image() {
                painter.text(
                    canvas_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Open an image or drop one here",
                    egui::FontId::proportional(18.0),
                    ui.visuals().weak_text_color(),
                );
            }
            if FileHandler::is_hovering_files(ctx) {
                painter.rect_stroke(
                    canvas_rect.shrink(4.0),
                    4.0,
                    egui::Stroke::new(2.0, ui.visuals().selection.stroke.color),
                );
            }
        });
}
