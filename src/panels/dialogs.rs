use egui::{Align2, Color32, Sense, Shape, Stroke, pos2, vec2};

use crate::PhotoApp;
use crate::adjust::Adjustments;
use crate::filters::Filter;
use crate::histogram::Histogram;
use crate::stroke::PALETTE;

/// Show every open auxiliary window
pub fn dialogs(app: &mut PhotoApp, ctx: &egui::Context) {
    adjustment_dialog(app, ctx);
    solarize_dialog(app, ctx);
    new_image_dialog(app, ctx);
    resize_dialog(app, ctx);
    histogram_window(app, ctx);
    notification_window(app, ctx);
}

fn modal(title: &str) -> egui::Window<'static> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_TOP, vec2(0.0, 48.0))
}

fn adjustment_dialog(app: &mut PhotoApp, ctx: &egui::Context) {
    let Some(dialog) = app.editor.dialog() else {
        return;
    };
    let title = dialog.title();
    let sliders: Vec<_> = dialog.kinds().iter().map(|&kind| (kind, dialog.value(kind))).collect();
    let show_histogram = sliders.len() > 1;

    modal(title).show(ctx, |ui| {
        ui.spacing_mut().slider_width = 220.0;
        for (kind, mut value) in sliders {
            let slider = egui::Slider::new(&mut value, Adjustments::MIN..=Adjustments::MAX).text(kind.label());
            if ui.add(slider).changed() {
                app.editor.set_dialog_value(kind, value);
            }
        }
        if show_histogram {
            if let Some(histogram) = cached_histogram(app) {
                ui.add_space(6.0);
                histogram_plot(ui, histogram);
            }
        }
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("OK").clicked() {
                app.editor.confirm_dialog();
            }
            if ui.button("Cancel").clicked() {
                app.editor.cancel_dialog();
            }
        });
    });
}

fn solarize_dialog(app: &mut PhotoApp, ctx: &egui::Context) {
    let Some(mut threshold) = app.panels.solarize else {
        return;
    };
    let mut close = false;

    modal("Solarize").show(ctx, |ui| {
        let slider = egui::Slider::new(&mut threshold, 0..=255).text("Threshold");
        if ui.add(slider).changed() {
            app.editor.preview_filter(Filter::Solarize { threshold });
        }
        ui.horizontal(|ui| {
            if ui.button("Apply").clicked() {
                app.editor.apply_filter(Filter::Solarize { threshold });
                close = true;
            }
            if ui.button("Cancel").clicked() {
                app.editor.clear_preview();
                close = true;
            }
        });
    });

    app.panels.solarize = if close { None } else { Some(threshold) };
}

fn new_image_dialog(app: &mut PhotoApp, ctx: &egui::Context) {
    let Some(form) = app.panels.new_image.as_mut() else {
        return;
    };
    let mut create = false;
    let mut close = false;

    modal("New Image").show(ctx, |ui| {
        egui::Grid::new("new_image_grid").num_columns(2).show(ui, |ui| {
            ui.label("Width:");
            ui.add(egui::DragValue::new(&mut form.width).range(1..=16384).suffix(" px"));
            ui.end_row();
            ui.label("Height:");
            ui.add(egui::DragValue::new(&mut form.height).range(1..=16384).suffix(" px"));
            ui.end_row();
            ui.label("Background:");
            let selected = PALETTE.get(form.fill_index).map_or("White", |(name, _)| *name);
            egui::ComboBox::from_id_salt("new_image_fill")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for (index, (name, _)) in PALETTE.iter().enumerate() {
                        ui.selectable_value(&mut form.fill_index, index, *name);
                    }
                });
            ui.end_row();
        });
        ui.horizontal(|ui| {
            create = ui.button("Create").clicked();
            close = ui.button("Cancel").clicked();
        });
    });

    if create {
        let (width, height) = (form.width, form.height);
        let fill = PALETTE.get(form.fill_index).map_or(Color32::WHITE, |(_, color)| *color);
        close = app.editor.new_image(width, height, fill);
    }
    if close {
        app.panels.new_image = None;
    }
}

fn resize_dialog(app: &mut PhotoApp, ctx: &egui::Context) {
    let Some((orig_w, orig_h)) = app.editor.session().dimensions() else {
        app.panels.resize = None;
        return;
    };
    let Some(form) = app.panels.resize.as_mut() else {
        return;
    };
    let mut apply = false;
    let mut close = false;

    modal("Resize").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label("Width:");
            if ui.add(egui::DragValue::new(&mut form.width).range(1..=16384)).changed() && form.keep_aspect {
                form.height = ((form.width as f64 * orig_h as f64 / orig_w as f64).round() as u32).max(1);
            }
            ui.label("Height:");
            if ui.add(egui::DragValue::new(&mut form.height).range(1..=16384)).changed() && form.keep_aspect {
                form.width = ((form.height as f64 * orig_w as f64 / orig_h as f64).round() as u32).max(1);
            }
        });
        ui.checkbox(&mut form.keep_aspect, "Keep aspect ratio");
        ui.horizontal(|ui| {
            apply = ui.button("Apply").clicked();
            close = ui.button("Cancel").clicked();
        });
    });

    if apply {
        let (width, height) = (form.width, form.height);
        close = app.editor.resize(width, height);
    }
    if close {
        app.panels.resize = None;
    }
}

fn histogram_window(app: &mut PhotoApp, ctx: &egui::Context) {
    if !app.panels.show_histogram {
        return;
    }
    let mut open = true;
    egui::Window::new("Histogram")
        .open(&mut open)
        .resizable(false)
        .show(ctx, |ui| match cached_histogram(app) {
            Some(histogram) => {
                histogram_plot(ui, histogram);
                ui.label(format!("{} pixels", histogram.total()));
            }
            None => {
                ui.label("No image open");
            }
        });
    app.panels.show_histogram = open;
}

fn notification_window(app: &mut PhotoApp, ctx: &egui::Context) {
    let Some(message) = app.panels.notification.clone() else {
        return;
    };
    modal("Error").show(ctx, |ui| {
        ui.label(message);
        if ui.button("OK").clicked() {
            app.panels.notification = None;
        }
    });
}

/// Histogram of the displayed image, recomputed only when the image changes
fn cached_histogram(app: &mut PhotoApp) -> Option<&Histogram> {
    let session = app.editor.session();
    let revision = session.revision();
    let stale = app.panels.histogram.as_ref().is_none_or(|(seen, _)| *seen != revision);
    if stale {
        app.panels.histogram = session.histogram().map(|histogram| (revision, histogram));
    }
    app.panels.histogram.as_ref().map(|(_, histogram)| histogram)
}

fn histogram_plot(ui: &mut egui::Ui, histogram: &Histogram) {
    let (response, painter) = ui.allocate_painter(vec2(256.0, 100.0), Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 2.0, Color32::from_gray(24));

    let max = histogram.max_count().max(1) as f32;
    let channels = [
        (&histogram.red, Color32::from_rgb(230, 60, 60)),
        (&histogram.green, Color32::from_rgb(60, 200, 60)),
        (&histogram.blue, Color32::from_rgb(80, 120, 255)),
    ];
    for (bins, color) in channels {
        let points = bins
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let x = rect.left() + i as f32 * rect.width() / 255.0;
                let y = rect.bottom() - count as f32 / max * rect.height();
                pos2(x, y)
            })
            .collect();
        painter.add(Shape::line(points, Stroke::new(1.0, color)));
    }
}
