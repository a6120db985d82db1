use eframe::egui::{self, Color32, ColorImage, Rect, Stroke, TextureHandle, TextureOptions};
use image::DynamicImage;

use crate::geometry::ViewState;
use crate::session::ImageSession;

const BACKGROUND: Color32 = Color32::from_gray(48);
const CROP_SHADE: Color32 = Color32::from_black_alpha(90);

/// Draws the session image and tool overlays onto the canvas
pub struct Renderer {
    ctx: egui::Context,
    texture: Option<TextureHandle>,
    /// Session revision the texture was built from
    uploaded_revision: Option<u64>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("texture", &self.texture.as_ref().map(|t| t.size()))
            .field("uploaded_revision", &self.uploaded_revision)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    /// Creates a new renderer bound to the app's egui context
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_context(cc.egui_ctx.clone())
    }

    pub fn with_context(ctx: egui::Context) -> Self {
        Self {
            ctx,
            texture: None,
            uploaded_revision: None,
        }
    }

    /// Whether the texture is stale for the given session revision
    pub fn needs_upload(&self, revision: u64) -> bool {
        self.uploaded_revision != Some(revision)
    }

    fn sync_texture(&mut self, session: &ImageSession) {
        if !self.needs_upload(session.revision()) {
            return;
        }
        self.texture = session.display_image().map(|image| {
            self.ctx
                .load_texture("canvas-image", to_color_image(image), TextureOptions::LINEAR)
        });
        self.uploaded_revision = Some(session.revision());
    }

    /// Renders the canvas
    ///
    /// `rect` is the canvas in screen space; `overlay` is a canvas-space
    /// rectangle from the active tool.
    pub fn render(
        &mut self,
        painter: &egui::Painter,
        rect: Rect,
        session: &ImageSession,
        view: &ViewState,
        overlay: Option<Rect>,
    ) {
        painter.rect_filled(rect, 0.0, BACKGROUND);
        self.sync_texture(session);

        let (Some(texture), Some((width, height))) = (&self.texture, session.dimensions()) else {
            return;
        };
        let Some(mapper) = view.mapper(width, height) else {
            return;
        };

        let offset = rect.min.to_vec2();
        let image_rect = mapper.image_rect().translate(offset);
        let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.with_clip_rect(rect).image(texture.id(), image_rect, uv, Color32::WHITE);

        if let Some(overlay) = overlay {
            let overlay = overlay.translate(offset).intersect(rect);
            painter.rect_filled(overlay, 0.0, CROP_SHADE);
            painter.rect_stroke(overlay, 0.0, Stroke::new(1.0, Color32::WHITE));
        }
    }
}

/// Convert to the texture format egui expects
pub fn to_color_image(image: &DynamicImage) -> ColorImage {
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, rgba.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    #[test]
    fn test_texture_follows_session_revision() {
        let ctx = egui::Context::default();
        let mut renderer = Renderer::with_context(ctx.clone());
        let mut session = ImageSession::default();
        session.create_blank(8, 4, Color32::RED).unwrap();
        let mut view = ViewState::default();
        view.set_viewport(vec2(100.0, 100.0));

        let rect = Rect::from_min_size(egui::pos2(0.0, 0.0), vec2(100.0, 100.0));
        let painter = egui::Painter::new(ctx, egui::LayerId::background(), rect);

        assert!(renderer.needs_upload(session.revision()));
        renderer.render(&painter, rect, &session, &view, None);
        assert!(!renderer.needs_upload(session.revision()));

        session.execute(&crate::command::Command::Mirror).unwrap();
        assert!(renderer.needs_upload(session.revision()));
    }

    #[test]
    fn test_color_image_size() {
        let image = DynamicImage::new_rgb8(5, 3);
        assert_eq!(to_color_image(&image).size, [5, 3]);
    }
}
