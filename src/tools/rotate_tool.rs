use egui::Pos2;
use log::debug;

use crate::command::Command;
use crate::error::EditResult;
use crate::geometry::ViewState;
use crate::session::ImageSession;
use crate::tools::Tool;
use crate::transform;

/// Arbitrary-angle rotation driven by a slider.
///
/// Moving the slider previews the rotated image; the rotation is only
/// committed by [`RotateTool::apply`] (or Enter). Each preview starts from
/// the committed image, so angles never accumulate.
#[derive(Debug, Clone)]
pub struct RotateTool {
    degrees: f32,
    expand: bool,
}

impl Default for RotateTool {
    fn default() -> Self {
        Self::new()
    }
}

impl RotateTool {
    pub fn new() -> Self {
        Self {
            degrees: 0.0,
            expand: true,
        }
    }

    pub fn degrees(&self) -> f32 {
        self.degrees
    }

    pub fn expand(&self) -> bool {
        self.expand
    }

    /// Change the angle and refresh the preview
    pub fn set_degrees(&mut self, degrees: f32, session: &mut ImageSession) -> EditResult<()> {
        self.set(degrees, self.expand, session)
    }

    /// Toggle canvas growth and refresh the preview
    pub fn set_expand(&mut self, expand: bool, session: &mut ImageSession) -> EditResult<()> {
        self.set(self.degrees, expand, session)
    }

    pub fn set(&mut self, degrees: f32, expand: bool, session: &mut ImageSession) -> EditResult<()> {
        if !degrees.is_finite() {
            return Ok(());
        }
        if degrees == self.degrees && expand == self.expand && session.is_previewing() {
            return Ok(());
        }
        self.degrees = degrees;
        self.expand = expand;
        self.refresh_preview(session)
    }

    fn refresh_preview(&self, session: &mut ImageSession) -> EditResult<()> {
        if self.degrees.rem_euclid(360.0) == 0.0 {
            session.clear_preview();
            return Ok(());
        }
        let (degrees, expand) = (self.degrees, self.expand);
        session.preview(|image| Ok(transform::rotate(image, degrees, expand)))?;
        Ok(())
    }

    /// Commit the previewed rotation. Returns false if there was nothing to rotate.
    pub fn apply(&mut self, session: &mut ImageSession) -> EditResult<bool> {
        session.clear_preview();
        if self.degrees.rem_euclid(360.0) == 0.0 {
            return Ok(false);
        }
        let command = Command::Rotate {
            degrees: self.degrees,
            expand: self.expand,
        };
        let committed = session.execute(&command)?;
        debug!("Rotated by {} degrees", self.degrees);
        self.degrees = 0.0;
        Ok(committed)
    }

    /// Drop the preview and reset the angle
    pub fn reset(&mut self, session: &mut ImageSession) {
        self.degrees = 0.0;
        session.clear_preview();
    }
}

impl Tool for RotateTool {
    fn name(&self) -> &'static str {
        "Rotate"
    }

    fn deactivate(&mut self, session: &mut ImageSession) {
        self.reset(session);
    }

    fn on_pointer_down(&mut self, _pos: Pos2, _session: &mut ImageSession, _view: &ViewState) -> EditResult<()> {
        Ok(())
    }

    fn on_pointer_move(&mut self, _pos: Pos2, _session: &mut ImageSession, _view: &ViewState) -> EditResult<()> {
        Ok(())
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _session: &mut ImageSession, _view: &ViewState) -> EditResult<()> {
        Ok(())
    }

    fn confirm(&mut self, session: &mut ImageSession, _view: &ViewState) -> EditResult<()> {
        self.apply(session).map(|_| ())
    }

    fn cancel(&mut self, session: &mut ImageSession) {
        self.reset(session);
    }

    fn current_state_name(&self) -> &'static str {
        if self.degrees.rem_euclid(360.0) == 0.0 {
            "Idle"
        } else {
            "Previewing"
        }
    }
}
