use egui::{Color32, Key, PointerButton, Vec2};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::adjust::AdjustmentKind;
use crate::command::Command;
use crate::config::EditorConfig;
use crate::dialog::SliderDialog;
use crate::error::{EditError, EditResult};
use crate::filters::Filter;
use crate::geometry::ViewState;
use crate::input::InputEvent;
use crate::session::ImageSession;
use crate::tools::{Tool, ToolKind, ToolType};

/// Everything the UI needs to drive an editing session: the image, the
/// view, the active tool and any open slider dialog.
///
/// Errors from user actions don't escape; they are logged and kept as a
/// notification for the UI to show (see [`Editor::take_notification`]).
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    session: ImageSession,
    view: ViewState,
    active_tool: Option<ToolType>,
    dialog: Option<SliderDialog>,
    notification: Option<String>,
    /// Primary button went down inside the canvas and hasn't been released
    gesture_active: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            session: ImageSession::new(&config),
            view: ViewState::new(&config),
            config,
            active_tool: None,
            dialog: None,
            notification: None,
            gesture_active: false,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn session(&self) -> &ImageSession {
        &self.session
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn active_tool(&self) -> Option<&ToolType> {
        self.active_tool.as_ref()
    }

    pub fn active_tool_mut(&mut self) -> Option<&mut ToolType> {
        self.active_tool.as_mut()
    }

    pub fn dialog(&self) -> Option<&SliderDialog> {
        self.dialog.as_ref()
    }

    /// Hand out the pending error message, if any, clearing it
    pub fn take_notification(&mut self) -> Option<String> {
        self.notification.take()
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    /// Log an error and keep user-facing ones for the UI
    fn report<T>(&mut self, result: EditResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) if err.is_user_facing() => {
                warn!("{err}");
                self.notification = Some(err.to_string());
                None
            }
            Err(err) => {
                debug!("{err}");
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Input

    /// Route one input event to the active tool or a keyboard shortcut
    pub fn handle_input(&mut self, event: &InputEvent) {
        // Canvas gestures are blocked while a modal dialog is up.
        if self.dialog.is_some() && !matches!(event, InputEvent::KeyDown { .. }) {
            return;
        }

        match event {
            InputEvent::PointerDown { location, button } => {
                if *button != PointerButton::Primary || !location.is_in_canvas {
                    return;
                }
                self.gesture_active = true;
                let Some(tool) = self.active_tool.as_mut() else {
                    return;
                };
                let result = tool.on_pointer_down(location.position, &mut self.session, &self.view);
                self.report(result);
            }
            InputEvent::PointerMove { location, held_buttons } => {
                if !self.gesture_active || !held_buttons.contains(&PointerButton::Primary) {
                    return;
                }
                let Some(tool) = self.active_tool.as_mut() else {
                    return;
                };
                let result = tool.on_pointer_move(location.position, &mut self.session, &self.view);
                self.report(result);
            }
            InputEvent::PointerUp { location, button } => {
                if *button != PointerButton::Primary || !self.gesture_active {
                    return;
                }
                self.gesture_active = false;
                let Some(tool) = self.active_tool.as_mut() else {
                    return;
                };
                let result = tool.on_pointer_up(location.position, &mut self.session, &self.view);
                self.report(result);
            }
            InputEvent::KeyDown { key, .. } => self.handle_key(*key),
        }
    }

    fn handle_key(&mut self, key: Key) {
        match key {
            Key::Enter => self.confirm(),
            Key::Escape => self.cancel(),
            _ if self.dialog.is_some() => {}
            Key::Z => {
                self.undo();
            }
            Key::Y => {
                self.redo();
            }
            Key::Plus | Key::Equals => self.view.zoom_in(),
            Key::Minus => self.view.zoom_out(),
            Key::Num0 => self.view.reset_zoom(),
            _ => {
                if let Some(kind) = ToolKind::ALL.into_iter().find(|kind| kind.shortcut() == key) {
                    self.set_tool(Some(kind));
                }
            }
        }
    }

    /// Enter: confirm the open dialog, or the active tool's pending action
    pub fn confirm(&mut self) {
        if self.dialog.is_some() {
            self.confirm_dialog();
            return;
        }
        if let Some(tool) = self.active_tool.as_mut() {
            let result = tool.confirm(&mut self.session, &self.view);
            self.report(result);
        }
    }

    /// Escape: cancel the open dialog, or the active tool's pending action
    pub fn cancel(&mut self) {
        if self.dialog.is_some() {
            self.cancel_dialog();
            return;
        }
        if let Some(tool) = self.active_tool.as_mut() {
            tool.cancel(&mut self.session);
        }
    }

    // ------------------------------------------------------------------
    // Tools

    /// Switch tools. The previous tool is deactivated first, which drops any
    /// preview it was showing.
    pub fn set_tool(&mut self, kind: Option<ToolKind>) {
        if self.active_tool.as_ref().map(|tool| tool.kind()) == kind {
            return;
        }
        if let Some(mut previous) = self.active_tool.take() {
            previous.deactivate(&mut self.session);
        }
        if let Some(kind) = kind {
            let mut tool = ToolType::new(kind, &self.config);
            tool.activate(&mut self.session);
            info!("Tool selected: {}", tool.name());
            self.active_tool = Some(tool);
        }
    }

    fn release_tool(&mut self) {
        if let Some(tool) = self.active_tool.as_mut() {
            tool.deactivate(&mut self.session);
        }
        self.gesture_active = false;
    }

    /// Preview a rotation with the rotate tool, activating it if needed
    pub fn set_rotation(&mut self, degrees: f32, expand: bool) {
        self.set_tool(Some(ToolKind::Rotate));
        if let Some(ToolType::Rotate(tool)) = self.active_tool.as_mut() {
            let result = tool.set(degrees, expand, &mut self.session);
            self.report(result);
        }
    }

    // ------------------------------------------------------------------
    // View

    pub fn set_viewport(&mut self, size: Vec2) {
        self.view.set_viewport(size);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.view.set_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.view.reset_zoom();
    }

    // ------------------------------------------------------------------
    // File operations

    /// Open an image. On failure the current session stays as it was.
    pub fn open(&mut self, path: &Path) -> bool {
        self.close_dialog();
        self.release_tool();
        let result = self.session.load(path);
        self.report(result).is_some()
    }

    pub fn new_image(&mut self, width: i64, height: i64, fill: Color32) -> bool {
        self.close_dialog();
        self.release_tool();
        let result = self.session.create_blank(width, height, fill).map(|_| ());
        self.report(result).is_some()
    }

    /// Save to the session path
    pub fn save(&mut self) -> Option<PathBuf> {
        let result = self.session.save(None);
        self.report(result)
    }

    pub fn save_as(&mut self, path: &Path) -> Option<PathBuf> {
        let result = self.session.save(Some(path));
        self.report(result)
    }

    // ------------------------------------------------------------------
    // Edits

    /// Run a one-shot command, discarding any open dialog or tool gesture first
    pub fn run(&mut self, command: Command) -> bool {
        self.close_dialog();
        self.release_tool();
        let result = self.session.execute(&command);
        self.report(result).unwrap_or(false)
    }

    pub fn apply_filter(&mut self, filter: Filter) -> bool {
        self.run(Command::Filter(filter))
    }

    pub fn blur(&mut self) -> bool {
        self.apply_filter(Filter::Blur {
            sigma: self.config.blur_sigma,
        })
    }

    /// Show a filter result without committing it
    pub fn preview_filter(&mut self, filter: Filter) {
        let result = self.session.preview(|image| Ok(filter.apply(image)));
        self.report(result);
    }

    pub fn clear_preview(&mut self) {
        self.session.clear_preview();
    }

    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.run(Command::Resize { width, height })
    }

    pub fn reset(&mut self) -> bool {
        self.close_dialog();
        self.release_tool();
        let result = self.session.reset();
        self.report(result).unwrap_or(false)
    }

    pub fn undo(&mut self) -> bool {
        self.close_dialog();
        self.release_tool();
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.close_dialog();
        self.release_tool();
        self.session.redo()
    }

    // ------------------------------------------------------------------
    // Slider dialogs

    /// Open an adjustment dialog. Fails with [`EditError::NoActiveImage`]
    /// when there is nothing to adjust.
    pub fn open_dialog(&mut self, make: impl FnOnce(&ImageSession) -> SliderDialog) -> bool {
        if !self.session.has_image() {
            self.report::<()>(Err(EditError::NoActiveImage));
            return false;
        }
        self.close_dialog();
        self.release_tool();
        self.dialog = Some(make(&self.session));
        true
    }

    pub fn set_dialog_value(&mut self, kind: AdjustmentKind, value: i32) -> bool {
        match self.dialog.as_mut() {
            Some(dialog) => dialog.set_value(kind, value, &mut self.session),
            None => false,
        }
    }

    pub fn confirm_dialog(&mut self) -> bool {
        match self.dialog.take() {
            Some(mut dialog) => dialog.confirm(&mut self.session),
            None => false,
        }
    }

    pub fn cancel_dialog(&mut self) {
        if let Some(mut dialog) = self.dialog.take() {
            dialog.cancel(&mut self.session);
        }
    }

    fn close_dialog(&mut self) {
        self.cancel_dialog();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Pos2, vec2};

    fn editor_with_image() -> Editor {
        let mut editor = Editor::default();
        assert!(editor.new_image(50, 50, Color32::WHITE));
        editor.set_viewport(vec2(50.0, 50.0));
        editor
    }

    #[test]
    fn test_keyboard_undo_redo() {
        let mut editor = editor_with_image();
        editor.run(Command::Mirror);
        editor.run(Command::Flip);
        assert_eq!(editor.session().history().len(), 3);

        editor.handle_input(&InputEvent::key(Key::Z));
        assert_eq!(editor.session().history().len(), 2);
        editor.handle_input(&InputEvent::key(Key::Y));
        assert_eq!(editor.session().history().len(), 3);
    }

    #[test]
    fn test_degenerate_crop_becomes_notification() {
        let mut editor = editor_with_image();
        editor.set_tool(Some(ToolKind::Crop));

        editor.handle_input(&InputEvent::press(Pos2::new(10.0, 10.0)));
        editor.handle_input(&InputEvent::release(Pos2::new(10.0, 30.0)));
        editor.handle_input(&InputEvent::key(Key::Enter));

        assert_eq!(editor.session().history().len(), 1);
        let message = editor.take_notification().unwrap();
        assert!(message.contains("crop"), "{message}");
        assert!(editor.take_notification().is_none());
    }

    #[test]
    fn test_switching_tools_drops_rotation_preview() {
        let mut editor = editor_with_image();
        editor.set_rotation(30.0, true);
        assert!(editor.session().is_previewing());

        editor.set_tool(Some(ToolKind::Draw));
        assert!(!editor.session().is_previewing());
        assert_eq!(editor.session().history().len(), 1);
    }

    #[test]
    fn test_dialog_blocks_canvas_input() {
        let mut editor = editor_with_image();
        editor.set_tool(Some(ToolKind::Draw));
        assert!(editor.open_dialog(SliderDialog::brightness));
        // Pointer input is ignored while the dialog is open
        editor.handle_input(&InputEvent::press(Pos2::new(10.0, 10.0)));
        editor.handle_input(&InputEvent::release(Pos2::new(10.0, 10.0)));
        assert!(!editor.session().has_uncommitted_changes());

        assert!(editor.set_dialog_value(AdjustmentKind::Brightness, -50));
        editor.handle_input(&InputEvent::key(Key::Escape));
        assert!(editor.dialog().is_none());
        assert!(!editor.session().has_uncommitted_changes());
        assert_eq!(editor.session().history().len(), 1);
    }

    #[test]
    fn test_undone_adjustment_does_not_resurface() {
        let mut editor = Editor::default();
        editor.new_image(4, 4, Color32::from_rgb(100, 100, 100));
        assert!(editor.open_dialog(SliderDialog::brightness));
        editor.set_dialog_value(AdjustmentKind::Brightness, 50);
        editor.handle_input(&InputEvent::key(Key::Enter));
        assert!(editor.undo());

        // A fresh dialog starts from the restored values
        assert!(editor.open_dialog(SliderDialog::brightness));
        assert_eq!(editor.dialog().map(|d| d.value(AdjustmentKind::Brightness)), Some(0));
        editor.cancel_dialog();

        assert!(editor.open_dialog(SliderDialog::contrast));
        editor.set_dialog_value(AdjustmentKind::Contrast, 10);
        let red = editor.session().current().unwrap().to_rgba8().get_pixel(0, 0)[0];
        assert!(red < 110, "undone brightness came back: {red}");
    }

    #[test]
    fn test_dialog_needs_an_image() {
        let mut editor = Editor::default();
        assert!(!editor.open_dialog(SliderDialog::contrast));
        assert!(editor.take_notification().is_some());
    }
}
