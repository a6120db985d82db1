use log::info;
use std::path::PathBuf;

use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::event::SessionEvent;
use crate::file_handler::FileHandler;
use crate::input::InputHandler;
use crate::panels::{self, PanelState};
use crate::renderer::Renderer;
use crate::stroke::PALETTE;
use crate::tools::ToolType;

/// UI preferences restored between runs. The image itself is never persisted.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Preferences {
    pub zoom: f32,
    /// Index into the draw palette
    pub palette_index: usize,
    pub brush_radius: u32,
    pub color_pop_tolerance: u8,
    pub last_dir: Option<PathBuf>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl Preferences {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            zoom: 1.0,
            palette_index: 0,
            brush_radius: config.brush_radius,
            color_pop_tolerance: config.color_pop_tolerance,
            last_dir: None,
        }
    }
}

pub struct PhotoApp {
    pub(crate) editor: Editor,
    pub(crate) renderer: Renderer,
    pub(crate) input: InputHandler,
    pub(crate) files: FileHandler,
    pub(crate) prefs: Preferences,
    pub(crate) panels: PanelState,
}

impl std::fmt::Debug for PhotoApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoApp")
            .field("editor", &self.editor)
            .field("prefs", &self.prefs)
            .finish_non_exhaustive()
    }
}

impl PhotoApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig, initial_path: Option<PathBuf>) -> Self {
        let prefs = cc
            .storage
            .and_then(|storage| eframe::get_value::<Preferences>(storage, eframe::APP_KEY))
            .unwrap_or_else(|| Preferences::from_config(&config));

        let mut editor = Editor::new(config);
        editor.set_zoom(prefs.zoom);
        let ctx = cc.egui_ctx.clone();
        editor.session().events().subscribe(Box::new(move |event: &SessionEvent| {
            if let Some(title) = window_title(event) {
                ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
            }
        }));
        if let Some(path) = initial_path {
            info!("Opening {} from the command line", path.display());
            editor.open(&path);
        }

        Self {
            editor,
            renderer: Renderer::new(cc),
            input: InputHandler::new(egui::Rect::NOTHING),
            files: FileHandler::new(prefs.last_dir.clone()),
            prefs,
            panels: PanelState::default(),
        }
    }

    /// Push the remembered brush and tolerance into the active tool
    pub(crate) fn sync_tool_settings(&mut self) {
        let color = PALETTE[self.prefs.palette_index.min(PALETTE.len() - 1)].1;
        match self.editor.active_tool_mut() {
            Some(ToolType::Draw(tool)) => {
                tool.set_color(color);
                tool.set_radius(self.prefs.brush_radius);
            }
            Some(ToolType::ColorPop(tool)) => tool.set_tolerance(self.prefs.color_pop_tolerance),
            _ => {}
        }
    }

    pub(crate) fn open_with_dialog(&mut self) {
        if let Some(path) = self.files.pick_open_path() {
            self.editor.open(&path);
        }
    }

    /// Save to the current path, asking for one if the image has none yet
    pub(crate) fn save(&mut self) {
        if self.editor.session().path().is_some() {
            self.editor.save();
        } else {
            self.save_with_dialog();
        }
    }

    pub(crate) fn save_with_dialog(&mut self) {
        let current = self.editor.session().path().map(|p| p.to_path_buf());
        if let Some(path) = self.files.pick_save_path(current.as_deref()) {
            self.editor.save_as(&path);
        }
    }
}

/// Window title after an event that changes which file is being edited
fn window_title(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::Loaded { path, .. } | SessionEvent::Saved { path } => {
            let name = path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            Some(format!("{name} - eframe_photo"))
        }
        SessionEvent::Created { .. } => Some("Untitled - eframe_photo".to_owned()),
        _ => None,
    }
}

impl eframe::App for PhotoApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.prefs.zoom = self.editor.view().zoom_factor();
        self.prefs.last_dir = self.files.last_dir().map(|dir| dir.to_path_buf());
        eframe::set_value(storage, eframe::APP_KEY, &self.prefs);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(path) = self.files.take_dropped_image(ctx) {
            self.editor.open(&path);
        }
        if let Some(message) = self.editor.take_notification() {
            self.panels.notification = Some(message);
        }

        self.sync_tool_settings();

        panels::menu_bar(self, ctx);
        panels::status_bar(self, ctx);
        panels::tools_panel(self, ctx);
        panels::dialogs(self, ctx);
        panels::central_panel(self, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_title_follows_file() {
        let loaded = SessionEvent::Loaded {
            path: PathBuf::from("/photos/cat.png"),
            width: 1,
            height: 1,
        };
        assert_eq!(window_title(&loaded).as_deref(), Some("cat.png - eframe_photo"));
        assert_eq!(
            window_title(&SessionEvent::Created { width: 1, height: 1 }).as_deref(),
            Some("Untitled - eframe_photo")
        );
        assert!(window_title(&SessionEvent::Undone).is_none());
    }

    #[test]
    fn test_preferences_fill_missing_fields() {
        let prefs: Preferences = serde_json::from_str(r#"{"zoom": 2.0}"#).unwrap();
        assert_eq!(prefs.zoom, 2.0);
        assert_eq!(prefs.brush_radius, EditorConfig::default().brush_radius);
    }
}
