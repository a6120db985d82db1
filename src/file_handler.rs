use eframe::egui;
use std::path::{Path, PathBuf};

/// Extensions offered in the file dialogs and accepted on drop
pub const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp"];

/// Native file dialogs and drag-and-drop, the two ways a path reaches the editor
#[derive(Debug, Default)]
pub struct FileHandler {
    /// Directory the last dialog was confirmed in
    last_dir: Option<PathBuf>,
}

impl FileHandler {
    pub fn new(last_dir: Option<PathBuf>) -> Self {
        Self { last_dir }
    }

    pub fn last_dir(&self) -> Option<&Path> {
        self.last_dir.as_deref()
    }

    fn remember_dir(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            self.last_dir = Some(parent.to_path_buf());
        }
    }

    fn dialog(&self) -> rfd::FileDialog {
        let dialog = rfd::FileDialog::new().add_filter("Images", &IMAGE_EXTENSIONS[..]);
        match &self.last_dir {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    /// Ask for an image to open. `None` if the user cancelled.
    pub fn pick_open_path(&mut self) -> Option<PathBuf> {
        let path = self.dialog().set_title("Open Image").pick_file()?;
        log::debug!("Open dialog returned {}", path.display());
        self.remember_dir(&path);
        Some(path)
    }

    /// Ask where to save, suggesting the current file name
    pub fn pick_save_path(&mut self, current: Option<&Path>) -> Option<PathBuf> {
        let mut dialog = self.dialog().set_title("Save Image As");
        if let Some(name) = current.and_then(Path::file_name) {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
        let path = dialog.save_file()?;
        log::debug!("Save dialog returned {}", path.display());
        self.remember_dir(&path);
        Some(path)
    }

    /// First image file dropped onto the window this frame, if any
    pub fn take_dropped_image(&mut self, ctx: &egui::Context) -> Option<PathBuf> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());

        for file in dropped {
            let Some(path) = file.path else {
                log::warn!("Dropped file has no path: {}", file.name);
                continue;
            };
            if is_image_path(&path) || file.mime.starts_with("image/") {
                log::info!("Image dropped: {}", path.display());
                self.remember_dir(&path);
                return Some(path);
            }
            log::warn!("Dropped file is not a supported type: {}", path.display());
        }
        None
    }

    /// Whether files are being dragged over the window
    pub fn is_hovering_files(ctx: &egui::Context) -> bool {
        ctx.input(|i| !i.raw.hovered_files.is_empty())
    }
}

/// Check if a path looks like an image based on its extension
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
