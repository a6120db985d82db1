use egui::Color32;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adjust::{AdjustmentKind, Adjustments};
use crate::command::{Command, EditHistory};
use crate::config::EditorConfig;
use crate::error::{EditError, EditResult};
use crate::event::{EventBus, SessionEvent};
use crate::geometry::ImagePoint;
use crate::histogram::Histogram;
use crate::stroke::{self, Brush};

/// The image being edited and everything needed to undo changes to it.
///
/// Every visible change goes through one of three paths:
/// - [`ImageSession::apply`] / [`ImageSession::execute`] replace the image
///   and record exactly one history entry;
/// - [`ImageSession::adjust`] and [`ImageSession::draw_segment`] change the
///   image in place without history, until a matching
///   [`ImageSession::commit_adjustment`] / [`ImageSession::commit_stroke`];
/// - [`ImageSession::preview`] shows a trial result without touching the
///   image at all.
///
/// All editing operations are no-ops while no image is open.
pub struct ImageSession {
    current: Option<DynamicImage>,
    original: Option<Arc<DynamicImage>>,
    path: Option<PathBuf>,
    history: EditHistory,
    /// Slider values the current image was computed with
    adjustments: Adjustments,
    /// Slider values as of the last commit, restored on cancel
    committed_adjustments: Adjustments,
    preview: Option<DynamicImage>,
    /// `current` differs from the top of the history
    uncommitted: bool,
    default_extension: String,
    events: EventBus,
    /// Bumped whenever the displayed image changes
    revision: u64,
}

impl Default for ImageSession {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl std::fmt::Debug for ImageSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSession")
            .field("size", &self.current.as_ref().map(|i| (i.width(), i.height())))
            .field("path", &self.path)
            .field("history", &self.history)
            .field("adjustments", &self.adjustments)
            .field("previewing", &self.preview.is_some())
            .field("uncommitted", &self.uncommitted)
            .finish_non_exhaustive()
    }
}

impl ImageSession {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            current: None,
            original: None,
            path: None,
            history: EditHistory::new(config.history_capacity),
            adjustments: Adjustments::default(),
            committed_adjustments: Adjustments::default(),
            preview: None,
            uncommitted: false,
            default_extension: config.default_extension.clone(),
            events: EventBus::new(),
            revision: 0,
        }
    }

    // ------------------------------------------------------------------
    // Accessors

    /// The image being edited, including uncommitted strokes or adjustments
    pub fn current(&self) -> Option<&DynamicImage> {
        self.current.as_ref()
    }

    /// The image as first loaded or created
    pub fn original(&self) -> Option<&DynamicImage> {
        self.original.as_deref()
    }

    /// What the canvas should show: the preview if there is one, else `current`
    pub fn display_image(&self) -> Option<&DynamicImage> {
        self.preview.as_ref().or(self.current.as_ref())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn adjustments(&self) -> Adjustments {
        self.adjustments
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Changes every time [`ImageSession::display_image`] would return
    /// different pixels. Renderers compare it to skip texture uploads.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn has_image(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_some()
    }

    /// Whether `current` holds changes that are not in the history yet
    pub fn has_uncommitted_changes(&self) -> bool {
        self.uncommitted
    }

    /// Width and height of the displayed image
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.display_image().map(|image| (image.width(), image.height()))
    }

    // ------------------------------------------------------------------
    // Starting a session

    /// Open an image file, replacing the current session.
    ///
    /// On failure the previous session is left untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> EditResult<()> {
        let path = path.as_ref();
        let image = decode(path)?;
        let (width, height) = (image.width(), image.height());
        info!("Loaded {} ({}x{})", path.display(), width, height);

        self.install(image, Some(path.to_path_buf()));
        self.events.emit(SessionEvent::Loaded {
            path: path.to_path_buf(),
            width,
            height,
        });
        Ok(())
    }

    /// Start a new session with a uniformly filled image
    pub fn create_blank(&mut self, width: i64, height: i64, fill: Color32) -> EditResult<&DynamicImage> {
        let invalid = || EditError::InvalidDimensions { width, height };
        if width <= 0 || height <= 0 {
            return Err(invalid());
        }
        let w = u32::try_from(width).map_err(|_| invalid())?;
        let h = u32::try_from(height).map_err(|_| invalid())?;

        info!("Created blank {}x{} image", w, h);
        self.install(stroke::blank(w, h, fill), None);
        self.events.emit(SessionEvent::Created { width: w, height: h });
        self.current.as_ref().ok_or(EditError::NoActiveImage)
    }

    fn install(&mut self, image: DynamicImage, path: Option<PathBuf>) {
        self.history.clear();
        self.history.push(&image);
        self.original = Some(Arc::new(image.clone()));
        self.current = Some(image);
        self.path = path;
        self.adjustments = Adjustments::default();
        self.committed_adjustments = Adjustments::default();
        self.preview = None;
        self.uncommitted = false;
        self.touch();
    }

    // ------------------------------------------------------------------
    // Committed edits

    /// Replace the image with `f(current)` and record one history entry.
    ///
    /// Returns `Ok(false)` when no image is open. If `f` fails nothing
    /// changes.
    pub fn apply<F>(&mut self, label: &'static str, f: F) -> EditResult<bool>
    where
        F: FnOnce(&DynamicImage) -> EditResult<DynamicImage>,
    {
        let Some(current) = self.current.as_ref() else {
            debug!("Ignoring {label}: no image open");
            return Ok(false);
        };
        let next = f(current)?;

        self.history.push_with(&next, self.adjustments);
        self.current = Some(next);
        self.preview = None;
        self.uncommitted = false;
        self.committed_adjustments = self.adjustments;
        self.touch();

        info!("Committed {label}");
        self.events.emit(SessionEvent::Committed { label });
        Ok(true)
    }

    /// Run a command through [`ImageSession::apply`]
    pub fn execute(&mut self, command: &Command) -> EditResult<bool> {
        self.apply(command.label(), |image| command.execute(image))
    }

    /// Go back to the original image, as one undoable step
    pub fn reset(&mut self) -> EditResult<bool> {
        let Some(original) = self.original.clone() else {
            return Ok(false);
        };
        self.adjustments = Adjustments::default();
        self.apply("Reset", |_| Ok((*original).clone()))
    }

    /// Step back one committed state.
    ///
    /// If there are uncommitted strokes or adjustments, only those are
    /// dropped. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.current.is_none() {
            return false;
        }
        if self.uncommitted {
            self.adjustments = self.committed_adjustments;
            self.discard_uncommitted();
            self.clear_preview();
            self.events.emit(SessionEvent::Undone);
            return true;
        }
        if !self.history.can_undo() {
            return false;
        }
        match self.history.undo() {
            Some(image) => {
                self.restore(image);
                debug!("Undo ({} states left)", self.history.len());
                self.events.emit(SessionEvent::Undone);
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone state
    pub fn redo(&mut self) -> bool {
        if self.current.is_none() {
            return false;
        }
        match self.history.redo() {
            Some(image) => {
                self.restore(image);
                debug!("Redo ({} states left)", self.history.redo_len());
                self.events.emit(SessionEvent::Redone);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, image: DynamicImage) {
        self.adjustments = self.history.top_adjustments();
        self.committed_adjustments = self.adjustments;
        self.current = Some(image);
        self.preview = None;
        self.uncommitted = false;
        self.touch();
    }

    // ------------------------------------------------------------------
    // Continuous adjustments

    /// Recompute the image from the original with one slider changed.
    ///
    /// Nothing is recorded until [`ImageSession::commit_adjustment`], so
    /// dragging a slider never floods the history.
    pub fn adjust(&mut self, kind: AdjustmentKind, value: i32) -> bool {
        let Some(original) = self.original.as_deref() else {
            return false;
        };
        self.adjustments.set(kind, value);
        self.current = Some(self.adjustments.apply(original));
        self.preview = None;
        self.uncommitted = true;
        self.touch();

        self.events.emit(SessionEvent::Adjusted {
            kind,
            value: self.adjustments.get(kind),
        });
        true
    }

    /// Record the adjusted image as one history entry
    pub fn commit_adjustment(&mut self) -> bool {
        if self.commit_in_place("Adjust") {
            self.committed_adjustments = self.adjustments;
            true
        } else {
            false
        }
    }

    /// Drop uncommitted adjustments and return to the last committed image
    pub fn cancel_adjustment(&mut self) {
        self.adjustments = self.committed_adjustments;
        self.discard_uncommitted();
    }

    // ------------------------------------------------------------------
    // Freehand strokes

    /// Paint a dot straight into the current image, without history
    pub fn draw_dot(&mut self, at: ImagePoint, brush: &Brush) -> bool {
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        stroke::draw_dot(current, at, brush);
        self.preview = None;
        self.uncommitted = true;
        self.touch();
        true
    }

    /// Paint a line straight into the current image, without history
    pub fn draw_segment(&mut self, from: ImagePoint, to: ImagePoint, brush: &Brush) -> bool {
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        stroke::draw_segment(current, from, to, brush);
        self.preview = None;
        self.uncommitted = true;
        self.touch();
        true
    }

    /// Record the finished stroke as one history entry
    pub fn commit_stroke(&mut self) -> bool {
        self.commit_in_place("Draw")
    }

    fn commit_in_place(&mut self, label: &'static str) -> bool {
        if !self.uncommitted {
            return false;
        }
        let Some(current) = self.current.as_ref() else {
            return false;
        };
        self.history.push_with(current, self.adjustments);
        self.uncommitted = false;

        info!("Committed {label}");
        self.events.emit(SessionEvent::Committed { label });
        true
    }

    /// Throw away in-place changes and show the last committed state again
    pub fn discard_uncommitted(&mut self) {
        if !self.uncommitted {
            return;
        }
        if let Some(top) = self.history.top() {
            self.current = Some(top);
        }
        self.uncommitted = false;
        self.touch();
        debug!("Discarded uncommitted changes");
    }

    // ------------------------------------------------------------------
    // Previews

    /// Show `f(current)` without committing it
    pub fn preview<F>(&mut self, f: F) -> EditResult<bool>
    where
        F: FnOnce(&DynamicImage) -> EditResult<DynamicImage>,
    {
        let Some(current) = self.current.as_ref() else {
            return Ok(false);
        };
        self.preview = Some(f(current)?);
        self.touch();
        self.events.emit(SessionEvent::Previewed);
        Ok(true)
    }

    pub fn clear_preview(&mut self) {
        if self.preview.take().is_some() {
            self.touch();
            self.events.emit(SessionEvent::PreviewCleared);
        }
    }

    // ------------------------------------------------------------------
    // Inspection and output

    /// Channel histogram of the displayed image
    pub fn histogram(&self) -> Option<Histogram> {
        self.display_image().map(Histogram::from_image)
    }

    /// Write the current image to `path`, or to the stored path if `None`.
    ///
    /// The format follows the extension; a path without one gets the
    /// configured default extension. A successful save remembers the path.
    pub fn save(&mut self, path: Option<&Path>) -> EditResult<PathBuf> {
        let image = self.current.as_ref().ok_or(EditError::NoActiveImage)?;
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => self.path.clone().ok_or(EditError::NoPathSet)?,
        };
        let target = with_default_extension(target, &self.default_extension);

        encode(image, &target)?;
        info!("Saved {}", target.display());

        self.path = Some(target.clone());
        self.events.emit(SessionEvent::Saved { path: target.clone() });
        Ok(target)
    }
}

fn with_default_extension(mut path: PathBuf, extension: &str) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension(extension.trim_start_matches('.'));
    }
    path
}

fn io_failure(path: &Path, source: std::io::Error) -> EditError {
    EditError::IoFailure {
        path: path.to_path_buf(),
        source,
    }
}

fn decode(path: &Path) -> EditResult<DynamicImage> {
    let reader = ImageReader::open(path)
        .map_err(|err| io_failure(path, err))?
        .with_guessed_format()
        .map_err(|err| io_failure(path, err))?;

    if reader.format().is_none() {
        warn!("Unrecognised image format: {}", path.display());
        return Err(EditError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    reader.decode().map_err(|err| match err {
        ImageError::IoError(source) => io_failure(path, source),
        err @ (ImageError::Decoding(_) | ImageError::Unsupported(_)) => {
            warn!("Failed to decode {}: {}", path.display(), err);
            EditError::UnsupportedFormat {
                path: path.to_path_buf(),
            }
        }
        other => EditError::Imaging(other),
    })
}

fn encode(image: &DynamicImage, path: &Path) -> EditResult<()> {
    let format = ImageFormat::from_path(path).map_err(|_| EditError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    // JPEG has no alpha channel and GIF frames are RGBA only.
    let converted = match format {
        ImageFormat::Jpeg => Some(DynamicImage::ImageRgb8(image.to_rgb8())),
        ImageFormat::Gif => Some(DynamicImage::ImageRgba8(image.to_rgba8())),
        _ => None,
    };
    let image = converted.as_ref().unwrap_or(image);

    image.save_with_format(path, format).map_err(|err| match err {
        ImageError::IoError(source) => io_failure(path, source),
        ImageError::Unsupported(_) => EditError::UnsupportedFormat {
            path: path.to_path_buf(),
        },
        other => EditError::Imaging(other),
    })
}
