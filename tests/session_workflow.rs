use eframe_photo::adjust::{AdjustmentKind, Adjustments};
use eframe_photo::event::SessionEvent;
use eframe_photo::{Command, EditError, EditorConfig, Filter, ImageSession};
use egui::Color32;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x * 20) as u8, (y * 30) as u8, 90]))
}

#[test]
fn test_load_edit_save_roundtrip() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("input.png");
    gradient(8, 6).save(&source).unwrap();

    let mut session = ImageSession::default();
    session.load(&source).unwrap();
    assert_eq!(session.dimensions(), Some((8, 6)));
    assert_eq!(session.path(), Some(source.as_path()));
    assert_eq!(session.history().len(), 1);

    session.execute(&Command::Mirror).unwrap();
    let target = dir.path().join("output.png");
    let saved = session.save(Some(target.as_path())).unwrap();
    assert_eq!(saved, target);
    assert_eq!(session.path(), Some(target.as_path()));

    let reloaded = image::open(&target).unwrap();
    assert_eq!(reloaded.dimensions(), (8, 6));
    // Mirrored: the right-most column now holds what was column 0
    assert_eq!(reloaded.to_rgb8().get_pixel(7, 2).0, [0, 60, 90]);
}

#[test]
fn test_save_without_extension_uses_default() {
    let dir = tempdir().unwrap();
    let mut session = ImageSession::default();
    session.create_blank(5, 5, Color32::from_rgba_unmultiplied(10, 20, 30, 128)).unwrap();

    let saved = session.save(Some(dir.path().join("untitled").as_path())).unwrap();
    assert_eq!(saved.extension().and_then(|e| e.to_str()), Some("jpg"));
    // JPEG has no alpha, but the save still succeeds
    assert_eq!(image::open(&saved).unwrap().dimensions(), (5, 5));

    // A second save goes to the remembered path
    assert_eq!(session.save(None).unwrap(), saved);
}

#[test]
fn test_unsupported_file_leaves_session_untouched() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.png");
    gradient(3, 3).save(&good).unwrap();
    let text = dir.path().join("notes.txt");
    std::fs::write(&text, "definitely not pixels").unwrap();
    let fake = dir.path().join("fake.png");
    std::fs::write(&fake, "also not pixels").unwrap();

    let mut session = ImageSession::default();
    session.load(&good).unwrap();
    session.execute(&Command::Flip).unwrap();
    let before = session.current().unwrap().clone();

    for bad in [&text, &fake] {
        let err = session.load(bad).unwrap_err();
        assert!(matches!(err, EditError::UnsupportedFormat { .. }), "{err:?}");
    }
    let missing = session.load(dir.path().join("missing.png")).unwrap_err();
    assert!(matches!(missing, EditError::IoFailure { .. }), "{missing:?}");

    assert_eq!(session.current(), Some(&before));
    assert_eq!(session.path(), Some(good.as_path()));
    assert_eq!(session.history().len(), 2);
}

#[test]
fn test_undo_redo_restore_exact_pixels() {
    let mut session = ImageSession::default();
    session.create_blank(4, 2, Color32::from_rgb(200, 10, 10)).unwrap();
    let blank = session.current().unwrap().clone();

    session.execute(&Command::Filter(Filter::Invert)).unwrap();
    let inverted = session.current().unwrap().clone();
    session.execute(&Command::QuarterTurn).unwrap();
    let turned = session.current().unwrap().clone();
    assert_eq!(turned.dimensions(), (2, 4));

    assert!(session.undo());
    assert_eq!(session.current(), Some(&inverted));
    assert!(session.undo());
    assert_eq!(session.current(), Some(&blank));
    // Floor reached
    assert!(!session.undo());
    assert_eq!(session.current(), Some(&blank));

    assert!(session.redo());
    assert!(session.redo());
    assert_eq!(session.current(), Some(&turned));
    assert!(!session.redo());
}

#[test]
fn test_new_edit_clears_redo() {
    let mut session = ImageSession::default();
    session.create_blank(3, 3, Color32::WHITE).unwrap();
    session.execute(&Command::Mirror).unwrap();
    session.undo();
    assert!(session.history().can_redo());

    session.execute(&Command::Flip).unwrap();
    assert!(!session.history().can_redo());
    assert!(!session.redo());
}

#[test]
fn test_history_is_bounded_by_config() {
    let config = EditorConfig {
        history_capacity: 4,
        ..EditorConfig::default()
    };
    let mut session = ImageSession::new(&config);
    session.create_blank(2, 2, Color32::WHITE).unwrap();
    for _ in 0..10 {
        session.execute(&Command::Mirror).unwrap();
    }
    assert_eq!(session.history().len(), 4);

    let undone = std::iter::from_fn(|| session.undo().then_some(())).count();
    assert_eq!(undone, 3);
}

#[test]
fn test_adjustments_are_computed_from_original() {
    let mut session = ImageSession::default();
    session.create_blank(2, 2, Color32::from_rgb(100, 100, 100)).unwrap();
    let original = session.current().unwrap().clone();

    session.adjust(AdjustmentKind::Brightness, 30);
    let once = session.current().unwrap().clone();
    session.adjust(AdjustmentKind::Brightness, 30);
    assert_eq!(session.current(), Some(&once));
    assert_eq!(once.get_pixel(0, 0).0[0], 130);

    session.adjust(AdjustmentKind::Brightness, 0);
    assert_eq!(session.current(), Some(&original));
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_committed_adjustment_is_one_undo_step() {
    let mut session = ImageSession::default();
    session.create_blank(2, 2, Color32::from_rgb(100, 100, 100)).unwrap();

    for value in (0..=50).step_by(10) {
        session.adjust(AdjustmentKind::Contrast, value);
    }
    assert!(session.commit_adjustment());
    assert_eq!(session.history().len(), 2);

    assert!(session.undo());
    assert_eq!(session.current().unwrap().get_pixel(1, 1).0[0], 100);
}

#[test]
fn test_reset_returns_to_original() {
    let mut session = ImageSession::default();
    session.create_blank(6, 3, Color32::BLUE).unwrap();
    let original = session.current().unwrap().clone();
    session.execute(&Command::Resize { width: 3, height: 3 }).unwrap();
    session.execute(&Command::Filter(Filter::Grayscale)).unwrap();

    assert!(session.reset().unwrap());
    assert_eq!(session.current(), Some(&original));
    // Reset itself can be undone
    assert!(session.undo());
    assert_eq!(session.dimensions(), Some((3, 3)));
}

#[test]
fn test_failed_command_changes_nothing() {
    let mut session = ImageSession::default();
    session.create_blank(4, 4, Color32::WHITE).unwrap();
    let result = session.execute(&Command::Resize { width: 0, height: 4 });
    assert!(matches!(result, Err(EditError::InvalidDimensions { .. })));
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.dimensions(), Some((4, 4)));
}

#[test]
fn test_events_are_broadcast_in_order() {
    let mut session = ImageSession::default();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    session.events().subscribe(Box::new(move |event: &SessionEvent| {
        sink.lock().unwrap().push(event.clone());
    }));

    session.create_blank(2, 2, Color32::WHITE).unwrap();
    session.execute(&Command::Mirror).unwrap();
    session.undo();
    session.redo();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            SessionEvent::Created { width: 2, height: 2 },
            SessionEvent::Committed { label: "Mirror" },
            SessionEvent::Undone,
            SessionEvent::Redone,
        ]
    );
}

#[test]
fn test_preview_is_shown_but_not_committed() {
    let mut session = ImageSession::default();
    let image = DynamicImage::ImageRgb8(gradient(4, 4));
    session.create_blank(4, 4, Color32::WHITE).unwrap();
    session.apply("Paste", |_| Ok(image.clone())).unwrap();

    session.preview(|img| Ok(Filter::Invert.apply(img))).unwrap();
    assert!(session.is_previewing());
    assert_ne!(session.display_image(), session.current());
    assert_eq!(session.current(), Some(&image));

    session.clear_preview();
    assert_eq!(session.display_image(), Some(&image));
    assert_eq!(session.history().len(), 2);
}

#[test]
fn test_undone_adjustment_stays_undone() {
    let mut session = ImageSession::default();
    session.create_blank(2, 2, Color32::from_rgb(100, 100, 100)).unwrap();
    session.adjust(AdjustmentKind::Brightness, 50);
    assert!(session.commit_adjustment());
    assert_eq!(session.current().unwrap().get_pixel(0, 0).0[0], 150);

    assert!(session.undo());
    assert_eq!(session.adjustments(), Adjustments::default());

    // A later slider move starts from the undone state, not the old brightness
    session.adjust(AdjustmentKind::Contrast, 0);
    assert_eq!(session.current().unwrap().get_pixel(0, 0).0[0], 100);
    session.cancel_adjustment();

    assert!(session.redo());
    assert_eq!(session.adjustments().brightness, 50);
    assert_eq!(session.current().unwrap().get_pixel(0, 0).0[0], 150);
}

#[test]
fn test_undo_drops_pending_changes_first() {
    let mut session = ImageSession::default();
    session.create_blank(3, 1, Color32::from_rgb(100, 100, 100)).unwrap();
    session.execute(&Command::Mirror).unwrap();
    let mirrored = session.current().unwrap().clone();

    session.adjust(AdjustmentKind::Brightness, -50);
    assert!(session.undo());
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.current(), Some(&mirrored));
    assert_eq!(session.adjustments(), Adjustments::default());
    assert!(!session.has_uncommitted_changes());

    assert!(session.undo());
    assert_eq!(session.history().len(), 1);
}
