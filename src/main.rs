#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use clap::Parser;
use std::path::PathBuf;

use eframe_photo::{EditorConfig, PhotoApp};

/// Simple raster photo editor
#[derive(Parser, Debug)]
#[command(name = "eframe_photo", version)]
struct Args {
    /// Image to open on startup
    image: Option<PathBuf>,

    /// JSON config file (overrides the EFRAME_PHOTO_CONFIG variable)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EditorConfig::load_or_default(path),
        None => EditorConfig::from_env(),
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 720.0])
            .with_min_inner_size([480.0, 320.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "eframe_photo",
        native_options,
        Box::new(move |cc| Ok(Box::new(PhotoApp::new(cc, config, args.image)))),
    )
}
