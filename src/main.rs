//! Cerberus - markdown editor with live preview
//!
//! A single-document editor with autosave, file open/save and print export.

mod app;
mod core;
mod markdown;
mod ui;

use app::CerberusApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting Cerberus...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_drag_and_drop(true)
            .with_title("Cerberus"),
        ..Default::default()
    };

    eframe::run_native(
        "Cerberus",
        native_options,
        Box::new(|cc| Ok(Box::new(CerberusApp::new(cc)))),
    )
}
