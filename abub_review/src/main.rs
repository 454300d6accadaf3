//! # abub_review
//!
//! Part of the abub_review crate family.
//!
//! This is the application to review autobub bubble candidates with a GUI
//! using [egui](https://github.com/emilk/egui).
//!
//! ## Install
//!
//! Use `cargo install --path ./abub_review`
//!
//! ## Use
//!
//! To launch the application simply invoke it after it is installed
//!
//! ```bash
//! abub_review
//! ```
//!
//! Fill out the configuration fields and click the start button to begin
//! reviewing. Each candidate is shown as a looping flip-book of the frames
//! around its trigger frame with the reconstructed position circled; press
//! one of the listed keys to classify it, or `q` to stop. The aggregate
//! report is shown when the session ends.
//!
//! Configurations can be saved using File->Save and loaded using File->Open

mod app;
use app::ReviewerApp;
use std::fs::File;

/// The program entry point
fn main() {
    // Log to both the terminal and a shareable session log file
    match File::create("abub_review.log") {
        Ok(log_file) => {
            if let Err(e) = simplelog::CombinedLogger::init(vec![
                simplelog::TermLogger::new(
                    simplelog::LevelFilter::Info,
                    simplelog::Config::default(),
                    simplelog::TerminalMode::Mixed,
                    simplelog::ColorChoice::Auto,
                ),
                simplelog::WriteLogger::new(
                    simplelog::LevelFilter::Info,
                    simplelog::Config::default(),
                    log_file,
                ),
            ]) {
                eprintln!("Could not create logging: {e}");
            }
        }
        Err(e) => eprintln!("Could not create abub_review.log: {e}"),
    }
    log::info!("Starting abub review UI");

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Abub Review")
            .with_inner_size(eframe::epaint::vec2(900.0, 700.0))
            .with_min_inner_size(eframe::epaint::vec2(600.0, 400.0)),
        ..Default::default()
    };
    match eframe::run_native(
        "abub_review",
        native_options,
        Box::new(|cc| Ok(Box::new(ReviewerApp::new(cc)))),
    ) {
        Ok(()) => (),
        Err(e) => log::error!("Eframe error: {}", e),
    }
}
