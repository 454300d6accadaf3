use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use eframe::egui::{Color32, ColorImage, RichText, TextureHandle, TextureOptions};
use rfd::FileDialog;

use libabub_review::config::Config;
use libabub_review::constants::{FRAME_FLIP_DELAY, KEY_CAPTION, MARKER_RADIUS};
use libabub_review::report::summarize;
use libabub_review::review::ReviewSession;

fn render_error_dialog(show: &mut bool, ctx: &eframe::egui::Context) {
    eframe::egui::Window::new("Error")
        .open(show)
        .show(ctx, |ui| {
            ui.label("There was an error! Check the log file abub_review.log for more information.")
        });
}

/// Decode one raw camera frame into a GPU texture. None if the file is
/// missing or won't decode, which is a per-candidate fault, not fatal.
fn load_frame_texture(ctx: &eframe::egui::Context, path: &Path) -> Option<TextureHandle> {
    let frame = match image::open(path) {
        Ok(frame) => frame.to_rgba8(),
        Err(e) => {
            log::warn!("Could not load frame {}: {e}", path.display());
            return None;
        }
    };
    let size = [frame.width() as usize, frame.height() as usize];
    let color_image = ColorImage::from_rgba_unmultiplied(size, frame.as_raw());
    Some(ctx.load_texture(path.to_string_lossy(), color_image, TextureOptions::LINEAR))
}

/// The UI app which inherits the eframe::App trait.
///
/// The parent for the whole review session.
pub struct ReviewerApp {
    config: Config,
    session: Option<ReviewSession>,
    report_text: Option<String>,
    // Texture cache for the frame currently on screen. Failures are cached
    // too so a missing frame is only reported once per path.
    frame_texture: Option<(PathBuf, Option<TextureHandle>)>,
    last_flip: Instant,
    show_error_window: bool,
}

impl ReviewerApp {
    /// Create the application
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut visuals = eframe::egui::Visuals::dark();
        visuals.override_text_color = Some(Color32::LIGHT_GRAY);
        cc.egui_ctx.set_visuals(visuals);
        ReviewerApp {
            config: Config::default(),
            session: None,
            report_text: None,
            frame_texture: None,
            last_flip: Instant::now(),
            show_error_window: false,
        }
    }

    /// Begin a review session with the current configuration
    fn start_session(&mut self) {
        // Safety first
        if self.session.is_some() {
            return;
        }
        log::info!("Starting review session...");
        match ReviewSession::begin(self.config.clone()) {
            Ok(session) => {
                self.report_text = None;
                self.last_flip = Instant::now();
                self.session = Some(session);
            }
            Err(e) => {
                log::error!("Could not start review session: {e}");
                self.show_error_window = true;
            }
        }
    }

    /// Tear down the session and turn the accumulated log into the
    /// operator-facing report.
    fn finish_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.frame_texture = None;
        if session.was_quit() {
            log::info!("Review session quit by operator");
        } else {
            log::info!("Review session complete");
        }
        match session.stats_log().all_records() {
            Ok(records) => {
                let text = match summarize(&records) {
                    Ok(report) => report.to_string(),
                    Err(e) => e.to_string(),
                };
                log::info!("Review statistics:\n{text}");
                self.report_text = Some(text);
            }
            Err(e) => {
                log::error!("Could not read the stats log for the report: {e}");
                self.show_error_window = true;
            }
        }
    }

    /// Write the current Config to a file
    fn write_config(&mut self, path: &Path) {
        if let Ok(mut conf_file) = File::create(path) {
            match serde_yaml::to_string(&self.config) {
                Ok(yaml_str) => match conf_file.write(yaml_str.as_bytes()) {
                    Ok(_) => (),
                    Err(x) => {
                        log::error!("Error writing config to file {}: {}", path.display(), x)
                    }
                },
                Err(x) => log::error!(
                    "Unable to write configuration to file, serializer error: {}",
                    x
                ),
            };
        } else {
            self.show_error_window = true;
            log::error!("Could not open file {} for config write", path.display());
        }
    }

    /// Read the Config from a file
    fn read_config(&mut self, path: &Path) {
        match Config::read_config_file(path) {
            Ok(conf) => self.config = conf,
            Err(e) => log::error!("{}", e),
        }
    }

    /// The configuration panel shown when no session is running.
    fn setup_ui(&mut self, ui: &mut eframe::egui::Ui) {
        //Menus
        ui.menu_button("File", |ui| {
            if ui.button("Open...").clicked() {
                if let Some(path) = FileDialog::new()
                    .set_directory(
                        std::env::current_dir().expect("Couldn't access runtime directory"),
                    )
                    .add_filter("YAML file", &["yaml", "yml"])
                    .pick_file()
                {
                    self.read_config(&path);
                }
            }
            if ui.button("Save...").clicked() {
                if let Some(path) = FileDialog::new()
                    .set_directory(
                        std::env::current_dir().expect("Couldn't access runtime directory"),
                    )
                    .add_filter("YAML file", &["yaml", "yml"])
                    .save_file()
                {
                    self.write_config(&path);
                }
            }
        });

        //Config
        ui.separator();
        ui.label(
            RichText::new("Configuration")
                .color(Color32::LIGHT_BLUE)
                .size(18.0),
        );
        eframe::egui::Grid::new("ConfigGrid").show(ui, |ui| {
            //Raw image directory
            ui.label(format!(
                "Raw image directory: {}",
                self.config.raw_path.display()
            ));
            if ui.button("Open...").clicked() {
                if let Some(path) = FileDialog::new()
                    .set_directory(
                        std::env::current_dir().expect("Couldn't access runtime directory"),
                    )
                    .pick_folder()
                {
                    self.config.raw_path = path;
                }
            }
            ui.end_row();

            //Recon data directory
            ui.label(format!(
                "Recon data directory: {}",
                self.config.recon_path.display()
            ));
            if ui.button("Open...").clicked() {
                if let Some(path) = FileDialog::new()
                    .set_directory(
                        std::env::current_dir().expect("Couldn't access runtime directory"),
                    )
                    .pick_folder()
                {
                    self.config.recon_path = path;
                }
            }
            ui.end_row();

            //Stats log
            ui.label(format!("Stats log: {}", self.config.stats_path.display()));
            if ui.button("Open...").clicked() {
                if let Some(path) = FileDialog::new()
                    .set_directory(
                        std::env::current_dir().expect("Couldn't access runtime directory"),
                    )
                    .add_filter("Text file", &["txt"])
                    .save_file()
                {
                    self.config.stats_path = path;
                }
            }
            ui.end_row();
        });

        //Controls
        if ui.button("Start Review").clicked() {
            self.start_session();
        }

        //Report from the previous session, if any
        if let Some(report) = &self.report_text {
            ui.separator();
            ui.label(
                RichText::new("Review Statistics")
                    .color(Color32::LIGHT_BLUE)
                    .size(18.0),
            );
            ui.label(report.clone());
        }
    }

    /// The review panel: flip-book frame, marker overlay, caption, keys.
    fn review_ui(&mut self, ui: &mut eframe::egui::Ui, ctx: &eframe::egui::Context) {
        //Feed keystrokes into the state machine
        let keys: Vec<char> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    eframe::egui::Event::Text(text) => text.chars().next(),
                    _ => None,
                })
                .collect()
        });

        let mut write_failed = false;
        if let Some(session) = self.session.as_mut() {
            for key in keys {
                if let Err(e) = session.handle_key(key) {
                    log::error!("Failed to record label: {e}");
                    write_failed = true;
                    break;
                }
            }
            //Animation timer for the flip-book cycle
            if self.last_flip.elapsed() >= FRAME_FLIP_DELAY {
                session.advance_frame();
                self.last_flip = Instant::now();
            }
        }
        // An append that cannot reach disk breaks resumability; stop here
        if write_failed {
            self.show_error_window = true;
            self.finish_session();
            return;
        }
        if self.session.as_ref().map(|s| s.is_finished()).unwrap_or(true) {
            self.finish_session();
            return;
        }
        let Some(view) = self.session.as_ref().and_then(|s| s.current_view()) else {
            return;
        };

        ui.label(format!(
            "Run {}  event {}  camera {}  frame {}",
            view.run_id, view.event_id, view.camera_id, view.frame_index
        ));
        ui.label(KEY_CAPTION);
        ui.separator();

        //Refresh the texture cache when the cycle moves to a new frame
        let cache_is_stale = match &self.frame_texture {
            Some((path, _)) => *path != view.image_path,
            None => true,
        };
        if cache_is_stale {
            let texture = load_frame_texture(ctx, &view.image_path);
            self.frame_texture = Some((view.image_path.clone(), texture));
        }

        match &self.frame_texture {
            Some((_, Some(texture))) => {
                let response = ui.add(eframe::egui::Image::new(texture).shrink_to_fit());
                //Marker circle at the reconstructed position, in display coordinates
                let scale = response.rect.width() / texture.size()[0] as f32;
                let center = response.rect.min
                    + eframe::egui::vec2(view.x as f32 * scale, view.y as f32 * scale);
                ui.painter().circle_stroke(
                    center,
                    MARKER_RADIUS * scale,
                    eframe::egui::Stroke::new(2.0, Color32::RED),
                );
            }
            _ => {
                // The candidate can still be labeled from the caption alone
                ui.label(
                    RichText::new(format!(
                        "Frame image not available: {}",
                        view.image_path.display()
                    ))
                    .color(Color32::YELLOW),
                );
            }
        }

        ctx.request_repaint_after(FRAME_FLIP_DELAY);
    }
}

impl eframe::App for ReviewerApp {
    fn update(&mut self, ctx: &eframe::egui::Context, _frame: &mut eframe::Frame) {
        render_error_dialog(&mut self.show_error_window, ctx);
        eframe::egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.is_some() {
                self.review_ui(ui, ctx);
            } else {
                self.setup_ui(ui);
            }
        });
    }
}
