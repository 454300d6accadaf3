use clap::{Arg, Command};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use libabub_review::config::Config;
use libabub_review::report::summarize;
use libabub_review::stats_log::StatsLog;

fn make_template_config(path: &Path) {
    let config = Config::default();
    let yaml_str = serde_yaml::to_string(&config).unwrap();
    let mut file = File::create(path).expect("Could create template config file!");
    file.write_all(yaml_str.as_bytes())
        .expect("Failed to write yaml data to file!");
}

fn main() {
    // Create a cli
    let matches = Command::new("abub_review_cli")
        .about("Report aggregate review statistics from an abub stats log")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Initialize feedback
    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("Could not create logging!");

    // Parse the cli
    let config_path = PathBuf::from(matches.get_one::<String>("path").expect("We require args"));

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );

        make_template_config(&config_path);
        log::info!("Done.");
        return;
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("Raw image path: {}", config.raw_path.to_string_lossy());
    log::info!("Recon data path: {}", config.recon_path.to_string_lossy());
    log::info!("Stats log path: {}", config.stats_path.to_string_lossy());

    // Summarize whatever has been reviewed so far
    let log = StatsLog::new(&config.stats_path);
    let records = match log.all_records() {
        Ok(records) => records,
        Err(e) => {
            log::error!("Could not read the stats log: {e}");
            return;
        }
    };

    match summarize(&records) {
        Ok(report) => log::info!("Review statistics:\n{report}"),
        Err(e) => log::warn!("{e}"),
    }

    log::info!("Done.");
}
