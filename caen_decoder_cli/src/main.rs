use clap::{Arg, Command};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use libcaen_decoder::config::Config;
use libcaen_decoder::process::{create_subsets, process_subset};
use libcaen_decoder::worker_status::WorkerStatus;

fn make_template_config(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let yaml_str = serde_yaml::to_string(&config)?;
    let mut file = File::create(path)?;
    file.write_all(yaml_str.as_bytes())?;
    Ok(())
}

fn main() {
    // Create a cli
    let matches = Command::new("caen_decoder_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .required(true)
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    if let Err(e) = LogWrapper::new(pb_manager.clone(), logger).try_init() {
        eprintln!("Could not create logging/progress: {e}");
        return;
    }

    // Parse the cli
    let config_path = match matches.get_one::<String>("path") {
        Some(p) => PathBuf::from(p),
        None => {
            log::error!("A configuration path is required");
            return;
        }
    };

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        match make_template_config(&config_path) {
            Ok(()) => log::info!("Done."),
            Err(e) => log::error!("Could not write template config: {e}"),
        }
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
    if !config.is_n_threads_valid() {
        log::error!("n_threads must be at least 1, found {}", config.n_threads);
        return;
    }
    log::info!("Config successfully loaded.");
    log::info!("Input files: {}", config.input_paths.len());
    log::info!("Format: {:?}", config.format);
    log::info!("WaveDump layout: {:?}", config.wavedump.layout());
    log::info!("Number of workers: {}", config.n_threads);

    // Setup the workers, each with a progress bar
    let style = ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let (tx, rx) = mpsc::channel::<WorkerStatus>();
    let mut bars = Vec::new();
    let mut workers = Vec::new();
    for (idx, subset) in create_subsets(&config).into_iter().enumerate() {
        // Dont make empty workers
        if subset.is_empty() {
            continue;
        }
        let pb = pb_manager.add(ProgressBar::new(100));
        pb.set_style(style.clone());
        bars.push((idx, pb));
        let conf = config.clone();
        let worker_tx = tx.clone();
        workers.push(std::thread::spawn(move || {
            process_subset(conf, worker_tx, idx, subset)
        }));
    }
    // Only the workers hold senders now, so the channel closes when they are all done
    drop(tx);

    loop {
        match rx.recv_timeout(Duration::from_millis(250)) {
            Ok(status) => {
                if let Some((_, pb)) = bars.iter().find(|(id, _)| *id == status.worker_id) {
                    pb.set_position((status.progress * 100.0) as u64);
                    pb.set_message(status.file_name);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => (),
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    for (_, pb) in bars.iter() {
        pb.finish();
    }

    let mut n_files = 0;
    for worker in workers {
        match worker.join() {
            Ok(Ok(summaries)) => {
                for (path, summary) in summaries.iter() {
                    log::info!("{}: {summary}", path.display());
                }
                n_files += summaries.len();
            }
            Ok(Err(e)) => log::error!("Decoding failed with error: {e}"),
            Err(_) => log::error!("Failed to join decoding worker!"),
        }
    }

    log::info!(
        "Done. Decoded {n_files} of {} file(s).",
        config.input_paths.len()
    );
}
