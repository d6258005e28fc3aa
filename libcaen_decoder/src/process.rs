use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use super::config::{Config, DecoderKind};
use super::decoder::{DecodedRecords, RecordDecoder};
use super::error::{DecodeError, ProcessorError};
use super::record_file::RecordFile;
use super::wavedump::{WaveDumpEvent, WaveDumpFile};
use super::worker_status::WorkerStatus;

/// Fraction of a file between progress reports
const FLUSH_FRAC: f32 = 0.01;

/// The output of decoding one file, by format
#[derive(Debug, Clone)]
pub enum DecodedFile {
    Records(DecodedRecords),
    WaveDump(Vec<WaveDumpEvent>),
}

/// Short description of a decoded file, for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub n_digitizers: usize,
    pub n_settings: usize,
    pub n_events: usize,
}

impl DecodedFile {
    pub fn summary(&self) -> FileSummary {
        match self {
            Self::Records(decoded) => FileSummary {
                n_digitizers: decoded.context.n_digitizers(),
                n_settings: decoded.context.n_settings(),
                n_events: decoded.events.len(),
            },
            Self::WaveDump(events) => FileSummary {
                n_digitizers: 0,
                n_settings: 0,
                n_events: events.len(),
            },
        }
    }
}

impl std::fmt::Display for FileSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} digitizer(s), {} settings record(s), {} event(s)",
            self.n_digitizers, self.n_settings, self.n_events
        )
    }
}

/// Tracks how far a file has been read and reports every time another FLUSH_FRAC of it is done
struct ProgressReporter<'a> {
    tx: &'a Sender<WorkerStatus>,
    file_name: String,
    worker_id: usize,
    last_sent: f32,
}

impl<'a> ProgressReporter<'a> {
    fn new(tx: &'a Sender<WorkerStatus>, path: &Path, worker_id: usize) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            tx,
            file_name,
            worker_id,
            last_sent: 0.0,
        }
    }

    fn update(&mut self, progress: f32) -> Result<(), ProcessorError> {
        if progress - self.last_sent >= FLUSH_FRAC {
            self.send(progress)?;
        }
        Ok(())
    }

    fn send(&mut self, progress: f32) -> Result<(), ProcessorError> {
        self.last_sent = progress;
        self.tx.send(WorkerStatus::new(progress, &self.file_name, self.worker_id))?;
        Ok(())
    }
}

fn decode_records(
    path: &Path,
    reporter: &mut ProgressReporter,
) -> Result<DecodedRecords, ProcessorError> {
    let mut file = RecordFile::new(path).map_err(DecodeError::from)?;
    log::info!(
        "Total file size: {}",
        human_bytes::human_bytes(file.get_size_bytes() as f64)
    );
    let mut decoder = RecordDecoder::new();
    while let Some(record) = file.get_next_record().map_err(DecodeError::from)? {
        decoder.push(record)?;
        reporter.update(file.progress())?;
    }
    log::info!("Finalizing {} event(s)...", decoder.n_open_events());
    Ok(decoder.finish())
}

fn decode_wavedump(
    path: &Path,
    file: &mut WaveDumpFile,
    reporter: &mut ProgressReporter,
) -> Result<Vec<WaveDumpEvent>, ProcessorError> {
    log::info!(
        "Total file size: {} ({:?} layout)",
        human_bytes::human_bytes(file.get_size_bytes() as f64),
        file.layout()
    );
    let mut events = Vec::new();
    while let Some(event) = file.get_next_event()? {
        events.push(event);
        reporter.update(file.progress())?;
    }
    log::info!(
        "Read {} WaveDump event(s) from {}",
        events.len(),
        path.display()
    );
    Ok(events)
}

/// Decode a single file with the decoder the configuration selects for it.
///
/// Progress is reported through `tx` as the file is read.
pub fn decode_file(
    config: &Config,
    path: &Path,
    tx: &Sender<WorkerStatus>,
    worker_id: usize,
) -> Result<DecodedFile, ProcessorError> {
    let kind = config.select_decoder(path)?;
    let mut reporter = ProgressReporter::new(tx, path, worker_id);
    reporter.send(0.0)?;
    let decoded = match kind {
        DecoderKind::CaenBinary => DecodedFile::Records(decode_records(path, &mut reporter)?),
        DecoderKind::WaveDump(layout, sample_type) => {
            let mut file = WaveDumpFile::new(path, layout, sample_type)?;
            DecodedFile::WaveDump(decode_wavedump(path, &mut file, &mut reporter)?)
        }
    };
    reporter.send(1.0)?;
    Ok(decoded)
}

/// Decode a subset of files.
///
/// A file that fails to decode is logged and skipped; the remaining files are still processed.
/// Losing the progress channel stops the worker.
pub fn process_subset(
    config: Config,
    tx: Sender<WorkerStatus>,
    worker_id: usize,
    subset: Vec<PathBuf>,
) -> Result<Vec<(PathBuf, FileSummary)>, ProcessorError> {
    let mut summaries = Vec::new();
    for path in subset {
        log::info!("Processing file {}...", path.display());
        match decode_file(&config, &path, &tx, worker_id) {
            Ok(decoded) => {
                let summary = decoded.summary();
                log::info!("Finished processing file {}: {summary}", path.display());
                summaries.push((path, summary));
            }
            Err(ProcessorError::SendError(e)) => return Err(ProcessorError::SendError(e)),
            Err(e) => log::error!("Failed to decode file {}: {e}", path.display()),
        }
    }
    Ok(summaries)
}

/// Divide the input files in to a set of subsets (per thread/worker)
pub fn create_subsets(config: &Config) -> Vec<Vec<PathBuf>> {
    let n_subsets = config.n_threads.max(1) as usize;
    let mut subsets: Vec<Vec<PathBuf>> = vec![Vec::new(); n_subsets];

    for (idx, path) in config.input_paths.iter().enumerate() {
        subsets[idx % n_subsets].push(path.clone())
    }

    subsets
}
