use std::path::PathBuf;
use thiserror::Error;

use super::record::RecordType;
use super::worker_status::WorkerStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("Truncated input: requested {requested} bytes but only {remaining} remain")]
    TruncatedInput { requested: usize, remaining: usize },
}

fn size_qualifier(exact: &bool) -> &'static str {
    if *exact {
        ""
    } else {
        "at least "
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Failed to read record field: {0}")]
    TruncatedInput(#[from] CursorError),
    #[error("Record size mismatch for {kind:?} record: found {found} bytes; expected {}{expected}", size_qualifier(.exact))]
    RecordSizeMismatch {
        kind: RecordType,
        found: u32,
        expected: u32,
        exact: bool,
    },
    #[error("Unknown record type {0} found in record header")]
    UnknownRecordType(u32),
}

#[derive(Debug, Error)]
pub enum RecordFileError {
    #[error("Error when parsing record from RecordFile: {0}")]
    BadRecord(#[from] RecordError),
    #[error("Could not open RecordFile because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("RecordFile ended with {0} dangling bytes where a record header was expected")]
    IncompleteFile(usize),
    #[error("RecordFile failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalibrationError {
    #[error("Record references digitizer {0} which was never described")]
    UnknownDigitizer(u32),
    #[error("Digitizer {0} was described more than once")]
    DuplicateDigitizer(u32),
    #[error("Settings {0} were declared more than once")]
    DuplicateSettings(u32),
    #[error("Digitizer {digitizer} declares an unusable ADC resolution of {bits} bits")]
    InvalidResolution { digitizer: u32, bits: u32 },
    #[error("Settings {settings} carry {offsets} DC offsets but digitizer has only {channels} channels")]
    TooManyOffsets {
        settings: u32,
        offsets: usize,
        channels: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventBuilderError {
    #[error("Event {event} accumulated {channels} channels but its digitizer has only {max}")]
    EventChannelOverflow { event: u32, channels: usize, max: u32 },
    #[error("Event {event} carries an out of range time-of-day stamp {stamp}")]
    BadClockTime { event: u32, stamp: u64 },
    #[error("EventBuilder failed due to calibration error: {0}")]
    CalibrationError(#[from] CalibrationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconstructionError {
    #[error("Channel {channel} is not present in event {event}")]
    ChannelNotPresent { event: u32, channel: u32 },
    #[error("Event {event} references digitizer {digitizer} which is not in the calibration context")]
    UnknownDigitizer { event: u32, digitizer: u32 },
    #[error("Event {event} references settings {settings} which are not in the calibration context")]
    UnknownSettings { event: u32, settings: u32 },
}

#[derive(Debug, Error)]
pub enum WaveDumpError {
    #[error("Failed to read WaveDump event: {0}")]
    TruncatedInput(#[from] CursorError),
    #[error("WaveDump event header declared an invalid channel count {0}")]
    InvalidChannelCount(i32),
    #[error("Could not open WaveDumpFile because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("WaveDumpFile failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Decoding failed due to RecordFile error: {0}")]
    FileError(#[from] RecordFileError),
    #[error("Decoding failed due to calibration error: {0}")]
    CalibrationError(#[from] CalibrationError),
    #[error("Decoding failed due to EventBuilder error: {0}")]
    EventBuilderError(#[from] EventBuilderError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Cannot select a binary decoder for file {0:?}; set the format explicitly")]
    UnsupportedFormat(PathBuf),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to decode error: {0}")]
    DecodeError(#[from] DecodeError),
    #[error("Processor failed due to WaveDump error: {0}")]
    WaveDumpError(#[from] WaveDumpError),
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<WorkerStatus>),
}
