use serde::{Deserialize, Serialize};
use std::path::Path;

use super::byte_cursor::ByteCursor;
use super::constants::{WAVEDUMP_MAX_CHANNELS, WAVEDUMP_PADDING_SIZE};
use super::error::WaveDumpError;

/// Element type of WaveDump samples. This is chosen when the file is written and is not
/// recorded in the file itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SampleType {
    #[default]
    Float32,
    Uint16,
}

/// The WaveDump2 binary layouts. They share one event shape and differ only in the header:
///
/// - SingleBoard: event number, timestamp, samples, sampling period, channel count
/// - MultiBoard: as SingleBoard, but the leading id is a global event id across boards
/// - PerChannelFile: no channel count; every event carries exactly one waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveDumpLayout {
    SingleBoard,
    MultiBoard,
    PerChannelFile,
}

impl WaveDumpLayout {
    /// Select a layout from the configuration flags. Multi-board takes priority.
    pub fn from_flags(multi_board: bool, one_file_per_channel: bool) -> Self {
        if multi_board {
            Self::MultiBoard
        } else if one_file_per_channel {
            Self::PerChannelFile
        } else {
            Self::SingleBoard
        }
    }

    fn has_channel_count(&self) -> bool {
        !matches!(self, Self::PerChannelFile)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WaveDumpSamples {
    Float32(Vec<f32>),
    Uint16(Vec<u16>),
}

impl WaveDumpSamples {
    pub fn len(&self) -> usize {
        match self {
            Self::Float32(s) => s.len(),
            Self::Uint16(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Self::Float32(s) => s.iter().map(|v| *v as f64).collect(),
            Self::Uint16(s) => s.iter().map(|v| *v as f64).collect(),
        }
    }
}

/// One event from a WaveDump2 file
#[derive(Debug, Clone, PartialEq)]
pub struct WaveDumpEvent {
    pub layout: WaveDumpLayout,
    /// Event number, or the global event id for multi-board files
    pub id: u32,
    pub timestamp: u64,
    pub samples: u32,
    pub sampling_period_ns: u64,
    pub channels: u32,
    pub waveforms: Vec<WaveDumpSamples>,
}

impl WaveDumpEvent {
    pub fn event_number(&self) -> Option<u32> {
        match self.layout {
            WaveDumpLayout::MultiBoard => None,
            _ => Some(self.id),
        }
    }

    pub fn global_event_id(&self) -> Option<u32> {
        match self.layout {
            WaveDumpLayout::MultiBoard => Some(self.id),
            _ => None,
        }
    }
}

/// Read a single event using the given layout. Shared by every layout.
fn read_event<T: AsRef<[u8]>>(
    cursor: &mut ByteCursor<T>,
    layout: WaveDumpLayout,
    sample_type: SampleType,
) -> Result<WaveDumpEvent, WaveDumpError> {
    let id = cursor.read_u32()?;
    let timestamp = cursor.read_u64()?;
    let samples = cursor.read_u32()?;
    let sampling_period_ns = cursor.read_u64()?;
    let channels = if layout.has_channel_count() {
        let declared = cursor.read_i32()?;
        match u32::try_from(declared) {
            Ok(n) if n <= WAVEDUMP_MAX_CHANNELS => n,
            _ => return Err(WaveDumpError::InvalidChannelCount(declared)),
        }
    } else {
        1
    };
    cursor.skip(WAVEDUMP_PADDING_SIZE)?;

    let n_samples = samples as usize;
    let mut waveforms = Vec::with_capacity(channels as usize);
    for _ in 0..channels {
        let waveform = match sample_type {
            SampleType::Float32 => WaveDumpSamples::Float32(cursor.read_f32_vec(n_samples)?),
            SampleType::Uint16 => WaveDumpSamples::Uint16(cursor.read_u16_vec(n_samples)?),
        };
        waveforms.push(waveform);
    }

    Ok(WaveDumpEvent {
        layout,
        id,
        timestamp,
        samples,
        sampling_period_ns,
        channels,
        waveforms,
    })
}

/// WaveDumpFile reads events from a WaveDump2 binary file.
///
/// Nothing in the file identifies its layout or sample type, so both must be supplied.
#[derive(Debug)]
pub struct WaveDumpFile {
    cursor: ByteCursor<Vec<u8>>,
    layout: WaveDumpLayout,
    sample_type: SampleType,
}

impl WaveDumpFile {
    pub fn new(
        path: &Path,
        layout: WaveDumpLayout,
        sample_type: SampleType,
    ) -> Result<Self, WaveDumpError> {
        if !path.exists() {
            return Err(WaveDumpError::BadFilePath(path.to_path_buf()));
        }
        Ok(Self::from_bytes(std::fs::read(path)?, layout, sample_type))
    }

    pub fn from_bytes(data: Vec<u8>, layout: WaveDumpLayout, sample_type: SampleType) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            layout,
            sample_type,
        }
    }

    /// Get the next event in the file
    ///
    /// Returns a `Result<Option<WaveDumpEvent>>`. The Option is None once the file is
    /// exhausted at an event boundary.
    pub fn get_next_event(&mut self) -> Result<Option<WaveDumpEvent>, WaveDumpError> {
        if self.cursor.is_exhausted() {
            return Ok(None);
        }
        read_event(&mut self.cursor, self.layout, self.sample_type).map(Some)
    }

    pub fn layout(&self) -> WaveDumpLayout {
        self.layout
    }

    pub fn get_size_bytes(&self) -> u64 {
        self.cursor.len() as u64
    }

    /// Fraction of the file consumed so far
    pub fn progress(&self) -> f32 {
        if self.cursor.is_empty() {
            1.0
        } else {
            self.cursor.position() as f32 / self.cursor.len() as f32
        }
    }
}
