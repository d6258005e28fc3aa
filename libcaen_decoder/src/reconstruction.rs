use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::calibration::CalibrationContext;
use super::digitizer::DigitizerDescriptor;
use super::error::ReconstructionError;
use super::event::Event;

const TIME_COLUMN: usize = 0;
const AMPLITUDE_COLUMN: usize = 1;

/// Unit of the amplitude column of a reconstructed channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeasureUnit {
    #[default]
    AdcCounts,
    Voltage,
}

/// Non-fatal findings raised while reconstructing a channel
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The trace is not as long as the acquisition window, typically from zero suppression
    /// or a truncated acquisition
    TraceLengthMismatch {
        event: u32,
        channel: u32,
        trace_len: usize,
        window: u32,
    },
    /// The event reported no trigger shift, so the time origin was placed using the
    /// post-trigger percentage instead
    ZeroTriggerShift { event: u32, reference_sample: f64 },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TraceLengthMismatch {
                event,
                channel,
                trace_len,
                window,
            } => write!(
                f,
                "Event {event} channel {channel}: trace length {trace_len} does not match window size {window}"
            ),
            Self::ZeroTriggerShift {
                event,
                reference_sample,
            } => write!(
                f,
                "Event {event}: trigger shift is 0; placing time origin at sample {reference_sample} from post-trigger setting"
            ),
        }
    }
}

/// A channel converted to physical units.
///
/// `data` has one row per sample; column 0 is time in seconds and column 1 the amplitude in
/// the requested unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSeries {
    pub unit: MeasureUnit,
    pub data: Array2<f64>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ChannelSeries {
    pub fn time(&self) -> ArrayView1<'_, f64> {
        self.data.column(TIME_COLUMN)
    }

    pub fn amplitude(&self) -> ArrayView1<'_, f64> {
        self.data.column(AMPLITUDE_COLUMN)
    }

    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rescale a raw code linearly from the ADC code range onto the digitizer's voltage range.
///
/// Code 0 lands exactly on the low bound and the full-scale code exactly on the high bound.
pub fn counts_to_voltage(sample: f64, digitizer: &DigitizerDescriptor) -> f64 {
    let (low, high) = digitizer.voltage_range();
    let fraction = sample / digitizer.full_scale();
    if fraction == 1.0 {
        high
    } else {
        low + fraction * (high - low)
    }
}

/// Sample index at which time is zero.
///
/// A non-zero trigger shift is used directly. Otherwise the trigger is placed so that
/// `post_trigger` percent of the trace follows it.
pub fn trigger_reference(trigger_shift: i32, trace_len: usize, post_trigger: f64) -> f64 {
    if trigger_shift != 0 {
        trigger_shift as f64
    } else {
        trace_len as f64 * ((100.0 - post_trigger) / 100.0)
    }
}

pub fn sample_time(index: usize, reference: f64, frequency: f64) -> f64 {
    (index as f64 - reference) / frequency
}

impl Event {
    /// Reconstruct the time axis and amplitude of one channel of this event.
    ///
    /// Diagnostics are returned with the series and also logged as warnings.
    pub fn channel_series(
        &self,
        channel: u32,
        context: &CalibrationContext,
        unit: MeasureUnit,
    ) -> Result<ChannelSeries, ReconstructionError> {
        let trace = self
            .get_trace(channel)
            .ok_or(ReconstructionError::ChannelNotPresent {
                event: self.id,
                channel,
            })?;
        let digitizer = context.get_digitizer(self.digitizer_id).ok_or(
            ReconstructionError::UnknownDigitizer {
                event: self.id,
                digitizer: self.digitizer_id,
            },
        )?;
        let settings =
            context
                .get_settings(self.settings_id)
                .ok_or(ReconstructionError::UnknownSettings {
                    event: self.id,
                    settings: self.settings_id,
                })?;

        let mut diagnostics = Vec::new();
        let reference = trigger_reference(self.trigger_shift, trace.len(), settings.post_trigger);
        if self.trigger_shift == 0 {
            diagnostics.push(Diagnostic::ZeroTriggerShift {
                event: self.id,
                reference_sample: reference,
            });
        }
        if trace.len() != settings.window as usize {
            diagnostics.push(Diagnostic::TraceLengthMismatch {
                event: self.id,
                channel,
                trace_len: trace.len(),
                window: settings.window,
            });
        }
        for diagnostic in diagnostics.iter() {
            log::warn!("{diagnostic}");
        }

        let frequency = digitizer.frequency();
        let mut data = Array2::<f64>::zeros((trace.len(), 2));
        for (idx, sample) in trace.iter().enumerate() {
            let raw = *sample as f64;
            data[[idx, TIME_COLUMN]] = sample_time(idx, reference, frequency);
            data[[idx, AMPLITUDE_COLUMN]] = match unit {
                MeasureUnit::AdcCounts => raw,
                MeasureUnit::Voltage => counts_to_voltage(raw, digitizer),
            };
        }

        Ok(ChannelSeries {
            unit,
            data,
            diagnostics,
        })
    }
}
