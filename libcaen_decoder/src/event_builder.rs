use fxhash::FxHashMap;
use std::collections::BTreeMap;
use time::OffsetDateTime;

use super::calibration::CalibrationContext;
use super::error::EventBuilderError;
use super::event::{Event, Trace};
use super::record::WaveformRecord;

/// An event whose channels are still arriving
#[derive(Debug)]
struct EventInProgress {
    id: u32,
    settings_id: u32,
    digitizer_id: u32,
    timestamp: u32,
    clock_time: OffsetDateTime,
    trigger_shift: i32,
    traces: BTreeMap<u32, Trace>,
}

impl EventInProgress {
    fn new(record: &WaveformRecord) -> Result<Self, EventBuilderError> {
        Ok(Self {
            id: record.event_id,
            settings_id: record.settings_id,
            digitizer_id: record.digitizer_id,
            timestamp: record.trigger_tag,
            clock_time: clock_time(record.event_id, record.tod_stamp)?,
            trigger_shift: record.shift,
            traces: BTreeMap::new(),
        })
    }

    fn finalize(self) -> Event {
        Event {
            id: self.id,
            settings_id: self.settings_id,
            digitizer_id: self.digitizer_id,
            timestamp: self.timestamp,
            clock_time: self.clock_time,
            trigger_shift: self.trigger_shift,
            traces: self.traces,
        }
    }
}

/// Convert a time-of-day stamp (Unix seconds) into a UTC date-time
fn clock_time(event: u32, stamp: u64) -> Result<OffsetDateTime, EventBuilderError> {
    i64::try_from(stamp)
        .ok()
        .and_then(|seconds| OffsetDateTime::from_unix_timestamp(seconds).ok())
        .ok_or(EventBuilderError::BadClockTime { event, stamp })
}

/// EventBuilder takes WaveformRecords and composes them into Events.
///
/// Waveform records carry a single channel each and the stream has no end-of-event marker, so
/// channels of one event may be spread anywhere through the file and arrive in any order.
/// The builder keeps every event it has seen open, keyed by event id, until the stream is done
/// and `flush_events` turns them into finished Events. The first record of an event fixes its
/// scalar fields; later records only add (or replace) channel traces.
#[derive(Debug, Default)]
pub struct EventBuilder {
    index: FxHashMap<u32, usize>,
    in_progress: Vec<EventInProgress>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a waveform to the event it belongs to, opening that event if it is new.
    ///
    /// Fails if the record's digitizer was never described, or if the event now holds more
    /// distinct channels than its digitizer has.
    pub fn append_waveform(
        &mut self,
        record: WaveformRecord,
        context: &CalibrationContext,
    ) -> Result<(), EventBuilderError> {
        let idx = match self.index.get(&record.event_id) {
            Some(idx) => *idx,
            None => {
                context.require_digitizer(record.digitizer_id)?;
                self.in_progress.push(EventInProgress::new(&record)?);
                self.index.insert(record.event_id, self.in_progress.len() - 1);
                self.in_progress.len() - 1
            }
        };

        let event = &mut self.in_progress[idx];
        let max = context.require_digitizer(event.digitizer_id)?.channels;
        event.traces.insert(record.channel, record.samples);
        if event.traces.len() > max as usize {
            return Err(EventBuilderError::EventChannelOverflow {
                event: event.id,
                channels: event.traces.len(),
                max,
            });
        }
        Ok(())
    }

    /// Number of events currently open
    pub fn len(&self) -> usize {
        self.in_progress.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_progress.is_empty()
    }

    /// Finalize every open event.
    ///
    /// Used once the stream has ended. Events are returned in the order their ids were first
    /// seen.
    pub fn flush_events(self) -> Vec<Event> {
        self.in_progress
            .into_iter()
            .map(EventInProgress::finalize)
            .collect()
    }
}
