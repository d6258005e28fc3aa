use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Raw samples of one channel for one event
pub type Trace = Vec<u16>;

/// An Event is the set of channel traces a digitizer recorded for a single trigger.
///
/// Events are produced by the EventBuilder once the stream has been fully read and are not
/// modified afterwards. The digitizer and settings they belong to are referenced by id and
/// looked up in the CalibrationContext.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: u32,
    pub settings_id: u32,
    pub digitizer_id: u32,
    /// Hardware trigger time tag in clock ticks
    pub timestamp: u32,
    pub clock_time: OffsetDateTime,
    /// Signed sample offset of the trigger point. 0 if the hardware did not report one
    pub trigger_shift: i32,
    pub traces: BTreeMap<u32, Trace>,
}

impl Event {
    /// Channels which have data in this event, in ascending order
    pub fn triggered_channels(&self) -> Vec<u32> {
        self.traces.keys().copied().collect()
    }

    pub fn get_trace(&self, channel: u32) -> Option<&Trace> {
        self.traces.get(&channel)
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Event(id={}, settings_id={}, digitizer_id={}, timestamp={}, clock_time={}, trigger_shift={}, channels={:?})",
            self.id,
            self.settings_id,
            self.digitizer_id,
            self.timestamp,
            self.clock_time,
            self.trigger_shift,
            self.triggered_channels()
        )
    }
}
