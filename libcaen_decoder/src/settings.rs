use bit_set::BitSet;
use std::collections::BTreeMap;

use super::byte_cursor::ByteCursor;
use super::constants::*;
use super::error::CursorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDirection {
    Rising,
    Falling,
}

/// External trigger handling as recorded by binary settings records.
///
/// Binary records only distinguish a disabled external trigger from an enabled one, so
/// every enabled mode decodes as `Acquisition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalTrigger {
    Disabled,
    Acquisition,
}

/// Trigger configuration of a digitizer. Only the recorded values are extracted; no
/// trigger logic is evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub code: u32,
    pub bitmask: u32,
    /// Per-channel trigger thresholds, keyed by channel
    pub thresholds: BTreeMap<u32, u32>,
}

impl Trigger {
    pub fn direction(&self) -> TriggerDirection {
        if self.code & TRIGGER_RISING != 0 {
            TriggerDirection::Rising
        } else {
            TriggerDirection::Falling
        }
    }

    pub fn external(&self) -> ExternalTrigger {
        if self.code & TRIGGER_EXT_MODE_MASK == TRIGGER_EXT_DISABLED {
            ExternalTrigger::Disabled
        } else {
            ExternalTrigger::Acquisition
        }
    }

    /// Channels which participate in triggering
    pub fn triggering_channels(&self) -> BitSet {
        mask_to_set(self.bitmask)
    }
}

/// DigitizerSettings holds the acquisition configuration applied to one digitizer.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitizerSettings {
    pub id: u32,
    pub digitizer_id: u32,
    /// DC offset per channel, keyed by channel
    pub dc_offsets: BTreeMap<u32, u32>,
    pub trigger: Trigger,
    /// Samples acquired per channel per trigger
    pub window: u32,
    /// Percentage (0-100) of the window captured after the trigger
    pub post_trigger: f64,
    pub channel_mask: u32,
}

impl DigitizerSettings {
    /// Parse a settings payload: the fixed header, then one DC offset and one trigger
    /// level per declared channel.
    pub fn read_from<T: AsRef<[u8]>>(cursor: &mut ByteCursor<T>) -> Result<Self, CursorError> {
        let id = cursor.read_u32()?;
        let digitizer_id = cursor.read_u32()?;
        let bitmask = cursor.read_u32()?;
        let code = cursor.read_u32()?;
        let window = cursor.read_u32()?;
        let post_trigger = cursor.read_u32()?;
        let channel_mask = cursor.read_u32()?;
        let n_channels = cursor.read_u32()? as usize;
        let offsets = cursor.read_u32_vec(n_channels)?;
        let levels = cursor.read_u32_vec(n_channels)?;

        Ok(Self {
            id,
            digitizer_id,
            dc_offsets: (0..).zip(offsets).collect(),
            trigger: Trigger {
                code,
                bitmask,
                thresholds: (0..).zip(levels).collect(),
            },
            window,
            post_trigger: post_trigger as f64,
            channel_mask,
        })
    }

    /// Channels enabled for acquisition
    pub fn enabled_channels(&self) -> BitSet {
        mask_to_set(self.channel_mask)
    }
}

fn mask_to_set(mask: u32) -> BitSet {
    let mut set = BitSet::with_capacity(MASK_WIDTH);
    for bit in 0..MASK_WIDTH {
        if mask & (1 << bit) != 0 {
            set.insert(bit);
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_settings, settings_payload};

    #[test]
    fn test_settings_payload() {
        let settings = sample_settings();
        let payload = settings_payload(&settings);
        assert_eq!(
            payload.len(),
            SETTINGS_FIXED_SIZE as usize + 2 * 4 * settings.dc_offsets.len()
        );

        let mut cursor = ByteCursor::new(payload.as_slice());
        let parsed = DigitizerSettings::read_from(&mut cursor).unwrap();
        assert!(cursor.is_exhausted());
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_trigger_code() {
        let mut trigger = sample_settings().trigger;
        trigger.code = TRIGGER_RISING | TRIGGER_EXT_DISABLED;
        assert_eq!(trigger.direction(), TriggerDirection::Rising);
        assert_eq!(trigger.external(), ExternalTrigger::Disabled);

        trigger.code = 1; // external trigger only, falling edge
        assert_eq!(trigger.direction(), TriggerDirection::Falling);
        assert_eq!(trigger.external(), ExternalTrigger::Acquisition);

        trigger.code = 2; // external and internal
        assert_eq!(trigger.external(), ExternalTrigger::Acquisition);
    }

    #[test]
    fn test_channel_masks() {
        let mut settings = sample_settings();
        settings.channel_mask = 0b1000_0101;
        settings.trigger.bitmask = 1 << 31;
        let enabled: Vec<usize> = settings.enabled_channels().iter().collect();
        assert_eq!(enabled, vec![0, 2, 7]);
        let triggering: Vec<usize> = settings.trigger.triggering_channels().iter().collect();
        assert_eq!(triggering, vec![31]);
    }

    #[test]
    fn test_truncated_levels() {
        let payload = settings_payload(&sample_settings());
        let mut cursor = ByteCursor::new(&payload[..payload.len() - 2]);
        assert!(DigitizerSettings::read_from(&mut cursor).is_err());
    }
}
