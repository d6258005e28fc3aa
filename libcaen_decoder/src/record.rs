use super::byte_cursor::ByteCursor;
use super::constants::*;
use super::digitizer::DigitizerDescriptor;
use super::error::{CursorError, RecordError};
use super::settings::DigitizerSettings;

/// The kinds of record which can appear in a CAEN binary stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    DigitizerDescription,
    DigitizerSettings,
    WaveformData,
}

impl TryFrom<u32> for RecordType {
    type Error = RecordError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            TYPE_DIGITIZER_DESCRIPTION => Ok(Self::DigitizerDescription),
            TYPE_DIGITIZER_SETTINGS => Ok(Self::DigitizerSettings),
            TYPE_WAVEFORM_DATA => Ok(Self::WaveformData),
            _ => Err(RecordError::UnknownRecordType(value)),
        }
    }
}

impl RecordType {
    pub fn tag(&self) -> u32 {
        match self {
            Self::DigitizerDescription => TYPE_DIGITIZER_DESCRIPTION,
            Self::DigitizerSettings => TYPE_DIGITIZER_SETTINGS,
            Self::WaveformData => TYPE_WAVEFORM_DATA,
        }
    }

    /// Expected payload size. Exact for descriptors, a minimum for everything else.
    pub fn expected_size(&self) -> u32 {
        match self {
            Self::DigitizerDescription => DESCRIPTOR_SIZE,
            Self::DigitizerSettings => SETTINGS_FIXED_SIZE,
            Self::WaveformData => WAVEFORM_FIXED_SIZE,
        }
    }

    pub fn is_exact_size(&self) -> bool {
        matches!(self, Self::DigitizerDescription)
    }

    /// Check a control integer (declared or consumed payload size) against this record type
    pub fn validate_size(&self, control: u32) -> Result<(), RecordError> {
        let expected = self.expected_size();
        let exact = self.is_exact_size();
        if (exact && control != expected) || control < expected {
            Err(RecordError::RecordSizeMismatch {
                kind: *self,
                found: control,
                expected,
                exact,
            })
        } else {
            Ok(())
        }
    }
}

/// Fixed header preceding every record: declared payload size, then the record type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub size: u32,
    pub record_type: u32,
}

impl RecordHeader {
    pub fn read_from<T: AsRef<[u8]>>(cursor: &mut ByteCursor<T>) -> Result<Self, CursorError> {
        Ok(Self {
            size: cursor.read_u32()?,
            record_type: cursor.read_u32()?,
        })
    }
}

/// One channel's waveform for one event, exactly as recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveformRecord {
    pub event_id: u32,
    pub digitizer_id: u32,
    pub settings_id: u32,
    pub trigger_tag: u32,
    /// Unix time (seconds) at trigger
    pub tod_stamp: u64,
    pub shift: i32,
    pub channel: u32,
    pub samples: Vec<u16>,
}

impl WaveformRecord {
    pub fn read_from<T: AsRef<[u8]>>(cursor: &mut ByteCursor<T>) -> Result<Self, CursorError> {
        let event_id = cursor.read_u32()?;
        let digitizer_id = cursor.read_u32()?;
        let settings_id = cursor.read_u32()?;
        let trigger_tag = cursor.read_u32()?;
        let tod_stamp = cursor.read_u64()?;
        let shift = cursor.read_i32()?;
        let channel = cursor.read_u32()?;
        let n_samples = cursor.read_u32()? as usize;
        let samples = cursor.read_u16_vec(n_samples)?;
        Ok(Self {
            event_id,
            digitizer_id,
            settings_id,
            trigger_tag,
            tod_stamp,
            shift,
            channel,
            samples,
        })
    }
}

/// A fully decoded record
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Descriptor(DigitizerDescriptor),
    Settings(DigitizerSettings),
    Waveform(WaveformRecord),
}

impl Record {
    pub fn kind(&self) -> RecordType {
        match self {
            Self::Descriptor(_) => RecordType::DigitizerDescription,
            Self::Settings(_) => RecordType::DigitizerSettings,
            Self::Waveform(_) => RecordType::WaveformData,
        }
    }

    /// Decode a record payload of the given kind.
    ///
    /// Returns the record along with the number of payload bytes the decoder consumed, which
    /// the caller validates against the declared size.
    pub fn read_payload(kind: RecordType, payload: &[u8]) -> Result<(Self, u32), RecordError> {
        let mut cursor = ByteCursor::new(payload);
        let record = match kind {
            RecordType::DigitizerDescription => {
                Self::Descriptor(DigitizerDescriptor::read_from(&mut cursor)?)
            }
            RecordType::DigitizerSettings => {
                Self::Settings(DigitizerSettings::read_from(&mut cursor)?)
            }
            RecordType::WaveformData => Self::Waveform(WaveformRecord::read_from(&mut cursor)?),
        };
        Ok((record, cursor.position() as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_waveform, waveform_payload};

    #[test]
    fn test_record_type_tags() {
        for kind in [
            RecordType::DigitizerDescription,
            RecordType::DigitizerSettings,
            RecordType::WaveformData,
        ] {
            assert_eq!(RecordType::try_from(kind.tag()), Ok(kind));
        }
        assert_eq!(
            RecordType::try_from(7),
            Err(RecordError::UnknownRecordType(7))
        );
    }

    #[test]
    fn test_descriptor_size_is_exact() {
        let kind = RecordType::DigitizerDescription;
        assert!(kind.validate_size(DESCRIPTOR_SIZE).is_ok());
        for bad in [DESCRIPTOR_SIZE - 1, DESCRIPTOR_SIZE + 1, 0] {
            assert_eq!(
                kind.validate_size(bad),
                Err(RecordError::RecordSizeMismatch {
                    kind,
                    found: bad,
                    expected: DESCRIPTOR_SIZE,
                    exact: true
                })
            );
        }
    }

    #[test]
    fn test_variable_records_have_minimum_size() {
        let kind = RecordType::WaveformData;
        assert!(kind.validate_size(WAVEFORM_FIXED_SIZE).is_ok());
        assert!(kind.validate_size(WAVEFORM_FIXED_SIZE + 400).is_ok());
        assert!(kind.validate_size(WAVEFORM_FIXED_SIZE - 1).is_err());

        let kind = RecordType::DigitizerSettings;
        assert!(kind.validate_size(SETTINGS_FIXED_SIZE + 16).is_ok());
        assert!(kind.validate_size(SETTINGS_FIXED_SIZE - 4).is_err());
    }

    #[test]
    fn test_waveform_payload() {
        let waveform = sample_waveform(12, 3, 5, 192);
        let payload = waveform_payload(&waveform);
        let (record, consumed) = Record::read_payload(RecordType::WaveformData, &payload).unwrap();
        assert_eq!(consumed as usize, payload.len());
        assert_eq!(consumed, WAVEFORM_FIXED_SIZE + 2 * 192);
        assert_eq!(record.kind(), RecordType::WaveformData);
        assert_eq!(record, Record::Waveform(waveform));
    }

    #[test]
    fn test_truncated_waveform_samples() {
        let payload = waveform_payload(&sample_waveform(1, 0, 0, 16));
        let result = Record::read_payload(RecordType::WaveformData, &payload[..payload.len() - 1]);
        assert!(matches!(result, Err(RecordError::TruncatedInput(_))));
    }
}
