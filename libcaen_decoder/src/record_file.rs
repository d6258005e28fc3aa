use std::path::Path;

use super::byte_cursor::ByteCursor;
use super::constants::HEADER_SIZE;
use super::error::{RecordError, RecordFileError};
use super::record::{Record, RecordHeader, RecordType};

/// RecordFile frames a CAEN binary stream into typed records.
///
/// The stream is a sequence of header + payload pairs with no index or record count, so
/// the only way to find the end is to reach a header boundary with nothing left to read.
/// Each record is validated twice: the header's declared size must satisfy the size rule of
/// the record type before the payload is touched, and the number of bytes the payload decoder
/// actually consumed must satisfy the same rule and match the declaration.
#[derive(Debug)]
pub struct RecordFile {
    cursor: ByteCursor<Vec<u8>>,
}

impl RecordFile {
    /// Open a RecordFile, loading its contents into memory
    pub fn new(path: &Path) -> Result<Self, RecordFileError> {
        if !path.exists() {
            return Err(RecordFileError::BadFilePath(path.to_path_buf()));
        }
        Ok(Self::from_bytes(std::fs::read(path)?))
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            cursor: ByteCursor::new(data),
        }
    }

    /// Get the next record in the stream
    ///
    /// Returns a `Result<Option<Record>>`. The Option is None once the stream ended cleanly
    /// at a header boundary.
    pub fn get_next_record(&mut self) -> Result<Option<Record>, RecordFileError> {
        let remaining = self.cursor.remaining();
        if remaining == 0 {
            return Ok(None);
        } else if remaining < HEADER_SIZE as usize {
            return Err(RecordFileError::IncompleteFile(remaining));
        }

        let header = RecordHeader::read_from(&mut self.cursor).map_err(RecordError::from)?;
        let kind = RecordType::try_from(header.record_type)?;
        kind.validate_size(header.size)?;

        let payload = self
            .cursor
            .read(header.size as usize)
            .map_err(RecordError::from)?;
        let (record, consumed) = Record::read_payload(kind, payload)?;
        kind.validate_size(consumed)?;
        if consumed != header.size {
            return Err(RecordError::RecordSizeMismatch {
                kind,
                found: consumed,
                expected: header.size,
                exact: true,
            }
            .into());
        }

        Ok(Some(record))
    }

    pub fn is_eof(&self) -> bool {
        self.cursor.is_exhausted()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::error::CursorError;
    use crate::testing::*;

    fn read_all(bytes: Vec<u8>) -> Result<Vec<Record>, RecordFileError> {
        let mut file = RecordFile::from_bytes(bytes);
        let mut records = Vec::new();
        while let Some(record) = file.get_next_record()? {
            records.push(record);
        }
        Ok(records)
    }

    #[test]
    fn test_empty_stream_is_terminal() {
        let mut file = RecordFile::from_bytes(Vec::new());
        assert!(matches!(file.get_next_record(), Ok(None)));
        assert!(file.is_eof());
        assert_eq!(file.progress(), 1.0);
    }

    #[test]
    fn test_records_in_order() {
        let descriptor = sample_descriptor();
        let settings = sample_settings();
        let waveform = sample_waveform(0, 2, 0, 192);
        let bytes = StreamBuilder::new()
            .descriptor(&descriptor)
            .settings(&settings)
            .waveform(&waveform)
            .build();
        let records = read_all(bytes).unwrap();
        assert_eq!(
            records,
            vec![
                Record::Descriptor(descriptor),
                Record::Settings(settings),
                Record::Waveform(waveform)
            ]
        );
    }

    #[test]
    fn test_descriptor_off_by_one() {
        let payload = descriptor_payload(&sample_descriptor());
        for declared in [DESCRIPTOR_SIZE - 1, DESCRIPTOR_SIZE + 1] {
            let bytes = StreamBuilder::new()
                .record(declared, TYPE_DIGITIZER_DESCRIPTION, &payload)
                .raw(&[0u8; 4])
                .build();
            match read_all(bytes) {
                Err(RecordFileError::BadRecord(RecordError::RecordSizeMismatch {
                    kind,
                    found,
                    ..
                })) => {
                    assert_eq!(kind, RecordType::DigitizerDescription);
                    assert_eq!(found, declared);
                }
                other => panic!("Expected RecordSizeMismatch, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_waveform_below_minimum() {
        let bytes = StreamBuilder::new()
            .record(WAVEFORM_FIXED_SIZE - 4, TYPE_WAVEFORM_DATA, &[0u8; 32])
            .build();
        assert!(matches!(
            read_all(bytes),
            Err(RecordFileError::BadRecord(
                RecordError::RecordSizeMismatch { .. }
            ))
        ));
    }

    #[test]
    fn test_declared_size_disagrees_with_payload() {
        // Header claims two extra bytes which the decoder never consumes
        let mut payload = waveform_payload(&sample_waveform(0, 0, 0, 8));
        payload.extend_from_slice(&[0, 0]);
        let bytes = StreamBuilder::new()
            .record(payload.len() as u32, TYPE_WAVEFORM_DATA, &payload)
            .build();
        match read_all(bytes) {
            Err(RecordFileError::BadRecord(RecordError::RecordSizeMismatch {
                found,
                expected,
                exact,
                ..
            })) => {
                assert_eq!(found, expected - 2);
                assert!(exact);
            }
            other => panic!("Expected RecordSizeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_record_type() {
        let bytes = StreamBuilder::new().record(16, 9, &[0u8; 16]).build();
        assert!(matches!(
            read_all(bytes),
            Err(RecordFileError::BadRecord(RecordError::UnknownRecordType(9)))
        ));
    }

    #[test]
    fn test_dangling_header_is_incomplete() {
        let bytes = StreamBuilder::new()
            .descriptor(&sample_descriptor())
            .raw(&[0x58, 0, 0])
            .build();
        assert!(matches!(
            read_all(bytes),
            Err(RecordFileError::IncompleteFile(3))
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = StreamBuilder::new()
            .descriptor(&sample_descriptor())
            .waveform(&sample_waveform(0, 0, 0, 64))
            .build();
        bytes.truncate(bytes.len() - 10);
        assert!(matches!(
            read_all(bytes),
            Err(RecordFileError::BadRecord(RecordError::TruncatedInput(
                CursorError::TruncatedInput { .. }
            )))
        ));
    }

    #[test]
    fn test_file_path_must_exist() {
        let path = Path::new("/this/path/does/not/exist.bin");
        assert!(matches!(
            RecordFile::new(path),
            Err(RecordFileError::BadFilePath(_))
        ));
    }
}
