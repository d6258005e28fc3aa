use super::calibration::CalibrationContext;
use super::digitizer::DigitizerDescriptor;
use super::error::DecodeError;
use super::event::Event;
use super::event_builder::EventBuilder;
use super::record::Record;
use super::record_file::RecordFile;
use super::settings::DigitizerSettings;

/// Everything decoded from one CAEN record stream
#[derive(Debug, Clone)]
pub struct DecodedRecords {
    pub context: CalibrationContext,
    pub events: Vec<Event>,
}

impl DecodedRecords {
    pub fn digitizers(&self) -> Vec<&DigitizerDescriptor> {
        self.context.digitizers().collect()
    }

    pub fn settings(&self) -> Vec<&DigitizerSettings> {
        self.context.settings().collect()
    }
}

/// RecordDecoder routes framed records to the calibration context or the event builder.
///
/// Descriptors and settings always precede the waveforms that reference them, so the context is
/// complete by the time any waveform needs it. Call `finish` once the stream has ended to
/// finalize all open events.
#[derive(Debug, Default)]
pub struct RecordDecoder {
    context: CalibrationContext,
    evb: EventBuilder,
}

impl RecordDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) -> Result<(), DecodeError> {
        match record {
            Record::Descriptor(digitizer) => {
                log::info!(
                    "Found digitizer {} ({}, serial {}, {} channels, {} bits)",
                    digitizer.id,
                    digitizer.family(),
                    digitizer.serial_number,
                    digitizer.channels,
                    digitizer.bits
                );
                self.context.add_digitizer(digitizer)?;
            }
            Record::Settings(settings) => {
                log::info!(
                    "Found settings {} for digitizer {}",
                    settings.id,
                    settings.digitizer_id
                );
                self.context.add_settings(settings)?;
            }
            Record::Waveform(waveform) => self.evb.append_waveform(waveform, &self.context)?,
        }
        Ok(())
    }

    pub fn n_open_events(&self) -> usize {
        self.evb.len()
    }

    pub fn finish(self) -> DecodedRecords {
        DecodedRecords {
            context: self.context,
            events: self.evb.flush_events(),
        }
    }
}

/// Decode a whole record stream
pub fn decode_record_file(file: &mut RecordFile) -> Result<DecodedRecords, DecodeError> {
    let mut decoder = RecordDecoder::new();
    while let Some(record) = file.get_next_record()? {
        decoder.push(record)?;
    }
    Ok(decoder.finish())
}
