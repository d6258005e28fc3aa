use fxhash::FxHashMap;

use super::constants::MAX_ADC_BITS;
use super::digitizer::DigitizerDescriptor;
use super::error::CalibrationError;
use super::settings::DigitizerSettings;

/// CalibrationContext collects every digitizer descriptor and settings record of a file.
///
/// It is filled while the stream is read and is read-only afterwards; events only hold the
/// ids of the digitizer and settings they belong to and borrow the context when their
/// traces are reconstructed. Ids are kept in file order so the output lists match the input.
#[derive(Debug, Clone, Default)]
pub struct CalibrationContext {
    digitizers: FxHashMap<u32, DigitizerDescriptor>,
    settings: FxHashMap<u32, DigitizerSettings>,
    digitizer_order: Vec<u32>,
    settings_order: Vec<u32>,
}

impl CalibrationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a digitizer. Its resolution must be between 1 and MAX_ADC_BITS bits, otherwise no
    /// voltage can be derived from its samples.
    pub fn add_digitizer(
        &mut self,
        digitizer: DigitizerDescriptor,
    ) -> Result<(), CalibrationError> {
        if self.digitizers.contains_key(&digitizer.id) {
            return Err(CalibrationError::DuplicateDigitizer(digitizer.id));
        }
        if digitizer.bits == 0 || digitizer.bits > MAX_ADC_BITS {
            return Err(CalibrationError::InvalidResolution {
                digitizer: digitizer.id,
                bits: digitizer.bits,
            });
        }
        self.digitizer_order.push(digitizer.id);
        self.digitizers.insert(digitizer.id, digitizer);
        Ok(())
    }

    /// Add settings, which must belong to a digitizer already in the context and may not
    /// carry more DC offsets than that digitizer has channels
    pub fn add_settings(&mut self, settings: DigitizerSettings) -> Result<(), CalibrationError> {
        if self.settings.contains_key(&settings.id) {
            return Err(CalibrationError::DuplicateSettings(settings.id));
        }
        let digitizer = self.require_digitizer(settings.digitizer_id)?;
        if settings.dc_offsets.len() > digitizer.channels as usize {
            return Err(CalibrationError::TooManyOffsets {
                settings: settings.id,
                offsets: settings.dc_offsets.len(),
                channels: digitizer.channels,
            });
        }
        self.settings_order.push(settings.id);
        self.settings.insert(settings.id, settings);
        Ok(())
    }

    pub fn get_digitizer(&self, id: u32) -> Option<&DigitizerDescriptor> {
        self.digitizers.get(&id)
    }

    pub fn get_settings(&self, id: u32) -> Option<&DigitizerSettings> {
        self.settings.get(&id)
    }

    pub fn require_digitizer(&self, id: u32) -> Result<&DigitizerDescriptor, CalibrationError> {
        self.get_digitizer(id)
            .ok_or(CalibrationError::UnknownDigitizer(id))
    }

    /// Digitizers in the order they appeared in the file
    pub fn digitizers(&self) -> impl Iterator<Item = &DigitizerDescriptor> {
        self.digitizer_order
            .iter()
            .filter_map(|id| self.digitizers.get(id))
    }

    /// Settings in the order they appeared in the file
    pub fn settings(&self) -> impl Iterator<Item = &DigitizerSettings> {
        self.settings_order
            .iter()
            .filter_map(|id| self.settings.get(id))
    }

    pub fn n_digitizers(&self) -> usize {
        self.digitizer_order.len()
    }

    pub fn n_settings(&self) -> usize {
        self.settings_order.len()
    }
}
