use super::byte_cursor::ByteCursor;
use super::constants::*;
use super::error::CursorError;

/// DigitizerDescriptor describes the hardware that produced a file: identity, resolution,
/// sampling frequency and calibrated voltage range.
///
/// Descriptors are immutable once parsed and are owned by the CalibrationContext. Settings
/// and events refer to them by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitizerDescriptor {
    pub id: u32,
    pub family_code: u32,
    pub roc_version: String,
    pub amc_version: String,
    pub serial_number: u32,
    pub board_version: u32,
    pub channels: u32,
    pub bits: u32,
    pub frequency_hz: u64,
    pub max_samples: u32,
    pub capability_flags: u32,
    pub voltage_low_mv: i32,
    pub voltage_high_mv: i32,
    /// Supported acquisition windows. Not carried by binary descriptors, so empty for them
    pub windows: Vec<u32>,
}

impl DigitizerDescriptor {
    /// Parse the fixed-size descriptor payload
    pub fn read_from<T: AsRef<[u8]>>(cursor: &mut ByteCursor<T>) -> Result<Self, CursorError> {
        Ok(Self {
            id: cursor.read_u32()?,
            family_code: cursor.read_u32()?,
            roc_version: cursor.read_fixed_string(VERSION_STRING_SIZE)?,
            amc_version: cursor.read_fixed_string(VERSION_STRING_SIZE)?,
            serial_number: cursor.read_u32()?,
            board_version: cursor.read_u32()?,
            channels: cursor.read_u32()?,
            bits: cursor.read_u32()?,
            frequency_hz: cursor.read_u64()?,
            max_samples: cursor.read_u32()?,
            capability_flags: cursor.read_u32()?,
            voltage_low_mv: cursor.read_i32()?,
            voltage_high_mv: cursor.read_i32()?,
            windows: Vec::new(),
        })
    }

    pub fn family(&self) -> String {
        format!("xx{}", self.family_code)
    }

    /// Firmware version as "ROC.AMC"
    pub fn version(&self) -> String {
        format!("{}.{}", self.roc_version, self.amc_version)
    }

    pub fn frequency(&self) -> f64 {
        self.frequency_hz as f64
    }

    /// Largest raw code the ADC can produce (2^bits - 1). A 0-bit descriptor gives 0 and is
    /// rejected by the CalibrationContext
    pub fn full_scale(&self) -> f64 {
        2.0_f64.powi(self.bits as i32) - 1.0
    }

    /// Calibrated voltage range (low, high) in volts
    pub fn voltage_range(&self) -> (f64, f64) {
        (
            self.voltage_low_mv as f64 / MILLIVOLTS_PER_VOLT,
            self.voltage_high_mv as f64 / MILLIVOLTS_PER_VOLT,
        )
    }

    pub fn has_channel_groups(&self) -> bool {
        self.capability_flags & CAP_HAS_GROUPS != 0
    }

    pub fn can_zero_suppress(&self) -> bool {
        self.capability_flags & CAP_CAN_ZERO_SUPPRESS != 0
    }

    pub fn can_inspect(&self) -> bool {
        self.capability_flags & CAP_CAN_INSPECT != 0
    }

    pub fn has_dual_edge_clock(&self) -> bool {
        self.capability_flags & CAP_DUAL_EDGE_CLOCK != 0
    }
}
