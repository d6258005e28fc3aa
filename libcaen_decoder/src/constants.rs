// Record stream framing
pub const HEADER_SIZE: u32 = 8;
pub const TYPE_DIGITIZER_DESCRIPTION: u32 = 1;
pub const TYPE_DIGITIZER_SETTINGS: u32 = 2;
pub const TYPE_WAVEFORM_DATA: u32 = 3;

// Payload sizes. Settings and waveform records carry variable tails, so these are minimums
pub const DESCRIPTOR_SIZE: u32 = 88;
pub const SETTINGS_FIXED_SIZE: u32 = 32;
pub const WAVEFORM_FIXED_SIZE: u32 = 36;
pub const VERSION_STRING_SIZE: usize = 20;

// Descriptor capability flags
pub const CAP_HAS_GROUPS: u32 = 1;
pub const CAP_CAN_ZERO_SUPPRESS: u32 = 2;
pub const CAP_CAN_INSPECT: u32 = 4;
pub const CAP_DUAL_EDGE_CLOCK: u32 = 8;

// Settings trigger code
pub const TRIGGER_EXT_MODE_MASK: u32 = 0x3;
pub const TRIGGER_EXT_DISABLED: u32 = 3;
pub const TRIGGER_RISING: u32 = 4;

// Descriptor voltages are stored in mV
pub const MILLIVOLTS_PER_VOLT: f64 = 1000.0;
pub const MAX_ADC_BITS: u32 = 32;

// WaveDump2 layouts
pub const WAVEDUMP_PADDING_SIZE: usize = 2;
pub const WAVEDUMP_MAX_CHANNELS: u32 = 64;

// Largest channel mask width carried by a settings record
pub const MASK_WIDTH: usize = 32;
