//! Encoders for synthetic CAEN and WaveDump streams used by the unit tests
use byteorder::{LittleEndian, WriteBytesExt};
use std::collections::BTreeMap;

use super::constants::*;
use super::digitizer::DigitizerDescriptor;
use super::record::{RecordType, WaveformRecord};
use super::settings::{DigitizerSettings, Trigger};
use super::wavedump::{SampleType, WaveDumpLayout};

pub fn sample_descriptor() -> DigitizerDescriptor {
    DigitizerDescriptor {
        id: 0,
        family_code: 724,
        roc_version: String::from("4.12"),
        amc_version: String::from("0.14"),
        serial_number: 1234,
        board_version: 2,
        channels: 8,
        bits: 14,
        frequency_hz: 100_000_000,
        max_samples: 512 * 1024,
        capability_flags: CAP_CAN_ZERO_SUPPRESS,
        voltage_low_mv: -1125,
        voltage_high_mv: 1125,
        windows: Vec::new(),
    }
}

pub fn sample_settings() -> DigitizerSettings {
    let channels = 0..8u32;
    DigitizerSettings {
        id: 1,
        digitizer_id: 0,
        dc_offsets: channels.clone().map(|c| (c, 0x8000 + c)).collect(),
        trigger: Trigger {
            code: TRIGGER_RISING | TRIGGER_EXT_DISABLED,
            bitmask: 0x1,
            thresholds: channels.map(|c| (c, 100 * c)).collect::<BTreeMap<_, _>>(),
        },
        window: 192,
        post_trigger: 5.0,
        channel_mask: 0xFF,
    }
}

pub fn sample_waveform(event_id: u32, channel: u32, shift: i32, n_samples: u16) -> WaveformRecord {
    WaveformRecord {
        event_id,
        digitizer_id: 0,
        settings_id: 1,
        trigger_tag: 1000 + event_id,
        tod_stamp: 1_700_000_000 + event_id as u64,
        shift,
        channel,
        samples: (0..n_samples).map(|i| i.wrapping_mul(7) % 16384).collect(),
    }
}

pub fn descriptor_payload(d: &DigitizerDescriptor) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_u32::<LittleEndian>(d.id).unwrap();
    buf.write_u32::<LittleEndian>(d.family_code).unwrap();
    write_fixed_string(&mut buf, &d.roc_version);
    write_fixed_string(&mut buf, &d.amc_version);
    buf.write_u32::<LittleEndian>(d.serial_number).unwrap();
    buf.write_u32::<LittleEndian>(d.board_version).unwrap();
    buf.write_u32::<LittleEndian>(d.channels).unwrap();
    buf.write_u32::<LittleEndian>(d.bits).unwrap();
    buf.write_u64::<LittleEndian>(d.frequency_hz).unwrap();
    buf.write_u32::<LittleEndian>(d.max_samples).unwrap();
    buf.write_u32::<LittleEndian>(d.capability_flags).unwrap();
    buf.write_i32::<LittleEndian>(d.voltage_low_mv).unwrap();
    buf.write_i32::<LittleEndian>(d.voltage_high_mv).unwrap();
    buf
}

/// Offsets and thresholds are written in key order; keys are expected to be 0..n
pub fn settings_payload(s: &DigitizerSettings) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_u32::<LittleEndian>(s.id).unwrap();
    buf.write_u32::<LittleEndian>(s.digitizer_id).unwrap();
    buf.write_u32::<LittleEndian>(s.trigger.bitmask).unwrap();
    buf.write_u32::<LittleEndian>(s.trigger.code).unwrap();
    buf.write_u32::<LittleEndian>(s.window).unwrap();
    buf.write_u32::<LittleEndian>(s.post_trigger as u32).unwrap();
    buf.write_u32::<LittleEndian>(s.channel_mask).unwrap();
    buf.write_u32::<LittleEndian>(s.dc_offsets.len() as u32).unwrap();
    for offset in s.dc_offsets.values() {
        buf.write_u32::<LittleEndian>(*offset).unwrap();
    }
    for level in s.trigger.thresholds.values() {
        buf.write_u32::<LittleEndian>(*level).unwrap();
    }
    buf
}

pub fn waveform_payload(w: &WaveformRecord) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_u32::<LittleEndian>(w.event_id).unwrap();
    buf.write_u32::<LittleEndian>(w.digitizer_id).unwrap();
    buf.write_u32::<LittleEndian>(w.settings_id).unwrap();
    buf.write_u32::<LittleEndian>(w.trigger_tag).unwrap();
    buf.write_u64::<LittleEndian>(w.tod_stamp).unwrap();
    buf.write_i32::<LittleEndian>(w.shift).unwrap();
    buf.write_u32::<LittleEndian>(w.channel).unwrap();
    buf.write_u32::<LittleEndian>(w.samples.len() as u32).unwrap();
    for sample in w.samples.iter() {
        buf.write_u16::<LittleEndian>(*sample).unwrap();
    }
    buf
}

fn write_fixed_string(buf: &mut Vec<u8>, value: &str) {
    let mut field = [0u8; VERSION_STRING_SIZE];
    field[..value.len()].copy_from_slice(value.as_bytes());
    buf.extend_from_slice(&field);
}

/// Builds a CAEN record stream one record at a time
#[derive(Debug, Default)]
pub struct StreamBuilder {
    bytes: Vec<u8>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record with an arbitrary declared size
    pub fn record(mut self, declared_size: u32, tag: u32, payload: &[u8]) -> Self {
        self.bytes.write_u32::<LittleEndian>(declared_size).unwrap();
        self.bytes.write_u32::<LittleEndian>(tag).unwrap();
        self.bytes.extend_from_slice(payload);
        self
    }

    fn framed(self, kind: RecordType, payload: Vec<u8>) -> Self {
        self.record(payload.len() as u32, kind.tag(), &payload)
    }

    pub fn descriptor(self, d: &DigitizerDescriptor) -> Self {
        self.framed(RecordType::DigitizerDescription, descriptor_payload(d))
    }

    pub fn settings(self, s: &DigitizerSettings) -> Self {
        self.framed(RecordType::DigitizerSettings, settings_payload(s))
    }

    pub fn waveform(self, w: &WaveformRecord) -> Self {
        self.framed(RecordType::WaveformData, waveform_payload(w))
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Encode one WaveDump event. `channels` is ignored for per-channel files, which always
/// carry exactly one waveform.
pub fn wavedump_event(
    layout: WaveDumpLayout,
    sample_type: SampleType,
    id: u32,
    timestamp: u64,
    waveforms: &[Vec<u16>],
) -> Vec<u8> {
    let n_samples = waveforms.first().map_or(0, |w| w.len());
    let mut buf = Vec::new();
    buf.write_u32::<LittleEndian>(id).unwrap();
    buf.write_u64::<LittleEndian>(timestamp).unwrap();
    buf.write_u32::<LittleEndian>(n_samples as u32).unwrap();
    buf.write_u64::<LittleEndian>(4).unwrap();
    let waveforms = match layout {
        WaveDumpLayout::PerChannelFile => &waveforms[..1],
        _ => {
            buf.write_i32::<LittleEndian>(waveforms.len() as i32).unwrap();
            waveforms
        }
    };
    buf.extend_from_slice(&[0u8; WAVEDUMP_PADDING_SIZE]);
    for waveform in waveforms {
        for sample in waveform {
            match sample_type {
                SampleType::Float32 => buf.write_f32::<LittleEndian>(*sample as f32).unwrap(),
                SampleType::Uint16 => buf.write_u16::<LittleEndian>(*sample).unwrap(),
            }
        }
    }
    buf
}
