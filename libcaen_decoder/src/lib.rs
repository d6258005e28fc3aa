//! # caen_decoder
//!
//! caen_decoder reads the binary output of CAEN digitizers, written in Rust. It takes the
//! self-describing CAEN record stream (digitizer descriptors, acquisition settings and
//! per-channel waveforms) and rebuilds complete events from it, and can convert any channel
//! of an event to a physical time/voltage series. It also reads the three WaveDump2 binary
//! layouts (single-board, multi-board and one file per channel).
//!
//! ## Installation
//!
//! The only method of install is from source. If you have not used Rust before, you will
//! need to install the Rust tool chain. See the
//! [Rust docs](https://www.rust-lang.org/tools/install) for installation instructions.
//!
//! To build and install the CLI use `cargo install --path ./caen_decoder_cli` from the top
//! level repository. To use the CLI see the `caen_decoder_cli` README.
//!
//! ## Configuration
//!
//! The CLI is driven by a YAML configuration file. A template can be made with
//! `caen_decoder_cli -p config.yml new`. The format is as follows:
//!
//! ```yml
//! input_paths:
//! - /data/run_0001.bin
//! - /data/run_0002.bin
//! format: Auto
//! wavedump:
//!   multi_board: false
//!   one_file_per_channel: false
//!   sample_type: Float32
//! n_threads: 1
//! ```
//!
//! - `format`: `Auto` picks the decoder by file extension (`.bin` is a CAEN record stream).
//! `CaenBinary` and `WaveDump` force a decoder for every file.
//! - `wavedump`: how WaveDump files were written. WaveDump files carry no description of
//! themselves, so this must match the acquisition. If `multi_board` is set it wins over
//! `one_file_per_channel`.
//! - `n_threads`: the number of parallel worker threads to divide the files amongst. Must be
//! at least 1.
//!
//! ## CAEN record stream
//!
//! The stream is a sequence of records, each an 8 byte header (declared payload size, record
//! type) followed by the payload. All values are little-endian.
//!
//! ```text
//! type 1 - digitizer description (88 bytes)
//! type 2 - digitizer settings (32 bytes + 8 bytes per channel)
//! type 3 - waveform (36 bytes + 2 bytes per sample)
//! ```
//!
//! The declared size of every record is checked against its type before and after the
//! payload is decoded, and any disagreement aborts the file. Waveforms carry a single
//! channel each; the channels of an event can appear anywhere in the stream and events are
//! only complete once the stream has ended.
pub mod byte_cursor;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod digitizer;
pub mod error;
pub mod event;
pub mod event_builder;
pub mod process;
pub mod reconstruction;
pub mod record;
pub mod record_file;
pub mod settings;
pub mod wavedump;
pub mod worker_status;

#[cfg(test)]
mod testing;
