use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::wavedump::{SampleType, WaveDumpLayout};

/// Which binary format the input files are in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FileFormat {
    /// Pick by file extension
    #[default]
    Auto,
    CaenBinary,
    WaveDump,
}

/// How WaveDump2 files were written. WaveDump files do not describe themselves, so this must
/// match the acquisition setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveDumpConfig {
    pub multi_board: bool,
    pub one_file_per_channel: bool,
    pub sample_type: SampleType,
}

impl WaveDumpConfig {
    pub fn layout(&self) -> WaveDumpLayout {
        WaveDumpLayout::from_flags(self.multi_board, self.one_file_per_channel)
    }
}

/// The decoder a given file will be read with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderKind {
    CaenBinary,
    WaveDump(WaveDumpLayout, SampleType),
}

/// Structure representing the application configuration. Contains pathing and run information
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub input_paths: Vec<PathBuf>,
    pub format: FileFormat,
    pub wavedump: WaveDumpConfig,
    pub n_threads: i32,
}

impl Default for Config {
    /// Generate a new Config object. No inputs, format picked by extension
    fn default() -> Self {
        Self {
            input_paths: Vec::new(),
            format: FileFormat::Auto,
            wavedump: WaveDumpConfig::default(),
            n_threads: 1,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    pub fn is_n_threads_valid(&self) -> bool {
        self.n_threads >= 1
    }

    /// Pick the decoder for a file. Auto selection only recognizes the CAEN `.bin` stream;
    /// XML and anything else must be handled elsewhere or configured explicitly.
    pub fn select_decoder(&self, path: &Path) -> Result<DecoderKind, ConfigError> {
        match self.format {
            FileFormat::CaenBinary => Ok(DecoderKind::CaenBinary),
            FileFormat::WaveDump => Ok(DecoderKind::WaveDump(
                self.wavedump.layout(),
                self.wavedump.sample_type,
            )),
            FileFormat::Auto => match path.extension().and_then(|ext| ext.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("bin") => Ok(DecoderKind::CaenBinary),
                _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
            },
        }
    }
}
