//! Configuration management for conversions

use crate::audio::{Encoding, FileType, SampleRepr, StreamInfo};
use crate::error::{AupcmError, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub input: StreamConfig,
    pub output: StreamConfig,
    pub conversion: ConversionConfig,
}

/// How one side of a conversion is laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Encoding name such as `pcm-s16le`.
    pub encoding: String,
    pub sample_rate: u32,
    pub channels: u16,
    /// File type suffix; inferred from the path when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filetype: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// In-memory representation samples pass through, e.g. `f32`.
    pub via: String,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("-"),
            output_path: PathBuf::from("-"),
            input: StreamConfig::default(),
            output: StreamConfig::default(),
            conversion: ConversionConfig::default(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            encoding: "pcm-s16le".to_string(),
            sample_rate: 48000,
            channels: 1,
            filetype: None,
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            via: SampleRepr::F32.name().to_string(),
            verbose: false,
        }
    }
}

impl StreamConfig {
    pub fn encoding(&self) -> Result<Encoding> {
        self.encoding.parse()
    }

    pub fn filetype(&self) -> Result<FileType> {
        match &self.filetype {
            None => Ok(FileType::Unknown),
            Some(suffix) => match FileType::from_suffix(suffix) {
                FileType::Unknown => Err(AupcmError::config(format!("Unknown file type: {}", suffix))),
                filetype => Ok(filetype),
            },
        }
    }

    /// The stream description handed to [`AudioFile::open`](crate::audio::AudioFile::open).
    pub fn stream_info(&self) -> Result<StreamInfo> {
        Ok(StreamInfo::new(self.sample_rate, self.channels, self.encoding()?).with_filetype(self.filetype()?))
    }

    fn validate(&self, side: &str) -> Result<()> {
        self.encoding()?;
        self.filetype()?;

        if self.sample_rate == 0 {
            return Err(AupcmError::config(format!("{} sample rate must be greater than 0", side)));
        }
        if self.sample_rate > 768000 {
            return Err(AupcmError::config(format!("{} sample rate cannot exceed 768000 Hz", side)));
        }
        if self.channels == 0 {
            return Err(AupcmError::config(format!("{} channel count must be greater than 0", side)));
        }

        Ok(())
    }

    fn apply(&mut self, encoding: &Option<String>, filetype: &Option<String>, rate: Option<u32>, channels: Option<u16>) {
        if let Some(encoding) = encoding {
            self.encoding = encoding.clone();
        }
        if let Some(filetype) = filetype {
            self.filetype = Some(filetype.clone());
        }
        if let Some(rate) = rate {
            self.sample_rate = rate;
        }
        if let Some(channels) = channels {
            self.channels = channels;
        }
    }
}

impl Config {
    pub fn verbose(&self) -> bool {
        self.conversion.verbose
    }

    pub fn via(&self) -> Result<SampleRepr> {
        SampleRepr::from_name(&self.conversion.via)
            .ok_or_else(|| AupcmError::config(format!("Unknown sample representation: {}", self.conversion.via)))
    }
}

#[derive(Debug, Parser)]
#[command(name = "aupcm", about = "Linear PCM sample format converter", version, author)]
pub struct Args {
    #[arg(short = 'v', long = "verbose", global = true, help = "Enable verbose output mode")]
    pub verbose: bool,

    #[arg(long = "config", global = true, help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a stream from one encoding to another
    Convert(ConvertArgs),
    /// Describe an audio file
    Info(InfoArgs),
    /// Write and read back a sine wave in every supported encoding
    Selftest(SelftestArgs),
    /// List supported encodings
    Encodings,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ConvertArgs {
    #[arg(short = 'i', long = "input", help = "Input file path, '-' for stdin")]
    pub input: Option<PathBuf>,

    #[arg(short = 'o', long = "output", help = "Output file path, '-' for stdout")]
    pub output: Option<PathBuf>,

    #[arg(long = "from", help = "Input encoding, e.g. pcm-s16le")]
    pub from: Option<String>,

    #[arg(long = "to", help = "Output encoding, e.g. pcm-f32le")]
    pub to: Option<String>,

    #[arg(long = "from-type", help = "Input file type (raw, wav)")]
    pub from_type: Option<String>,

    #[arg(long = "to-type", help = "Output file type (raw, wav)")]
    pub to_type: Option<String>,

    #[arg(short = 'r', long = "sample-rate", help = "Sample rate of both streams (Hz)")]
    pub sample_rate: Option<u32>,

    #[arg(short = 'c', long = "channels", help = "Channel count of both streams")]
    pub channels: Option<u16>,

    #[arg(long = "via", help = "In-memory sample representation (s8, u8, s16, u16, s32, u32, f32)")]
    pub via: Option<String>,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct InfoArgs {
    #[arg(help = "Audio file path, '-' for stdin")]
    pub path: PathBuf,

    #[arg(short = 'e', long = "encoding", help = "Encoding of a raw file")]
    pub encoding: Option<String>,

    #[arg(short = 't', long = "type", help = "File type (raw, wav)")]
    pub filetype: Option<String>,

    #[arg(short = 'r', long = "sample-rate", help = "Sample rate of a raw file (Hz)")]
    pub sample_rate: Option<u32>,

    #[arg(short = 'c', long = "channels", help = "Channel count of a raw file")]
    pub channels: Option<u16>,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct SelftestArgs {
    #[arg(short = 'r', long = "sample-rate", default_value = "4000", help = "Sample rate (Hz)")]
    pub sample_rate: u32,

    #[arg(short = 'f', long = "frequency", default_value = "213", help = "Sine frequency (Hz)")]
    pub frequency: f64,

    #[arg(short = 'l', long = "length", default_value = "1", help = "Length of the wave (seconds)")]
    pub seconds: u32,

    #[arg(short = 'd', long = "dir", help = "Directory for the test files (default: system temp dir)")]
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Loads the config file when one is given, defaults otherwise.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        match config_file {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: &Args) -> Result<Self> {
        let mut config = Self::load(args.config_file.as_deref())?;

        // Command line arguments override config file settings
        if args.verbose {
            config.conversion.verbose = true;
        }
        match &args.command {
            Command::Convert(convert) => config.apply_convert(convert),
            Command::Info(info) => config.apply_info(info),
            Command::Selftest(_) | Command::Encodings => {}
        }

        config.validate()?;
        Ok(config)
    }

    pub fn apply_convert(&mut self, args: &ConvertArgs) {
        if let Some(input) = &args.input {
            self.input_path = input.clone();
        }
        if let Some(output) = &args.output {
            self.output_path = output.clone();
        }
        self.input.apply(&args.from, &args.from_type, args.sample_rate, args.channels);
        self.output.apply(&args.to, &args.to_type, args.sample_rate, args.channels);
        if let Some(via) = &args.via {
            self.conversion.via = via.clone();
        }
    }

    pub fn apply_info(&mut self, args: &InfoArgs) {
        self.input_path = args.path.clone();
        self.input.apply(&args.encoding, &args.filetype, args.sample_rate, args.channels);
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AupcmError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| AupcmError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Validate configuration parameter validity
    pub fn validate(&self) -> Result<()> {
        self.input.validate("Input")?;
        self.output.validate("Output")?;
        self.via()?;

        if self.input_path.as_os_str().is_empty() || self.output_path.as_os_str().is_empty() {
            return Err(AupcmError::config("Input and output paths must not be empty"));
        }

        Ok(())
    }

    /// Save config to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AupcmError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| AupcmError::config(format!("Failed to write config file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.encoding().unwrap(), Encoding::PCM_S16LE);
        assert_eq!(config.output.sample_rate, 48000);
        assert_eq!(config.via().unwrap(), SampleRepr::F32);
        assert_eq!(config.input_path, PathBuf::from("-"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.input.sample_rate = 0;
        assert!(config.validate().is_err());
        config.input.sample_rate = 16000;

        config.output.channels = 0;
        assert!(config.validate().is_err());
        config.output.channels = 2;

        config.output.encoding = "pcm-s24le".to_string();
        assert!(matches!(config.validate(), Err(AupcmError::Config(_))));
        config.output.encoding = "PCM-U8".to_string();
        assert!(config.validate().is_ok());

        config.conversion.via = "f64".to_string();
        assert!(config.validate().is_err());
        config.conversion.via = "s32".to_string();

        config.input.filetype = Some("flac".to_string());
        assert!(config.validate().is_err());
        config.input.filetype = Some("WAV".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.output.encoding = "pcm-f32be".to_string();
        config.output.filetype = Some("raw".to_string());

        assert!(config.save_to_file(&config_path).is_ok());
        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path).unwrap();
        assert_eq!(loaded_config, config);
    }

    #[test]
    fn test_partial_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        std::fs::write(&config_path, "[output]\nencoding = \"pcm-u16be\"\n\n[conversion]\nvia = \"s16\"\n").unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.output.encoding().unwrap(), Encoding::PCM_U16BE);
        assert_eq!(config.output.sample_rate, 48000);
        assert_eq!(config.input, StreamConfig::default());
        assert_eq!(config.via().unwrap(), SampleRepr::S16);
    }

    #[test]
    fn test_command_line_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let mut from_file = Config::default();
        from_file.input.sample_rate = 8000;
        from_file.output.encoding = "pcm-s32be".to_string();
        from_file.save_to_file(&config_path).unwrap();

        let args = Args::try_parse_from([
            "aupcm",
            "--config",
            config_path.to_str().unwrap(),
            "convert",
            "-i",
            "in.raw",
            "-o",
            "out.wav",
            "--from",
            "pcm-u8",
            "-c",
            "2",
            "-v",
        ])
        .unwrap();

        let config = Config::from_args_and_config(&args).unwrap();
        assert!(config.verbose());
        assert_eq!(config.input_path, PathBuf::from("in.raw"));
        assert_eq!(config.output_path, PathBuf::from("out.wav"));
        assert_eq!(config.input.encoding().unwrap(), Encoding::PCM_U8);
        assert_eq!(config.input.sample_rate, 8000);
        assert_eq!(config.input.channels, 2);
        assert_eq!(config.output.encoding().unwrap(), Encoding::PCM_S32BE);
        assert_eq!(config.output.channels, 2);
    }

    #[test]
    fn test_stream_info_from_config() {
        let stream = StreamConfig {
            encoding: "pcm-f32le".to_string(),
            sample_rate: 44100,
            channels: 2,
            filetype: Some("raw".to_string()),
        };

        let info = stream.stream_info().unwrap();
        assert_eq!(info, StreamInfo::new(44100, 2, Encoding::PCM_F32LE).with_filetype(FileType::Raw));
    }

    #[test]
    fn test_missing_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(Some(temp_dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
