//! Write/read self test
//!
//! A sine wave is written as `f32` through every supported encoding into a
//! raw file, read back as `f32` and compared with the generated wave. Float
//! encodings must reproduce it exactly; integer encodings within one
//! quantisation step.

use std::f64::consts::PI;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::audio::{AudioFile, Encoding, EncodingDescriptor, FileType, Mode, SampleKind, StreamInfo};
use crate::error::{AupcmError, Result};

#[derive(Debug, Clone)]
pub struct SelftestOptions {
    pub sample_rate: u32,
    pub frequency: f64,
    pub seconds: u32,
    pub dir: PathBuf,
}

impl Default for SelftestOptions {
    fn default() -> Self {
        Self {
            sample_rate: 4000,
            frequency: 213.0,
            seconds: 1,
            dir: std::env::temp_dir(),
        }
    }
}

impl SelftestOptions {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(AupcmError::config("Sample rate must be greater than 0"));
        }
        if !(self.frequency > 0.0) {
            return Err(AupcmError::config("Frequency must be greater than 0"));
        }
        if self.frequency > self.sample_rate as f64 / 2.0 {
            return Err(AupcmError::config("Frequency must be at most half the sample rate"));
        }
        if self.seconds == 0 {
            return Err(AupcmError::config("Length must be greater than 0"));
        }
        Ok(())
    }

    pub fn samples(&self) -> usize {
        self.sample_rate as usize * self.seconds as usize
    }
}

/// `len` samples of a full scale sine of `frequency` Hz.
pub fn sine_wave(len: usize, frequency: f64, sample_rate: u32) -> Vec<f32> {
    let delta = 1.0 / sample_rate as f64;
    (0..len)
        .map(|i| {
            // Keep the phase small so precision does not drift over long waves.
            let phase = (frequency * i as f64 * delta).fract();
            (2.0 * PI * phase).sin() as f32
        })
        .collect()
}

/// Largest difference a write/read cycle through `desc` may introduce.
pub fn tolerance(desc: &EncodingDescriptor) -> f32 {
    match desc.kind {
        SampleKind::Float => 0.0,
        SampleKind::Signed | SampleKind::Unsigned => {
            let step = 1.0 / ((1u64 << (desc.bits - 1)) - 1) as f64;
            step as f32 + f32::EPSILON
        }
    }
}

#[derive(Debug, Clone)]
pub struct EncodingReport {
    pub encoding: Encoding,
    pub name: &'static str,
    pub path: PathBuf,
    pub written: usize,
    pub read: usize,
    pub max_error: f32,
    pub tolerance: f32,
}

impl EncodingReport {
    pub fn passed(&self) -> bool {
        self.read == self.written && self.max_error <= self.tolerance
    }
}

impl fmt::Display for EncodingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} {} {}/{} samples, max error {:.3e} (tolerance {:.3e})",
            self.name,
            if self.passed() { "ok  " } else { "FAIL" },
            self.read,
            self.written,
            self.max_error,
            self.tolerance
        )
    }
}

/// Writes `wave` into `dir` as `encoding` and reads it back.
pub fn check_encoding(encoding: Encoding, name: &'static str, wave: &[f32], sample_rate: u32, dir: &Path) -> Result<EncodingReport> {
    let path = dir.join(format!("{}.{}", name, FileType::Raw.suffix().unwrap_or("raw")));

    let mut info = StreamInfo::new(sample_rate, 1, encoding).with_filetype(FileType::Raw);
    let desc = info.validate()?;
    let mut file = AudioFile::open(&path, Mode::Write, &mut info)?;
    let written = file.write_f32(wave)?;
    file.close()?;

    let mut info = StreamInfo::new(sample_rate, 1, encoding).with_filetype(FileType::Raw);
    let mut file = AudioFile::open(&path, Mode::Read, &mut info)?;
    let mut back = vec![0f32; wave.len()];
    let read = file.read_f32(&mut back)?;
    file.close()?;

    let max_error = wave
        .iter()
        .zip(&back[..read])
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);

    let report = EncodingReport {
        encoding,
        name,
        path,
        written,
        read,
        max_error,
        tolerance: tolerance(&desc),
    };
    log::debug!("{}", report);
    Ok(report)
}

/// Runs the write/read cycle for every supported encoding.
pub fn run(options: &SelftestOptions) -> Result<Vec<EncodingReport>> {
    options.validate()?;
    std::fs::create_dir_all(&options.dir)?;

    let wave = sine_wave(options.samples(), options.frequency, options.sample_rate);
    log::info!(
        "Self test: {} Hz sine, {} samples at {} Hz, files in {}",
        options.frequency,
        wave.len(),
        options.sample_rate,
        options.dir.display()
    );

    Encoding::SUPPORTED
        .iter()
        .map(|&(encoding, name)| check_encoding(encoding, name, &wave, options.sample_rate, &options.dir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sine_wave() {
        let wave = sine_wave(8, 1.0, 4);
        let expected = [0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0];
        for (got, want) in wave.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "{} != {}", got, want);
        }
    }

    #[test]
    fn test_tolerances() {
        assert_eq!(tolerance(&Encoding::PCM_F32BE.resolve().unwrap()), 0.0);

        let s8 = tolerance(&Encoding::PCM_S8.resolve().unwrap());
        assert!(s8 >= 1.0 / 127.0 && s8 < 1.0 / 126.0);
        let u16 = tolerance(&Encoding::PCM_U16LE.resolve().unwrap());
        assert!(u16 < 1e-4);
    }

    #[test]
    fn test_options_validation() {
        assert!(SelftestOptions::default().validate().is_ok());

        let options = SelftestOptions { frequency: 2001.0, ..Default::default() };
        assert!(options.validate().is_err());
        let options = SelftestOptions { seconds: 0, ..Default::default() };
        assert!(options.validate().is_err());
        let options = SelftestOptions { frequency: f64::NAN, ..Default::default() };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_every_encoding_passes() {
        let dir = TempDir::new().unwrap();
        let options = SelftestOptions {
            sample_rate: 8000,
            frequency: 441.0,
            seconds: 1,
            dir: dir.path().to_path_buf(),
        };

        let reports = run(&options).unwrap();
        assert_eq!(reports.len(), Encoding::SUPPORTED.len());
        for report in &reports {
            assert!(report.passed(), "{}", report);
            assert_eq!(report.written, 8000);
            assert!(report.path.exists());
        }

        let f32le = reports.iter().find(|r| r.encoding == Encoding::PCM_F32LE).unwrap();
        assert_eq!(f32le.max_error, 0.0);
    }
}
