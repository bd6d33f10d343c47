//! The byte stream behind an open audio file

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use crate::audio::file::Mode;

/// A named file, or the process's standard input/output for the path `"-"`.
#[derive(Debug)]
pub enum Endpoint {
    File(File),
    Stdin(io::Stdin),
    Stdout(io::Stdout),
}

impl Endpoint {
    pub fn open(path: &Path, mode: Mode) -> io::Result<Endpoint> {
        if path.as_os_str() == "-" {
            return Ok(match mode {
                Mode::Read => {
                    log::info!("Reading stdin");
                    Endpoint::Stdin(io::stdin())
                }
                Mode::Write => {
                    log::info!("Writing stdout");
                    Endpoint::Stdout(io::stdout())
                }
            });
        }

        let file = match mode {
            Mode::Read => File::open(path)?,
            Mode::Write => {
                let mut options = OpenOptions::new();
                options.write(true).create(true).truncate(true);
                #[cfg(unix)]
                {
                    use std::os::unix::fs::OpenOptionsExt;
                    options.mode(0o644);
                }
                options.open(path)?
            }
        };
        Ok(Endpoint::File(file))
    }

    /// The underlying file, when there is one to seek in.
    pub fn as_file_mut(&mut self) -> Option<&mut File> {
        match self {
            Endpoint::File(file) => Some(file),
            Endpoint::Stdin(_) | Endpoint::Stdout(_) => None,
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            Endpoint::File(_) => None,
            Endpoint::Stdin(_) => Some("(stdin)"),
            Endpoint::Stdout(_) => Some("(stdout)"),
        }
    }
}

fn not_readable() -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, "stream is not open for reading")
}

fn not_writable() -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, "stream is not open for writing")
}

impl Read for Endpoint {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Endpoint::File(file) => file.read(buf),
            Endpoint::Stdin(stdin) => stdin.read(buf),
            Endpoint::Stdout(_) => Err(not_readable()),
        }
    }
}

impl Write for Endpoint {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Endpoint::File(file) => file.write(buf),
            Endpoint::Stdout(stdout) => stdout.write(buf),
            Endpoint::Stdin(_) => Err(not_writable()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Endpoint::File(file) => file.flush(),
            Endpoint::Stdout(stdout) => stdout.flush(),
            Endpoint::Stdin(_) => Ok(()),
        }
    }
}
