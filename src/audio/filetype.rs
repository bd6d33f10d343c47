//! Container file types and their suffixes

use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileType {
    #[default]
    Unknown,
    Raw,
    Wav,
}

struct FileTypeEntry {
    filetype: FileType,
    suffix: &'static str,
    name: &'static str,
}

static FILETYPES: [FileTypeEntry; 2] = [
    FileTypeEntry { filetype: FileType::Raw, suffix: "raw", name: "raw audio" },
    FileTypeEntry { filetype: FileType::Wav, suffix: "wav", name: "wav audio" },
];

impl FileType {
    fn entry(&self) -> Option<&'static FileTypeEntry> {
        FILETYPES.iter().find(|entry| entry.filetype == *self)
    }

    pub fn suffix(&self) -> Option<&'static str> {
        self.entry().map(|entry| entry.suffix)
    }

    pub fn name(&self) -> Option<&'static str> {
        self.entry().map(|entry| entry.name)
    }

    /// Case-insensitive suffix lookup, e.g. `"WAV"` is [`FileType::Wav`].
    pub fn from_suffix(suffix: &str) -> FileType {
        FILETYPES
            .iter()
            .find(|entry| entry.suffix.eq_ignore_ascii_case(suffix))
            .map(|entry| entry.filetype)
            .unwrap_or(FileType::Unknown)
    }

    /// `"-"` (stdin/stdout) is always raw, anything else goes by its extension.
    pub fn from_path(path: &Path) -> FileType {
        if path.as_os_str() == "-" {
            return FileType::Raw;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(FileType::from_suffix)
            .unwrap_or(FileType::Unknown)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("unknown"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_lookup() {
        assert_eq!(FileType::from_suffix("raw"), FileType::Raw);
        assert_eq!(FileType::from_suffix("WaV"), FileType::Wav);
        assert_eq!(FileType::from_suffix("wave"), FileType::Unknown);
        assert_eq!(FileType::from_suffix(""), FileType::Unknown);
    }

    #[test]
    fn test_path_lookup() {
        assert_eq!(FileType::from_path(Path::new("-")), FileType::Raw);
        assert_eq!(FileType::from_path(Path::new("take.1.RAW")), FileType::Raw);
        assert_eq!(FileType::from_path(Path::new("/tmp/out.wav")), FileType::Wav);
        assert_eq!(FileType::from_path(Path::new("noext")), FileType::Unknown);
        assert_eq!(FileType::from_path(Path::new("dir.wav/noext")), FileType::Unknown);
    }

    #[test]
    fn test_names() {
        assert_eq!(FileType::Raw.to_string(), "raw audio");
        assert_eq!(FileType::Wav.suffix(), Some("wav"));
        assert_eq!(FileType::Unknown.name(), None);
    }
}
