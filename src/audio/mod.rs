//! Linear PCM audio I/O
//!
//! Files are opened through [`AudioFile`], which binds one set of sample
//! converters at open time according to the stream's [`Encoding`]. Raw
//! headerless PCM and WAV containers are supported.

pub mod codec;
pub mod dispatch;
pub mod endpoint;
pub mod file;
pub mod filetype;
pub mod format;
pub mod header;
pub mod info;
pub mod stream;
pub mod transcode;
pub mod wav;

pub use codec::{Sample, SampleRepr};
pub use file::{AudioFile, Mode};
pub use filetype::FileType;
pub use format::{ByteOrder, CodecType, Encoding, EncodingDescriptor, SampleKind};
pub use info::StreamInfo;
pub use transcode::{transcode, transcode_via};
