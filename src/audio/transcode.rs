//! Streaming one open file into another

use crate::audio::codec::SampleRepr;
use crate::audio::dispatch::Bound;
use crate::audio::file::AudioFile;
use crate::audio::stream::CHUNK_SAMPLES;
use crate::error::Result;

/// Copies every remaining sample of `input` to `output`, holding them as `T`
/// in between. Returns the number of samples copied.
pub fn transcode<T: Bound>(input: &mut AudioFile<'_>, output: &mut AudioFile<'_>) -> Result<u64> {
    let mut buf = vec![T::default(); CHUNK_SAMPLES];
    let mut total = 0u64;

    loop {
        let got = input.read(&mut buf)?;
        if got > 0 {
            output.write(&buf[..got])?;
            total += got as u64;
        }
        if got < buf.len() {
            break;
        }
    }

    log::info!("Transcoded {} samples via {}", total, T::REPR);
    Ok(total)
}

/// [`transcode`] with the intermediate type chosen at run time.
pub fn transcode_via(repr: SampleRepr, input: &mut AudioFile<'_>, output: &mut AudioFile<'_>) -> Result<u64> {
    match repr {
        SampleRepr::S8 => transcode::<i8>(input, output),
        SampleRepr::U8 => transcode::<u8>(input, output),
        SampleRepr::S16 => transcode::<i16>(input, output),
        SampleRepr::U16 => transcode::<u16>(input, output),
        SampleRepr::S32 => transcode::<i32>(input, output),
        SampleRepr::U32 => transcode::<u32>(input, output),
        SampleRepr::F32 => transcode::<f32>(input, output),
    }
}
