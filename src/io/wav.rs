//! RIFF/WAVE encoding, 16-bit integer PCM.
//!
//! Samples are clamped to [-1, 1] and scaled asymmetrically so both rails
//! are reachable: negative values by 32768, positive values by 32767. The
//! mono render is written to every channel.

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::Result;

pub const BITS_PER_SAMPLE: u16 = 16;

pub fn wav_spec(sample_rate: u32, channels: u16) -> WavSpec {
    WavSpec {
        channels,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

#[inline]
pub fn pcm16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32_768.0) as i16
    } else {
        (s * 32_767.0) as i16
    }
}

pub fn write_wav<W: Write + Seek>(writer: W, spec: WavSpec, mono: &[f32]) -> Result<()> {
    let mut wav = WavWriter::new(writer, spec)?;
    for &sample in mono {
        let value = pcm16(sample);
        for _ in 0..spec.channels {
            wav.write_sample(value)?;
        }
    }
    wav.finalize()?;
    Ok(())
}

pub fn write_wav_file(path: impl AsRef<Path>, sample_rate: u32, channels: u16, mono: &[f32]) -> Result<()> {
    let path = path.as_ref();
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_wav(file, wav_spec(sample_rate, channels), mono)?;
    log::info!("wrote {} frames to {}", mono.len(), path.display());
    Ok(())
}

/// Encode a whole file in memory.
pub fn wav_bytes(sample_rate: u32, channels: u16, mono: &[f32]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_wav(&mut cursor, wav_spec(sample_rate, channels), mono)?;
    Ok(cursor.into_inner())
}
