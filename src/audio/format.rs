use hound::WavReader;
use std::io::Cursor;
use tracing::debug;

/// Container of an uploaded audio payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEncoding {
    /// RIFF/WAVE with a 16-bit PCM header
    Wav,
    /// Headerless 16-bit little-endian PCM
    RawPcm,
}

/// Audio parameters sent along with the payload to the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub encoding: AudioEncoding,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
}

impl AudioFormat {
    /// Raw mono PCM at the given rate
    pub fn raw_pcm(sample_rate: u32) -> Self {
        Self {
            encoding: AudioEncoding::RawPcm,
            sample_rate,
            channels: 1,
        }
    }

    /// Inspect uploaded bytes.
    ///
    /// A readable 16-bit PCM WAV header wins; anything else is treated as raw
    /// mono PCM at `default_sample_rate`.
    pub fn probe(bytes: &[u8], default_sample_rate: u32) -> Self {
        match WavReader::new(Cursor::new(bytes)) {
            Ok(reader) => {
                let spec = reader.spec();
                if spec.sample_format == hound::SampleFormat::Int && spec.bits_per_sample == 16 {
                    debug!(
                        "WAV upload detected: {}Hz, {} channel(s)",
                        spec.sample_rate, spec.channels
                    );
                    return Self {
                        encoding: AudioEncoding::Wav,
                        sample_rate: spec.sample_rate,
                        channels: spec.channels,
                    };
                }

                debug!(
                    "Unsupported WAV sample format ({:?}, {} bits), sending as raw PCM",
                    spec.sample_format, spec.bits_per_sample
                );
                Self::raw_pcm(default_sample_rate)
            }
            Err(_) => Self::raw_pcm(default_sample_rate),
        }
    }
}
