//! PCM16 audio payload decoder.
//!
//! The TTS endpoint returns audio as a base64 string of raw interleaved
//! 16-bit signed little-endian PCM samples with no container or header.
//! [`decode_pcm16`] converts that payload into per-channel `f32` planes in
//! `[-1.0, 1.0)` ready for playback.
//!
//! This is pure, deterministic, synchronous computation — no I/O and no
//! suspension — and is kept separate from playback so it can be tested on
//! its own.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// Errors that can occur while decoding an audio payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload was not valid base64.
    #[error("invalid base64 audio payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A zero channel count makes the frame layout meaningless.
    #[error("channel count must be non-zero")]
    ZeroChannels,
}

// ---------------------------------------------------------------------------
// DecodedAudio
// ---------------------------------------------------------------------------

/// Decoded multi-channel floating-point audio.
///
/// Immutable once created.  Samples are stored as one plane per channel;
/// every plane has exactly [`frames`](Self::frames) samples.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Sample rate in Hz, as tagged by the caller.  No resampling is done.
    pub sample_rate: u32,
    /// Number of channels.
    pub channels: u16,
    planes: Vec<Vec<f32>>,
}

impl DecodedAudio {
    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.planes.first().map_or(0, Vec::len)
    }

    /// The sample plane for channel `c`, or `None` if `c` is out of range.
    pub fn plane(&self, c: usize) -> Option<&[f32]> {
        self.planes.get(c).map(Vec::as_slice)
    }

    /// Re-interleave the planes into a single `f32` buffer
    /// (`frame0ch0, frame0ch1, …`) — the layout rodio's `SamplesBuffer`
    /// expects.
    pub fn interleaved(&self) -> Vec<f32> {
        let frames = self.frames();
        let channels = self.planes.len();
        let mut out = Vec::with_capacity(frames * channels);
        for i in 0..frames {
            for plane in &self.planes {
                out.push(plane[i]);
            }
        }
        out
    }

    /// Playback duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.sample_rate as f32
    }
}

// ---------------------------------------------------------------------------
// decode_pcm16
// ---------------------------------------------------------------------------

/// Decode a base64 payload of interleaved PCM16-LE samples into
/// [`DecodedAudio`].
///
/// Normalization divides each i16 sample by 32768, mapping `[-32768, 32767]`
/// onto the asymmetric range `[-1.0, 32767/32768]`.  Samples are never
/// clamped or rescaled.
///
/// Truncation is defined, not undefined: an odd trailing byte is dropped,
/// and when the total sample count is not divisible by `channels` the
/// trailing incomplete frame is dropped
/// (`frames = total_samples / channels`, integer division).
pub fn decode_pcm16(
    encoded: &str,
    sample_rate: u32,
    channels: u16,
) -> Result<DecodedAudio, DecodeError> {
    if channels == 0 {
        return Err(DecodeError::ZeroChannels);
    }

    let bytes = BASE64.decode(encoded)?;

    let samples: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    let channels_usize = channels as usize;
    let frames = samples.len() / channels_usize;

    let mut planes: Vec<Vec<f32>> = (0..channels_usize)
        .map(|_| Vec::with_capacity(frames))
        .collect();
    for (c, plane) in planes.iter_mut().enumerate() {
        for i in 0..frames {
            plane.push(samples[i * channels_usize + c] as f32 / 32768.0);
        }
    }

    Ok(DecodedAudio {
        sample_rate,
        channels,
        planes,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Base64-encode raw i16 samples as little-endian bytes.
    fn encode_samples(samples: &[i16]) -> String {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        BASE64.encode(bytes)
    }

    // ---- normalization bounds ---------------------------------------------

    #[test]
    fn int16_extremes_normalize_asymmetrically() {
        let encoded = encode_samples(&[i16::MIN, 0, i16::MAX]);
        let audio = decode_pcm16(&encoded, 24_000, 1).unwrap();

        assert_eq!(audio.plane(0).unwrap()[0], -1.0);
        assert_eq!(audio.plane(0).unwrap()[1], 0.0);
        assert_eq!(audio.plane(0).unwrap()[2], 32767.0 / 32768.0);
    }

    #[test]
    fn all_samples_stay_within_pcm_range() {
        let values: Vec<i16> = vec![i16::MIN, -12_345, -1, 0, 1, 12_345, i16::MAX];
        let encoded = encode_samples(&values);
        let audio = decode_pcm16(&encoded, 24_000, 1).unwrap();

        for &s in audio.plane(0).unwrap() {
            assert!((-1.0..=32767.0 / 32768.0).contains(&s), "out of range: {s}");
        }
    }

    /// Bytes [0x00, 0x80, 0x00, 0x00] mono are the i16-LE samples
    /// [-32768, 0].
    #[test]
    fn known_byte_pattern_decodes_to_minus_one() {
        let encoded = BASE64.encode([0x00u8, 0x80, 0x00, 0x00]);
        let audio = decode_pcm16(&encoded, 24_000, 1).unwrap();

        assert_eq!(audio.frames(), 2);
        assert_eq!(audio.plane(0).unwrap()[0], -1.0);
        assert_eq!(audio.plane(0).unwrap()[1], 0.0);
        assert_eq!(audio.sample_rate, 24_000);
        assert_eq!(audio.channels, 1);
    }

    // ---- determinism -------------------------------------------------------

    #[test]
    fn decoding_is_deterministic() {
        let encoded = encode_samples(&[100, -200, 300, -400, 500, -600]);
        let a = decode_pcm16(&encoded, 24_000, 2).unwrap();
        let b = decode_pcm16(&encoded, 24_000, 2).unwrap();
        assert_eq!(a, b);
    }

    // ---- channel de-interleaving ------------------------------------------

    #[test]
    fn stereo_samples_deinterleave_into_planes() {
        // Interleaved L R L R: L = [1000, 3000], R = [2000, 4000]
        let encoded = encode_samples(&[1000, 2000, 3000, 4000]);
        let audio = decode_pcm16(&encoded, 24_000, 2).unwrap();

        assert_eq!(audio.frames(), 2);
        assert_eq!(audio.plane(0).unwrap(), &[1000.0 / 32768.0, 3000.0 / 32768.0]);
        assert_eq!(audio.plane(1).unwrap(), &[2000.0 / 32768.0, 4000.0 / 32768.0]);
    }

    #[test]
    fn interleaved_round_trips_plane_layout() {
        let encoded = encode_samples(&[1000, 2000, 3000, 4000]);
        let audio = decode_pcm16(&encoded, 24_000, 2).unwrap();

        let inter = audio.interleaved();
        assert_eq!(
            inter,
            vec![
                1000.0 / 32768.0,
                2000.0 / 32768.0,
                3000.0 / 32768.0,
                4000.0 / 32768.0
            ]
        );
    }

    // ---- truncation --------------------------------------------------------

    #[test]
    fn trailing_incomplete_frame_is_dropped() {
        // 5 samples over 2 channels → 2 complete frames, 1 sample dropped.
        let encoded = encode_samples(&[1, 2, 3, 4, 5]);
        let audio = decode_pcm16(&encoded, 24_000, 2).unwrap();

        assert_eq!(audio.frames(), 2);
        assert_eq!(audio.plane(0).unwrap().len(), 2);
        assert_eq!(audio.plane(1).unwrap().len(), 2);
    }

    #[test]
    fn odd_trailing_byte_is_dropped() {
        // 3 bytes → one complete i16 sample, trailing byte ignored.
        let encoded = BASE64.encode([0x00u8, 0x10, 0xFF]);
        let audio = decode_pcm16(&encoded, 24_000, 1).unwrap();
        assert_eq!(audio.frames(), 1);
    }

    // ---- edge cases --------------------------------------------------------

    #[test]
    fn empty_payload_yields_zero_frames() {
        let audio = decode_pcm16("", 24_000, 1).unwrap();
        assert_eq!(audio.frames(), 0);
        assert_eq!(audio.duration_secs(), 0.0);
        assert!(audio.interleaved().is_empty());
    }

    #[test]
    fn invalid_base64_is_an_error() {
        assert!(matches!(
            decode_pcm16("not base64!!!", 24_000, 1),
            Err(DecodeError::Base64(_))
        ));
    }

    #[test]
    fn zero_channels_is_an_error() {
        let encoded = encode_samples(&[1, 2]);
        assert!(matches!(
            decode_pcm16(&encoded, 24_000, 0),
            Err(DecodeError::ZeroChannels)
        ));
    }

    #[test]
    fn out_of_range_plane_is_none() {
        let encoded = encode_samples(&[1000, 2000]);
        let audio = decode_pcm16(&encoded, 24_000, 2).unwrap();

        assert!(audio.plane(1).is_some());
        assert!(audio.plane(2).is_none());
    }

    #[test]
    fn duration_reflects_sample_rate() {
        // 24 000 mono frames @ 24 kHz = exactly 1 second.
        let encoded = encode_samples(&vec![0i16; 24_000]);
        let audio = decode_pcm16(&encoded, 24_000, 1).unwrap();
        assert!((audio.duration_secs() - 1.0).abs() < f32::EPSILON);
    }
}
