//! WAV container codec for raw narration PCM.
//!
//! The speech model returns raw mono 16-bit PCM; the audio stage wraps it in
//! a canonical 44-byte WAV header before writing to disk. Only the exact
//! layout produced by [`encode`] is accepted by [`decode_header`]: integer
//! PCM, one channel, 16 bits per sample.

use derive_getters::Getters;
use melies_error::{AudioError, AudioErrorKind, MeliesResult};

/// Length of the canonical WAV header in bytes.
pub const HEADER_LEN: usize = 44;

/// Wrap raw mono 16-bit PCM samples in a WAV container.
///
/// The output is always exactly `44 + 2 * pcm.len()` bytes.
///
/// # Examples
///
/// ```
/// use melies_core::wav;
///
/// let bytes = wav::encode(&[0, 1, -1, i16::MAX], 24000);
/// assert_eq!(bytes.len(), 44 + 8);
/// assert_eq!(&bytes[0..4], b"RIFF");
/// ```
pub fn encode(pcm: &[i16], sample_rate: u32) -> Vec<u8> {
    let data_len = (pcm.len() * 2) as u32;
    let block_align: u16 = 2;
    let byte_rate = sample_rate * u32::from(block_align);

    let mut out = Vec::with_capacity(HEADER_LEN + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // integer PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for sample in pcm {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    out
}

/// Parsed WAV header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct WavHeader {
    /// Sample rate in Hz
    sample_rate: u32,
    /// Payload size in bytes
    data_len: u32,
}

impl WavHeader {
    /// Number of 16-bit samples in the payload.
    pub fn sample_count(&self) -> u32 {
        self.data_len / 2
    }
}

fn u16_at(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Parse and validate the 44-byte header of an encoded WAV file.
///
/// Rejects anything other than the canonical layout written by [`encode`],
/// including a declared data size that disagrees with the actual payload.
///
/// # Examples
///
/// ```
/// use melies_core::wav;
///
/// let bytes = wav::encode(&[1, 2, 3], 24000);
/// let header = wav::decode_header(&bytes)?;
/// assert_eq!(*header.sample_rate(), 24000);
/// assert_eq!(header.sample_count(), 3);
/// # Ok::<(), melies_error::MeliesError>(())
/// ```
pub fn decode_header(bytes: &[u8]) -> MeliesResult<WavHeader> {
    if bytes.len() < HEADER_LEN {
        return Err(AudioError::new(AudioErrorKind::HeaderTooShort(bytes.len())).into());
    }
    if &bytes[0..4] != b"RIFF" {
        return Err(AudioError::new(AudioErrorKind::BadMagic("RIFF")).into());
    }
    if &bytes[8..12] != b"WAVE" {
        return Err(AudioError::new(AudioErrorKind::BadMagic("WAVE")).into());
    }
    if &bytes[12..16] != b"fmt " {
        return Err(AudioError::new(AudioErrorKind::BadMagic("fmt ")).into());
    }
    if &bytes[36..40] != b"data" {
        return Err(AudioError::new(AudioErrorKind::BadMagic("data")).into());
    }

    let format = u16_at(bytes, 20);
    if format != 1 {
        return Err(AudioError::new(AudioErrorKind::UnsupportedFormat(format)).into());
    }
    let channels = u16_at(bytes, 22);
    if channels != 1 {
        return Err(AudioError::new(AudioErrorKind::UnsupportedChannels(channels)).into());
    }
    let bits = u16_at(bytes, 34);
    if bits != 16 {
        return Err(AudioError::new(AudioErrorKind::UnsupportedBitDepth(bits)).into());
    }

    let data_len = u32_at(bytes, 40);
    let actual = bytes.len() - HEADER_LEN;
    if data_len as usize != actual {
        return Err(AudioError::new(AudioErrorKind::DataSizeMismatch {
            declared: data_len,
            actual,
        })
        .into());
    }

    Ok(WavHeader {
        sample_rate: u32_at(bytes, 24),
        data_len,
    })
}

/// Interpret raw bytes as little-endian 16-bit samples.
///
/// A trailing odd byte is ignored.
pub fn pcm_from_le_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_size_is_header_plus_two_per_sample() {
        for n in [0usize, 1, 2, 7, 1024] {
            let pcm = vec![0i16; n];
            assert_eq!(encode(&pcm, 24000).len(), HEADER_LEN + 2 * n);
        }
    }

    #[test]
    fn header_round_trips_rate_and_count() {
        let pcm: Vec<i16> = (0..500).map(|i| (i % 128) as i16).collect();
        for rate in [8000u32, 16000, 24000, 44100] {
            let bytes = encode(&pcm, rate);
            let header = decode_header(&bytes).unwrap();
            assert_eq!(*header.sample_rate(), rate);
            assert_eq!(header.sample_count(), 500);
        }
    }

    #[test]
    fn riff_chunk_size_accounts_for_payload() {
        let bytes = encode(&[1, 2, 3, 4], 24000);
        let declared = u32_at(&bytes, 4);
        assert_eq!(declared as usize, bytes.len() - 8);
    }

    #[test]
    fn decode_rejects_short_input() {
        let err = decode_header(&[0u8; 10]).unwrap_err();
        assert!(format!("{err}").contains("too short"));
    }

    #[test]
    fn decode_rejects_bad_magic() {
        let mut bytes = encode(&[0i16; 4], 24000);
        bytes[0] = b'X';
        assert!(decode_header(&bytes).is_err());
    }

    #[test]
    fn decode_rejects_stereo() {
        let mut bytes = encode(&[0i16; 4], 24000);
        bytes[22] = 2;
        assert!(decode_header(&bytes).is_err());
    }

    #[test]
    fn decode_rejects_truncated_payload() {
        let mut bytes = encode(&[0i16; 4], 24000);
        bytes.truncate(bytes.len() - 2);
        let err = decode_header(&bytes).unwrap_err();
        assert!(format!("{err}").contains("mismatch"));
    }

    #[test]
    fn samples_round_trip_through_bytes() {
        let pcm = vec![0i16, 1, -1, i16::MAX, i16::MIN, 12345];
        let bytes = encode(&pcm, 24000);
        assert_eq!(pcm_from_le_bytes(&bytes[HEADER_LEN..]), pcm);
    }

    #[test]
    fn trailing_odd_byte_is_ignored() {
        let samples = pcm_from_le_bytes(&[0x01, 0x00, 0xFF]);
        assert_eq!(samples, vec![1]);
    }
}
