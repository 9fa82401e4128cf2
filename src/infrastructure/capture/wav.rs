//! WAV assembly for the upload payload

use std::io::Cursor;

use crate::application::ports::CaptureError;

/// Wrap little-endian mono 16-bit PCM bytes in a WAV container.
pub(crate) fn encode_wav_mono16(pcm: &[u8], sample_rate: u32) -> Result<Vec<u8>, CaptureError> {
    if sample_rate == 0 {
        return Err(CaptureError::AssemblyFailed("sample rate unknown".into()));
    }
    if pcm.len() % 2 != 0 {
        return Err(CaptureError::AssemblyFailed(
            "PCM byte length is not sample-aligned".into(),
        ));
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| CaptureError::AssemblyFailed(e.to_string()))?;
        for sample in pcm.chunks_exact(2) {
            let value = i16::from_le_bytes([sample[0], sample[1]]);
            writer
                .write_sample(value)
                .map_err(|e| CaptureError::AssemblyFailed(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| CaptureError::AssemblyFailed(e.to_string()))?;
    }
    Ok(cursor.into_inner())
}
