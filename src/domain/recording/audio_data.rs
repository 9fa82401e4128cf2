//! Audio data value object

use std::fmt;

/// Audio MIME types the coach backend accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioMimeType {
    #[default]
    Wav,
    Webm,
    Mp3,
    Mpeg,
    Mp4,
    Aac,
}

impl AudioMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
            Self::Mp3 => "audio/mp3",
            Self::Mpeg => "audio/mpeg",
            Self::Mp4 => "audio/mp4",
            Self::Aac => "audio/aac",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Webm => "webm",
            Self::Mp3 | Self::Mpeg => "mp3",
            Self::Mp4 => "mp4",
            Self::Aac => "aac",
        }
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value object representing one assembled audio object ready for upload.
/// Contains the concatenated recording bytes and their MIME type.
#[derive(Debug, Clone)]
pub struct AudioData {
    data: Vec<u8>,
    mime_type: AudioMimeType,
}

impl AudioData {
    /// Create AudioData from raw bytes
    pub fn new(data: Vec<u8>, mime_type: AudioMimeType) -> Self {
        Self { data, mime_type }
    }

    /// Get the raw audio data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio data
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the MIME type
    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_as_str() {
        assert_eq!(AudioMimeType::Wav.as_str(), "audio/wav");
        assert_eq!(AudioMimeType::Webm.as_str(), "audio/webm");
        assert_eq!(AudioMimeType::Mp3.as_str(), "audio/mp3");
    }

    #[test]
    fn mime_type_extension() {
        assert_eq!(AudioMimeType::Wav.extension(), "wav");
        assert_eq!(AudioMimeType::Webm.extension(), "webm");
        assert_eq!(AudioMimeType::Mpeg.extension(), "mp3");
    }

    #[test]
    fn default_mime_type_is_wav() {
        assert_eq!(AudioMimeType::default(), AudioMimeType::Wav);
    }

    #[test]
    fn audio_data_size() {
        let data = AudioData::new(vec![0u8; 1024], AudioMimeType::Wav);
        assert_eq!(data.size_bytes(), 1024);
    }

    #[test]
    fn human_readable_size_bytes() {
        let data = AudioData::new(vec![0u8; 500], AudioMimeType::Wav);
        assert_eq!(data.human_readable_size(), "500 B");
    }

    #[test]
    fn human_readable_size_kb() {
        let data = AudioData::new(vec![0u8; 2048], AudioMimeType::Wav);
        assert_eq!(data.human_readable_size(), "2.0 KB");
    }

    #[test]
    fn human_readable_size_mb() {
        let data = AudioData::new(vec![0u8; 2 * 1024 * 1024], AudioMimeType::Wav);
        assert_eq!(data.human_readable_size(), "2.0 MB");
    }

    #[test]
    fn into_data_returns_bytes() {
        let data = AudioData::new(vec![1, 2, 3], AudioMimeType::Wav);
        assert_eq!(data.into_data(), vec![1, 2, 3]);
    }
}
