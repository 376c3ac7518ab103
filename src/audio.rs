use std::fs;
use std::path::Path;

/// Declared duration assumed when the caller does not know the real one.
pub const DEFAULT_DURATION_SECS: u32 = 120;

/// An audio file staged for upload.
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
    /// Declared duration in seconds, used to size the request timeout.
    pub duration_secs: u32,
}

impl AudioFile {
    pub fn load(path: &Path, duration_secs: Option<u32>) -> Result<Self, String> {
        let bytes =
            fs::read(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio")
            .to_string();
        let mime_type = guess_mime(&file_name);

        Ok(Self {
            bytes,
            file_name,
            mime_type,
            duration_secs: duration_secs.unwrap_or(DEFAULT_DURATION_SECS),
        })
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn extension(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext,
            _ => "bin",
        }
    }
}

fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "webm" => "audio/webm",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}
