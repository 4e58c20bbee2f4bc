use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("ffprobe not found on PATH; please install FFmpeg (ffprobe)")]
    FfprobeMissing,
    #[error("ffprobe failed: {0}")]
    FfprobeFailed(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("no audio duration reported for {0}")]
    NoDuration(PathBuf),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("file too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct FfprobeJson {
    streams: Option<Vec<FfprobeStream>>,
    format: Option<FfprobeFormat>,
}

/// Metadata for one audio source. Duration is mandatory; the rest is
/// best-effort, depending on what the container reports.
#[derive(Debug, Clone)]
pub struct AudioInfo {
    pub path: PathBuf,
    pub duration_seconds: f64,
    pub codec_name: Option<String>,
    pub bitrate_bps: Option<u64>,
    pub sample_rate_hz: Option<u32>,
    pub channels: Option<u32>,
}

/// Probe an audio file with ffprobe.
pub fn probe_audio(path: &Path) -> Result<AudioInfo, ProbeError> {
    let ffprobe = which::which("ffprobe").map_err(|_| ProbeError::FfprobeMissing)?;
    debug!(path = %path.display(), "probing audio");

    let out = Command::new(ffprobe)
        .arg("-v")
        .arg("error")
        .arg("-print_format")
        .arg("json")
        .arg("-show_format")
        .arg("-show_streams")
        .arg(path.as_os_str())
        .output()
        .map_err(|e| ProbeError::FfprobeFailed(e.to_string()))?;
    if !out.status.success() {
        return Err(ProbeError::FfprobeFailed(
            String::from_utf8_lossy(&out.stderr).into(),
        ));
    }

    parse_probe_output(path, &out.stdout)
}

fn parse_probe_output(path: &Path, stdout: &[u8]) -> Result<AudioInfo, ProbeError> {
    let parsed: FfprobeJson =
        serde_json::from_slice(stdout).map_err(|e| ProbeError::Parse(e.to_string()))?;

    let format = parsed.format.unwrap_or(FfprobeFormat {
        duration: None,
        bit_rate: None,
    });
    let duration_seconds = format
        .duration
        .as_deref()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| ProbeError::NoDuration(path.to_path_buf()))?;

    let audio = parsed
        .streams
        .unwrap_or_default()
        .into_iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"));

    let (codec_name, sample_rate_hz, channels) = match audio {
        Some(stream) => (
            stream.codec_name,
            stream.sample_rate.as_deref().and_then(|s| s.parse().ok()),
            stream.channels,
        ),
        None => (None, None, None),
    };

    Ok(AudioInfo {
        path: path.to_path_buf(),
        duration_seconds,
        codec_name,
        bitrate_bps: format.bit_rate.as_deref().and_then(|s| s.parse().ok()),
        sample_rate_hz,
        channels,
    })
}

/// Extensions the backend accepts for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac", "ogg", "flac"];

const DEFAULT_MAX_SIZE_BYTES: u64 = 200 * 1024 * 1024;

/// Pre-upload checks mirroring what the backend enforces, so obviously bad
/// files are rejected before any bytes go over the wire.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_size_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn new(max_size_bytes: u64) -> Self {
        Self { max_size_bytes }
    }

    pub fn check(&self, path: &Path) -> Result<(), ProbeError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ProbeError::UnsupportedFormat(extension));
        }

        let size = std::fs::metadata(path)?.len();
        if size > self.max_size_bytes {
            return Err(ProbeError::TooLarge {
                size,
                limit: self.max_size_bytes,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "streams": [
            {"codec_type": "video", "codec_name": "mjpeg"},
            {"codec_type": "audio", "codec_name": "mp3", "sample_rate": "44100", "channels": 2}
        ],
        "format": {"duration": "123.456", "bit_rate": "192000"}
    }"#;

    #[test]
    fn test_parse_probe_output() {
        let info = parse_probe_output(Path::new("x.mp3"), SAMPLE.as_bytes()).unwrap();
        assert!((info.duration_seconds - 123.456).abs() < 1e-9);
        assert_eq!(info.codec_name.as_deref(), Some("mp3"));
        assert_eq!(info.bitrate_bps, Some(192_000));
        assert_eq!(info.sample_rate_hz, Some(44_100));
        assert_eq!(info.channels, Some(2));
    }

    #[test]
    fn test_parse_tolerates_missing_optional_fields() {
        let json = r#"{"streams": [], "format": {"duration": "10.0"}}"#;
        let info = parse_probe_output(Path::new("x.wav"), json.as_bytes()).unwrap();
        assert_eq!(info.duration_seconds, 10.0);
        assert_eq!(info.codec_name, None);
        assert_eq!(info.bitrate_bps, None);
    }

    #[test]
    fn test_parse_requires_duration() {
        let json = r#"{"streams": [], "format": {}}"#;
        let err = parse_probe_output(Path::new("x.wav"), json.as_bytes()).unwrap_err();
        assert!(matches!(err, ProbeError::NoDuration(_)));

        let json = r#"{"streams": [], "format": {"duration": "garbage"}}"#;
        let err = parse_probe_output(Path::new("x.wav"), json.as_bytes()).unwrap_err();
        assert!(matches!(err, ProbeError::NoDuration(_)));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse_probe_output(Path::new("x.mp3"), b"not json").unwrap_err();
        assert!(matches!(err, ProbeError::Parse(_)));
    }

    #[test]
    fn test_policy_accepts_allowed_extensions_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.MP3");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"abc")
            .unwrap();

        UploadPolicy::default().check(&path).unwrap();
    }

    #[test]
    fn test_policy_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::File::create(&path).unwrap();

        let err = UploadPolicy::default().check(&path).unwrap_err();
        assert!(matches!(err, ProbeError::UnsupportedFormat(ext) if ext == "txt"));
    }

    #[test]
    fn test_policy_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.wav");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(&[0u8; 64])
            .unwrap();

        let err = UploadPolicy::new(16).check(&path).unwrap_err();
        assert!(matches!(err, ProbeError::TooLarge { size: 64, limit: 16 }));
    }
}
