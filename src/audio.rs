//! Inspection of produced audio artifacts.

use std::path::Path;

use hound::WavReader;

/// Basic facts about a WAV artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavInfo {
    pub duration_secs: f64,
    pub channels: u16,
    pub sample_rate: u32,
}

/// Read the header of a WAV artifact.
///
/// `None` when the file is missing or not a readable WAV; callers only
/// use this for reporting, never for control flow.
pub fn wav_info(path: &Path) -> Option<WavInfo> {
    let reader = WavReader::open(path).ok()?;
    let spec = reader.spec();
    let frames = reader.duration();

    Some(WavInfo {
        duration_secs: f64::from(frames) / f64::from(spec.sample_rate),
        channels: spec.channels,
        sample_rate: spec.sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_test_wav(path: &Path, samples: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..samples {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_wav_info_reads_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.wav");
        write_test_wav(&path, 22050);

        let info = wav_info(&path).unwrap();
        assert_eq!(info.channels, 1);
        assert_eq!(info.sample_rate, 22050);
        assert!((info.duration_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_wav_info_missing_file() {
        assert!(wav_info(Path::new("/nonexistent/file.wav")).is_none());
    }

    #[test]
    fn test_wav_info_not_a_wav() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("garbage.wav");
        std::fs::write(&path, b"not audio at all").unwrap();

        assert!(wav_info(&path).is_none());
    }
}
