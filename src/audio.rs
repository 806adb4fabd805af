use hound::WavReader;
use std::path::Path;

pub fn wav_duration_seconds(path: &Path) -> anyhow::Result<f64> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let frames = reader.len() as f64 / spec.channels as f64;
    Ok(frames / spec.sample_rate as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    fn write_silence(path: &Path, seconds: f64, channels: u16) {
        let spec = WavSpec {
            channels,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        let samples = (seconds * 16_000.0) as usize * channels as usize;
        for _ in 0..samples {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn duration_accounts_for_channels() {
        let dir = tempfile::TempDir::new().unwrap();
        let mono = dir.path().join("mono.wav");
        let stereo = dir.path().join("stereo.wav");
        write_silence(&mono, 1.5, 1);
        write_silence(&stereo, 1.5, 2);
        assert!((wav_duration_seconds(&mono).unwrap() - 1.5).abs() < 1e-9);
        assert!((wav_duration_seconds(&stereo).unwrap() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(wav_duration_seconds(Path::new("/nonexistent/part.wav")).is_err());
    }
}
