//! WAV input and the WAV-writing buffer sink.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use anyhow::{Context, Result};
use humanizer_dsp::{BufferSink, HumanizeError, HumanizeResult, PcmBuffer};

/// Reads a WAV file into one planar buffer.
///
/// Integer PCM of 8 to 32 bits and 32-bit float are accepted. Integer
/// samples are normalized to [-1.0, 1.0].
pub fn read_wav(path: &Path) -> Result<(PcmBuffer, hound::WavSpec)> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file '{}'", path.display()))?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            if !(8..=32).contains(&spec.bits_per_sample) {
                anyhow::bail!(
                    "Unsupported bit depth in '{}': {} bits (supported: 8-32)",
                    path.display(),
                    spec.bits_per_sample
                );
            }
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .with_context(|| format!("Failed to read samples from '{}'", path.display()))?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .with_context(|| format!("Failed to read samples from '{}'", path.display()))?,
    };

    let buffer = PcmBuffer::from_interleaved(
        spec.sample_rate as f64,
        spec.channels as usize,
        &interleaved,
    )?;

    Ok((buffer, spec))
}

/// Sink that appends every buffer to a WAV file.
///
/// Integer formats are clamped to full scale before quantizing.
pub struct WavSink<W: Write + Seek> {
    writer: hound::WavWriter<W>,
    spec: hound::WavSpec,
}

impl WavSink<BufWriter<File>> {
    /// Creates the output file.
    pub fn create(path: &Path, spec: hound::WavSpec) -> Result<Self> {
        let writer = hound::WavWriter::create(path, spec)
            .with_context(|| format!("Failed to create WAV file '{}'", path.display()))?;
        Ok(Self { writer, spec })
    }
}

impl<W: Write + Seek> WavSink<W> {
    /// Wraps an existing writer.
    pub fn new(writer: hound::WavWriter<W>) -> Self {
        let spec = writer.spec();
        Self { writer, spec }
    }

    /// Flushes the header and closes the file.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("Failed to finalize WAV file")
    }

    fn write_sample(&mut self, sample: f32) -> hound::Result<()> {
        match self.spec.sample_format {
            hound::SampleFormat::Float => self.writer.write_sample(sample),
            hound::SampleFormat::Int => {
                let max = ((1i64 << (self.spec.bits_per_sample - 1)) - 1) as f64;
                let quantized = (sample.clamp(-1.0, 1.0) as f64 * max).round() as i32;
                self.writer.write_sample(quantized)
            }
        }
    }
}

impl<W: Write + Seek> BufferSink for WavSink<W> {
    fn accept(&mut self, buffer: PcmBuffer) -> HumanizeResult<()> {
        for sample in buffer.to_interleaved() {
            self.write_sample(sample)
                .map_err(|e| HumanizeError::sink(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(sample_format: hound::SampleFormat, bits_per_sample: u16) -> hound::WavSpec {
        hound::WavSpec {
            channels: 2,
            sample_rate: 16000,
            bits_per_sample,
            sample_format,
        }
    }

    #[test]
    fn test_int16_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");

        let mut sink = WavSink::create(&path, spec(hound::SampleFormat::Int, 16)).unwrap();
        let buffer = PcmBuffer::new(16000.0, vec![vec![0.5, -0.5, 2.0], vec![0.0, 0.25, -2.0]]).unwrap();
        sink.accept(buffer).unwrap();
        sink.finalize().unwrap();

        let (read, read_spec) = read_wav(&path).unwrap();
        assert_eq!(read_spec.channels, 2);
        assert_eq!(read.frame_count(), 3);

        let left = read.channel(0).unwrap();
        assert!((left[0] - 0.5).abs() < 1e-3);
        assert!((left[1] + 0.5).abs() < 1e-3);
        // Clamped to full scale.
        assert!((left[2] - 1.0).abs() < 1e-3);
        assert!((read.channel(1).unwrap()[2] + 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_float_round_trip_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("float.wav");

        let mut sink = WavSink::create(&path, spec(hound::SampleFormat::Float, 32)).unwrap();
        sink.accept(PcmBuffer::new(16000.0, vec![vec![0.123, 1.5], vec![-0.75, 0.0]]).unwrap())
            .unwrap();
        sink.finalize().unwrap();

        let (read, _) = read_wav(&path).unwrap();
        assert_eq!(read.to_interleaved(), vec![0.123f32, -0.75, 1.5, 0.0]);
    }

    #[test]
    fn test_sink_over_in_memory_writer() {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let writer =
                hound::WavWriter::new(&mut cursor, spec(hound::SampleFormat::Int, 24)).unwrap();
            let mut sink = WavSink::new(writer);
            sink.accept(PcmBuffer::new(16000.0, vec![vec![0.5; 4], vec![-0.5; 4]]).unwrap())
                .unwrap();
            sink.finalize().unwrap();
        }

        cursor.set_position(0);
        let mut reader = hound::WavReader::new(cursor).unwrap();
        assert_eq!(reader.spec().bits_per_sample, 24);
        let samples: Vec<i32> = reader.samples::<i32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 8);
        assert_eq!(samples[0], (0.5 * 8_388_607.0f64).round() as i32);
        assert_eq!(samples[1], -samples[0]);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = read_wav(Path::new("/nonexistent/voice.wav")).unwrap_err();
        assert!(err.to_string().contains("voice.wav"));
    }
}
