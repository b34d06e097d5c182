//! Planar PCM buffers handed in by the synthesizer and out to playback.

use crate::error::{HumanizeError, HumanizeResult};

/// A block of planar (non-interleaved) float samples.
///
/// Shape (`sample_rate`, channel count, frame count) is fixed at
/// construction. Only sample contents can be mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    sample_rate: f64,
    frame_count: usize,
    channels: Vec<Vec<f32>>,
}

impl PcmBuffer {
    /// Creates a buffer from planar channel data.
    ///
    /// # Errors
    /// Fails if the sample rate is not a positive finite number or if the
    /// channels have different lengths.
    pub fn new(sample_rate: f64, channels: Vec<Vec<f32>>) -> HumanizeResult<Self> {
        validate_sample_rate(sample_rate)?;

        let frame_count = channels.first().map_or(0, Vec::len);
        for (channel, samples) in channels.iter().enumerate() {
            if samples.len() != frame_count {
                return Err(HumanizeError::ChannelLengthMismatch {
                    channel,
                    expected: frame_count,
                    found: samples.len(),
                });
            }
        }

        Ok(Self {
            sample_rate,
            frame_count,
            channels,
        })
    }

    /// Creates a single-channel buffer.
    pub fn mono(sample_rate: f64, samples: Vec<f32>) -> HumanizeResult<Self> {
        Self::new(sample_rate, vec![samples])
    }

    /// Creates a silent buffer of the given shape.
    pub fn silent(sample_rate: f64, channel_count: usize, frame_count: usize) -> HumanizeResult<Self> {
        Self::new(sample_rate, vec![vec![0.0; frame_count]; channel_count])
    }

    /// Deinterleaves `[l0, r0, l1, r1, ...]` into planar channels.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(
        sample_rate: f64,
        channel_count: usize,
        interleaved: &[f32],
    ) -> HumanizeResult<Self> {
        if channel_count == 0 {
            return Self::new(sample_rate, Vec::new());
        }

        let frame_count = interleaved.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frame_count); channel_count];
        for frame in interleaved.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Self::new(sample_rate, channels)
    }

    /// Interleaves the planar channels into a single vector.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frame_count * self.channels.len());
        for frame in 0..self.frame_count {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }

    /// Splits the buffer into consecutive chunks of at most `chunk_frames`.
    ///
    /// Simulates the incremental delivery of a synthesizer callback. A
    /// `chunk_frames` of zero is treated as one.
    pub fn split_frames(&self, chunk_frames: usize) -> Vec<PcmBuffer> {
        let chunk_frames = chunk_frames.max(1);
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < self.frame_count {
            let end = (start + chunk_frames).min(self.frame_count);
            chunks.push(PcmBuffer {
                sample_rate: self.sample_rate,
                frame_count: end - start,
                channels: self
                    .channels
                    .iter()
                    .map(|c| c[start..end].to_vec())
                    .collect(),
            });
            start = end;
        }

        chunks
    }

    /// Frames per second.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Number of planar channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// True when there is nothing to process.
    pub fn is_empty(&self) -> bool {
        self.frame_count == 0 || self.channels.is_empty()
    }

    /// Samples of one channel.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Mutable samples of one channel.
    pub fn channel_mut(&mut self, index: usize) -> Option<&mut [f32]> {
        self.channels.get_mut(index).map(Vec::as_mut_slice)
    }

    /// Splits off channel 0 (the voice) from the remaining channels.
    pub(crate) fn split_voice_mut(&mut self) -> Option<(&mut [f32], &mut [Vec<f32>])> {
        self.channels
            .split_first_mut()
            .map(|(voice, rest)| (voice.as_mut_slice(), rest))
    }

    /// Consumes the buffer and returns its planar channels.
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }
}

fn validate_sample_rate(rate: f64) -> HumanizeResult<()> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(HumanizeError::InvalidSampleRate { rate });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_validates_shape() {
        let err = PcmBuffer::new(44100.0, vec![vec![0.0; 4], vec![0.0; 3]]).unwrap_err();
        assert!(matches!(
            err,
            HumanizeError::ChannelLengthMismatch {
                channel: 1,
                expected: 4,
                found: 3
            }
        ));
    }

    #[test]
    fn test_new_rejects_bad_sample_rate() {
        for rate in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(PcmBuffer::mono(rate, vec![0.0]).is_err());
        }
    }

    #[test]
    fn test_degenerate_buffers_are_empty() {
        assert!(PcmBuffer::new(22050.0, Vec::new()).unwrap().is_empty());
        assert!(PcmBuffer::silent(22050.0, 2, 0).unwrap().is_empty());
        assert!(!PcmBuffer::silent(22050.0, 1, 1).unwrap().is_empty());
    }

    #[test]
    fn test_interleave_conversion() {
        let interleaved: [f32; 7] = [0.1, -0.1, 0.2, -0.2, 0.3, -0.3, 0.4];
        let buffer = PcmBuffer::from_interleaved(16000.0, 2, &interleaved).unwrap();

        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.frame_count(), 3);
        assert_eq!(buffer.channel(0).unwrap().to_vec(), vec![0.1f32, 0.2, 0.3]);
        assert_eq!(buffer.channel(1).unwrap().to_vec(), vec![-0.1f32, -0.2, -0.3]);
        assert_eq!(buffer.to_interleaved(), interleaved[..6].to_vec());
    }

    #[test]
    fn test_split_frames() {
        let buffer = PcmBuffer::mono(8000.0, (0..10).map(|i| i as f32).collect()).unwrap();
        let chunks = buffer.split_frames(4);

        let sizes: Vec<usize> = chunks.iter().map(PcmBuffer::frame_count).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(chunks[2].channel(0).unwrap().to_vec(), vec![8.0f32, 9.0]);
        assert!(chunks.iter().all(|c| c.sample_rate() == 8000.0));
    }

    #[test]
    fn test_channel_mut_keeps_shape() {
        let mut buffer = PcmBuffer::silent(8000.0, 1, 3).unwrap();
        buffer.channel_mut(0).unwrap()[1] = 0.5;

        assert_eq!(buffer.frame_count(), 3);
        assert_eq!(buffer.channel(0).unwrap().to_vec(), vec![0.0f32, 0.5, 0.0]);
        assert!(buffer.channel_mut(1).is_none());
    }

    #[test]
    fn test_into_channels() {
        let buffer = PcmBuffer::new(8000.0, vec![vec![0.25, 0.5], vec![-0.25, -0.5]]).unwrap();
        assert_eq!(
            buffer.into_channels(),
            vec![vec![0.25f32, 0.5], vec![-0.25f32, -0.5]]
        );
    }
}
