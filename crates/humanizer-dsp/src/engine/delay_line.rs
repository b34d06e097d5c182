//! Fixed-capacity circular delay line with fractional reads.

/// Default ring size in samples. Independent of buffer size.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Largest ring a tuning may request.
pub const MAX_CAPACITY: usize = 1 << 20;

/// A ring buffer read at a fractional offset behind its write head.
///
/// Storage is allocated once in [`DelayLine::new`] and never resized, so
/// the per-frame path does not allocate.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Creates a zero-filled delay line with the given capacity in samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(4)],
            write_pos: 0,
        }
    }

    /// Ring size in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Index the next sample will be written to.
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Writes `input` at the head, reads `delay_samples` behind it, then
    /// advances the head.
    ///
    /// A delay of `n` whole samples returns the input written `n` calls
    /// ago. Any delay, including negative or larger-than-capacity values,
    /// is wrapped into the ring before indexing.
    #[inline]
    pub fn write_and_read(&mut self, input: f32, delay_samples: f64) -> f64 {
        self.buffer[self.write_pos] = input;
        let delayed = self.read_at(self.write_pos as f64 - delay_samples);
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        delayed
    }

    /// Linearly interpolated read at a fractional ring position.
    #[inline]
    fn read_at(&self, position: f64) -> f64 {
        let len = self.buffer.len();
        let position = position.rem_euclid(len as f64);

        // NaN and rounding up to `len` both land back inside the ring.
        let index0 = (position.floor() as usize) % len;
        let index1 = (index0 + 1) % len;
        let frac = position - position.floor();

        let sample0 = self.buffer[index0] as f64;
        let sample1 = self.buffer[index1] as f64;

        sample0 * (1.0 - frac) + sample1 * frac
    }

    /// Zeros the contents and rewinds the head.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
