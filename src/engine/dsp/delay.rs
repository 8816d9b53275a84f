/// Fixed-capacity circular delay line.
///
/// The buffer is allocated once in `new` and never resized; `set_len` only
/// moves the read tap. `read` returns the sample written `len` writes ago.
#[derive(Clone, Debug, PartialEq)]
pub struct DelayLine {
  buf: Vec<f32>,
  wr: usize,
  len: usize,
}

impl DelayLine {
  pub fn new(capacity: usize, len: usize) -> Self {
    let capacity = capacity.max(2);
    let mut line = Self { buf: vec![0.0; capacity], wr: 0, len: 1 };
    line.set_len(len);
    line
  }

  #[inline]
  pub fn capacity(&self) -> usize { self.buf.len() }

  #[inline]
  pub fn len(&self) -> usize { self.len }

  /// Clamped to `[1, capacity - 1]`.
  #[inline]
  pub fn set_len(&mut self, len: usize) { self.len = len.clamp(1, self.buf.len() - 1); }

  #[inline]
  pub fn read(&self) -> f32 {
    let idx = (self.wr + self.len) % self.buf.len();
    self.buf[idx]
  }

  #[inline]
  pub fn write(&mut self, x: f32) {
    self.buf[self.wr] = x;
    // write head walks backwards so that wr + len lands on older samples
    self.wr = if self.wr == 0 { self.buf.len() - 1 } else { self.wr - 1 };
  }
}
