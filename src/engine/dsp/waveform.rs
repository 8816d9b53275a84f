//! Base waveforms and the continuous morph between neighbouring shapes.
//!
//! Phase is in cycles, `[0, 1)`. Morph position is in `[0, 3]`:
//! 0 = sine, 1 = triangle, 2 = saw, 3 = square.

use std::f32::consts::TAU;

pub const WAVE_COUNT: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaseWave { Sine, Triangle, Saw, Square }

impl BaseWave {
  pub const ALL: [BaseWave; WAVE_COUNT] = [BaseWave::Sine, BaseWave::Triangle, BaseWave::Saw, BaseWave::Square];

  /// Out-of-range indices clamp to the last shape.
  pub fn from_index(i: usize) -> Self { Self::ALL[i.min(WAVE_COUNT - 1)] }

  #[inline]
  pub fn sample(self, p: f32) -> f32 {
    match self {
      BaseWave::Sine => (TAU * p).sin(),
      BaseWave::Triangle => 1.0 - (((4.0 * p) % 4.0) - 2.0).abs(),
      BaseWave::Saw => 2.0 * (p - (p + 0.5).floor()),
      BaseWave::Square => if p < 0.5 { 0.8 } else { -0.8 },
    }
  }
}

/// Resolved morph position: the two shapes to blend and the blend amount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphPos {
  pub a: BaseWave,
  pub b: BaseWave,
  pub frac: f32,
}

impl MorphPos {
  pub fn new(morph: f32) -> Self {
    let last = WAVE_COUNT - 1;
    let m = if morph.is_finite() { morph.clamp(0.0, last as f32) } else { 0.0 };
    let idx_a = (m.floor() as usize).min(last);
    let idx_b = (idx_a + 1).min(last);
    let frac = if idx_a == last { 0.0 } else { m - idx_a as f32 };
    Self { a: BaseWave::from_index(idx_a), b: BaseWave::from_index(idx_b), frac }
  }

  /// Morph position from the normalized waveform parameter.
  pub fn from_param(waveform: f32) -> Self { Self::new(waveform * (WAVE_COUNT - 1) as f32) }

  #[inline]
  pub fn blend(&self, sa: f32, sb: f32) -> f32 {
    if self.frac == 0.0 { return sa; }
    sa * (1.0 - self.frac) + sb * self.frac
  }
}

#[inline]
pub fn morph_sample(phase: f32, morph: f32) -> f32 {
  let pos = MorphPos::new(morph);
  pos.blend(pos.a.sample(phase), pos.b.sample(phase))
}
