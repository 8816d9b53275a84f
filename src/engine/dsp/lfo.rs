use super::waveform::BaseWave;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LfoShape { Sine, Triangle }

/// Free-running low-frequency oscillator. Output in [-1, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct Lfo {
  shape: LfoShape,
  phase: f32,
}

impl Lfo {
  pub fn new(shape: LfoShape) -> Self { Self { shape, phase: 0.0 } }

  pub fn phase(&self) -> f32 { self.phase }

  /// Sample at the current phase, then advance by `rate_hz / sr` cycles.
  #[inline]
  pub fn next(&mut self, rate_hz: f32, sr: f32) -> f32 {
    let y = match self.shape {
      LfoShape::Sine => BaseWave::Sine.sample(self.phase),
      LfoShape::Triangle => BaseWave::Triangle.sample(self.phase),
    };
    let dp = (rate_hz / sr).max(0.0);
    self.phase = (self.phase + dp).fract();
    y
  }
}
