use crate::engine::dsp::lfo::{Lfo, LfoShape};
use crate::engine::params::{ParamId, ParamSnapshot};

/// Wobble LFO rate in Hz.
#[inline]
pub fn wobble_rate(speed: f32) -> f32 { 0.1 + 14.9 * speed }

/// Sweep LFO rate in Hz.
#[inline]
pub fn sweep_rate(rate: f32) -> f32 { 0.02 + 0.48 * rate }

/// Pitch modulation: a fast sine vibrato ("wobble") and a slow triangle
/// octave sweep.
#[derive(Clone, Debug)]
pub struct Modulation {
  sr: f32,
  wobble: Lfo,
  sweep: Lfo,
}

impl Modulation {
  pub fn new(sr: f32) -> Self {
    Self { sr, wobble: Lfo::new(LfoShape::Sine), sweep: Lfo::new(LfoShape::Triangle) }
  }

  /// Base voice frequency for this sample, before detune.
  #[inline]
  pub fn pitch(&mut self, p: &ParamSnapshot) -> f32 {
    let frequency = p.get(ParamId::Frequency);
    let sweep_out = self.sweep.next(sweep_rate(p.get(ParamId::SweepRate)), self.sr);
    let sweep_factor = (sweep_out * p.get(ParamId::SweepAmount)).exp2();
    let wobble_out = self.wobble.next(wobble_rate(p.get(ParamId::WobbleSpeed)), self.sr);
    let wobble = wobble_out * frequency * 0.2 * p.get(ParamId::WobbleAmount);
    (frequency + wobble) * sweep_factor
  }
}
