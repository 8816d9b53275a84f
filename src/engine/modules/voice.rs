use crate::engine::dsp::waveform::{BaseWave, MorphPos};

pub const MIN_FREQ: f32 = 20.0;
pub const MAX_FREQ: f32 = 12_000.0;

#[derive(Clone, Debug)]
struct Osc {
  phase: f32,
  sr: f32,
}

impl Osc {
  fn new(sr: f32) -> Self { Self { phase: 0.0, sr } }
  #[inline]
  fn next(&mut self, freq: f32, shape: BaseWave) -> f32 {
    let y = shape.sample(self.phase);
    self.phase = (self.phase + freq / self.sr).fract();
    y
  }
}

/// Two oscillators rendering the neighbouring shapes of the morph.
#[derive(Clone, Debug)]
struct OscPair {
  a: Osc,
  b: Osc,
}

impl OscPair {
  fn new(sr: f32) -> Self { Self { a: Osc::new(sr), b: Osc::new(sr) } }
  #[inline]
  fn next(&mut self, freq: f32, pos: &MorphPos) -> f32 {
    let sa = self.a.next(freq, pos.a);
    let sb = self.b.next(freq, pos.b);
    pos.blend(sa, sb)
  }
}

/// Detuned left/right frequencies, each clamped to the oscillator range.
#[inline]
pub fn stereo_freqs(base_freq: f32, detune: f32) -> (f32, f32) {
  let detune_hz = base_freq * 0.05 * detune;
  let clamp = |f: f32| if f.is_finite() { f.clamp(MIN_FREQ, MAX_FREQ) } else { MIN_FREQ };
  (clamp(base_freq - detune_hz), clamp(base_freq + detune_hz))
}

/// The single synth voice: one morphing oscillator pair per output channel.
#[derive(Clone, Debug)]
pub struct Voice {
  l: OscPair,
  r: OscPair,
}

impl Voice {
  pub fn new(sr: f32) -> Self { Self { l: OscPair::new(sr), r: OscPair::new(sr) } }

  /// `waveform` is the normalized morph parameter.
  #[inline]
  pub fn render(&mut self, base_freq: f32, detune: f32, waveform: f32) -> (f32, f32) {
    let (fl, fr) = stereo_freqs(base_freq, detune);
    let pos = MorphPos::from_param(waveform);
    (self.l.next(fl, &pos), self.r.next(fr, &pos))
  }
}
