use crate::engine::dsp::{damping::Damping, drive::Drive, filter::DeadZoneFilter, phaser::Phaser, reverb::{Reverb, ReverbParams}};
use crate::engine::modules::{modulation::Modulation, voice::Voice};
use crate::engine::params::{ParamId, ParamSnapshot};

const LIMIT_KNEE: f32 = 0.9;
const LIMIT_SLOPE: f32 = 0.1;

/// Gentle limiter: unity below the knee, 10:1 above it.
#[inline]
pub fn soft_limit(x: f32) -> f32 {
  let a = x.abs();
  if a > LIMIT_KNEE { x.signum() * (LIMIT_KNEE + (a - LIMIT_KNEE) * LIMIT_SLOPE) } else { x }
}

/// Voice, pitch modulation and the fixed effect chain, rendered one frame at a time.
///
/// Stage order never changes: drive, phaser, filter, damping, reverb, gain, limiter.
pub struct SynthGraph {
  pub sr: f32,
  modulation: Modulation,
  voice: Voice,
  drive: Drive,
  phaser: Phaser,
  filter: DeadZoneFilter,
  damping: Damping,
  reverb: Reverb,
}

impl SynthGraph {
  pub fn new(sr: f32) -> Self {
    Self {
      sr,
      modulation: Modulation::new(sr),
      voice: Voice::new(sr),
      drive: Drive::new(),
      phaser: Phaser::new(sr),
      filter: DeadZoneFilter::new(sr),
      damping: Damping::new(sr),
      reverb: Reverb::new(sr),
    }
  }

  pub fn render_frame(&mut self, p: &ParamSnapshot) -> (f32, f32) {
    // muted: nothing runs, nothing advances
    if p.muted { return (0.0, 0.0); }

    let base_freq = self.modulation.pitch(p);
    let (l, r) = self.voice.render(base_freq, p.get(ParamId::Detune), p.get(ParamId::Waveform));

    let (l, r) = self.drive.process(l, r, p.get(ParamId::Distortion));
    let (l, r) = self.phaser.process(l, r, p.get(ParamId::Phaser));
    let (l, r) = self.filter.process(l, r, p.get(ParamId::Filter));
    let (l, r) = self.damping.process(l, r);
    let rv = ReverbParams {
      amount: p.get(ParamId::ReverbAmount),
      length: p.get(ParamId::ReverbLength),
      tone: p.get(ParamId::ReverbTone),
    };
    let (l, r) = self.reverb.process(l, r, &rv);

    let amp = p.get(ParamId::Amplitude);
    let (l, r) = (soft_limit(l * amp), soft_limit(r * amp));
    if l.is_finite() && r.is_finite() { (l, r) } else { (0.0, 0.0) }
  }

  /// Render into separate channel buffers; stops at the shorter one.
  pub fn render_block(&mut self, p: &ParamSnapshot, left: &mut [f32], right: &mut [f32]) {
    for (l, r) in left.iter_mut().zip(right.iter_mut()) {
      let (yl, yr) = self.render_frame(p);
      *l = yl;
      *r = yr;
    }
  }
}
