/// Below this the phaser is skipped entirely.
pub const PHASER_BYPASS: f32 = 0.01;
const STAGES: usize = 4;
const FEEDBACK: f32 = 0.2;

/// First-order all-pass section.
#[derive(Clone, Debug, PartialEq)]
pub struct Allpass1 {
  a1: f32,
  zm1: f32,
}
impl Allpass1 {
  pub fn new() -> Self {
    Self { a1: 0.0, zm1: 0.0 }
  }
  #[inline]
  pub fn set_fc(&mut self, fc: f32, sr: f32) {
    let w = (core::f32::consts::PI * (fc / sr).min(0.49)).tan();
    self.a1 = (1.0 - w) / (1.0 + w);
  }
  #[inline]
  pub fn tick(&mut self, x: f32) -> f32 {
    let y = -self.a1 * x + self.zm1;
    self.zm1 = x + self.a1 * y;
    y
  }
}

/// One channel of the sweep: four first-order all-passes driven by a sine LFO.
#[derive(Clone, Debug, PartialEq)]
struct PhaserChannel {
  ap: [Allpass1; STAGES],
  phase: f32,
  last: f32,
}

impl PhaserChannel {
  fn new(phase: f32) -> Self {
    Self { ap: [Allpass1::new(), Allpass1::new(), Allpass1::new(), Allpass1::new()], phase, last: 0.0 }
  }

  #[inline]
  fn process(&mut self, x: f32, sr: f32, rate_hz: f32, depth: f32) -> f32 {
    let dp = rate_hz / sr;
    let modh = (core::f32::consts::TAU * self.phase).sin() * 0.5 + 0.5; // 0..1
    let fc = 200.0 + (2000.0 - 200.0) * (0.1 + 0.9 * depth * modh);
    for ap in self.ap.iter_mut() {
      ap.set_fc(fc, sr);
    }
    let y = self.ap.iter_mut().fold(x + self.last * FEEDBACK, |s, ap| ap.tick(s));
    self.last = y;
    self.phase = (self.phase + dp).fract();
    y
  }
}

/// Stereo phaser with slightly different sweep rates per side.
#[derive(Clone, Debug, PartialEq)]
pub struct Phaser {
  sr: f32,
  l: PhaserChannel,
  r: PhaserChannel,
}

impl Phaser {
  pub fn new(sr: f32) -> Self {
    Self { sr, l: PhaserChannel::new(0.0), r: PhaserChannel::new(0.25) }
  }

  /// Left/right LFO rates in Hz for a given phaser amount.
  pub fn rates(amount: f32) -> (f32, f32) { (0.5 + 2.0 * amount, 0.4 + 2.1 * amount) }

  #[inline]
  pub fn process(&mut self, l: f32, r: f32, amount: f32) -> (f32, f32) {
    if amount < PHASER_BYPASS { return (l, r); }
    let depth = amount.min(1.0);
    let (rate_l, rate_r) = Self::rates(depth);
    let yl = self.l.process(l, self.sr, rate_l, depth);
    let yr = self.r.process(r, self.sr, rate_r, depth);
    // equal dry/wet sum produces the notches
    (0.5 * (l + yl), 0.5 * (r + yr))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bypass_keeps_state_untouched() {
    let mut p = Phaser::new(48_000.0);
    let before = p.clone();
    assert_eq!(p.process(0.4, -0.4, 0.0), (0.4, -0.4));
    assert_eq!(p, before);
  }

  #[test]
  fn rates_follow_amount() {
    assert_eq!(Phaser::rates(0.0), (0.5, 0.4));
    let (l, r) = Phaser::rates(1.0);
    assert!((l - 2.5).abs() < 1e-6 && (r - 2.5).abs() < 1e-6);
  }

  #[test]
  fn channels_decorrelate() {
    let mut p = Phaser::new(48_000.0);
    let mut diff = 0.0f32;
    for n in 0..48_000 {
      let x = (n as f32 * 0.05).sin();
      let (l, r) = p.process(x, x, 0.8);
      assert!(l.is_finite() && r.is_finite());
      diff = diff.max((l - r).abs());
    }
    assert!(diff > 1e-3, "stereo sides should differ, max diff {diff}");
  }
}
