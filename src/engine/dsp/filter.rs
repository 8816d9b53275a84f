use std::f32::consts::PI;

/// Filter parameter range mapped to a transparent passthrough (inclusive).
pub const DEAD_ZONE: (f32, f32) = (0.45, 0.55);
/// Fixed low resonance of the tone filter.
pub const RESONANCE: f32 = 0.1;

#[derive(Clone, Debug, PartialEq)]
struct Svf {
  ic1eq: f32,
  ic2eq: f32,
  g: f32,
  k: f32,
}

impl Svf {
  fn new() -> Self { Self { ic1eq: 0.0, ic2eq: 0.0, g: 0.1, k: 1.0 } }
  fn set_params(&mut self, cutoff: f32, k: f32, sr: f32) {
    let fc = (cutoff / sr).clamp(0.0001, 0.49);
    self.g = (PI * fc).tan();
    self.k = k;
  }
  /// Returns (low-pass, high-pass).
  fn process(&mut self, x: f32) -> (f32, f32) {
    let g = self.g; let k = self.k;
    let v1 = (self.ic1eq + g * (x - self.ic2eq)) / (1.0 + g * (g + k));
    let v2 = self.ic2eq + g * v1;
    self.ic1eq = 2.0 * v1 - self.ic1eq;
    self.ic2eq = 2.0 * v2 - self.ic2eq;
    let lp = v2;
    let hp = x - k * v1 - lp;
    (lp, hp)
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterMode {
  Bypass,
  LowPass(f32),
  HighPass(f32),
}

/// Map the filter parameter to a mode and cutoff in Hz.
pub fn filter_mode(v: f32) -> FilterMode {
  let (lo, hi) = DEAD_ZONE;
  if v < lo {
    FilterMode::LowPass(100.0 + (v.max(0.0) / lo) * 10_000.0)
  } else if v > hi {
    let t = ((v.min(1.0) - hi) / (1.0 - hi)).clamp(0.0, 1.0);
    FilterMode::HighPass(50.0 + t * t * 8_000.0)
  } else {
    FilterMode::Bypass
  }
}

/// Stereo low/high-pass with a neutral band around the middle of the knob.
#[derive(Clone, Debug, PartialEq)]
pub struct DeadZoneFilter {
  sr: f32,
  damp: f32,
  l: Svf,
  r: Svf,
  last_fc: f32,
}

impl DeadZoneFilter {
  pub fn new(sr: f32) -> Self {
    let damp = 2.0 * (1.0 - RESONANCE.powf(0.25));
    Self { sr, damp, l: Svf::new(), r: Svf::new(), last_fc: -1.0 }
  }

  fn tune(&mut self, fc: f32) {
    if fc == self.last_fc { return; }
    self.last_fc = fc;
    self.l.set_params(fc, self.damp, self.sr);
    self.r.set_params(fc, self.damp, self.sr);
  }

  #[inline]
  pub fn process(&mut self, l: f32, r: f32, filter: f32) -> (f32, f32) {
    match filter_mode(filter) {
      FilterMode::Bypass => (l, r),
      FilterMode::LowPass(fc) => {
        self.tune(fc);
        (self.l.process(l).0, self.r.process(r).0)
      }
      FilterMode::HighPass(fc) => {
        self.tune(fc);
        (self.l.process(l).1, self.r.process(r).1)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dead_zone_bounds_are_inclusive() {
    assert_eq!(filter_mode(0.45), FilterMode::Bypass);
    assert_eq!(filter_mode(0.5), FilterMode::Bypass);
    assert_eq!(filter_mode(0.55), FilterMode::Bypass);
    assert!(matches!(filter_mode(0.4499), FilterMode::LowPass(_)));
    assert!(matches!(filter_mode(0.5501), FilterMode::HighPass(_)));
  }

  #[test]
  fn cutoff_mapping_endpoints() {
    assert_eq!(filter_mode(0.0), FilterMode::LowPass(100.0));
    match filter_mode(1.0) {
      FilterMode::HighPass(fc) => assert!((fc - 8050.0).abs() < 1e-2, "hp top {fc}"),
      m => panic!("expected high-pass, got {m:?}"),
    }
    match filter_mode(0.2) {
      FilterMode::LowPass(fc) => assert!((fc - (100.0 + 0.2 / 0.45 * 10_000.0)).abs() < 1e-2),
      m => panic!("expected low-pass, got {m:?}"),
    }
  }

  #[test]
  fn dead_zone_passes_signal_untouched() {
    let mut f = DeadZoneFilter::new(48_000.0);
    for n in 0..100 {
      let x = (n as f32 * 0.37).sin();
      assert_eq!(f.process(x, -x, 0.5), (x, -x));
    }
  }

  #[test]
  fn low_pass_keeps_dc_high_pass_blocks_it() {
    let mut lp = DeadZoneFilter::new(48_000.0);
    let mut hp = DeadZoneFilter::new(48_000.0);
    let (mut yl, mut yh) = (0.0, 0.0);
    for _ in 0..20_000 {
      yl = lp.process(1.0, 1.0, 0.1).0;
      yh = hp.process(1.0, 1.0, 0.9).0;
    }
    assert!((yl - 1.0).abs() < 1e-3, "low-pass DC {yl}");
    assert!(yh.abs() < 1e-3, "high-pass DC {yh}");
  }

  #[test]
  fn output_finite_for_extreme_settings() {
    let mut f = DeadZoneFilter::new(8_000.0);
    for n in 0..5000 {
      let x = if n % 50 == 0 { 1.0 } else { 0.0 };
      let (a, b) = f.process(x, x, if n % 2 == 0 { 0.44 } else { 1.0 });
      assert!(a.is_finite() && b.is_finite());
    }
  }
}
