/// Below this the drive stage is skipped entirely.
pub const DRIVE_BYPASS: f32 = 0.01;

#[inline]
fn soft_limit(x: f32) -> f32 { x * (27.0 + x * x) / (27.0 + 9.0 * x * x) }

/// Cubic-rational clipper, hard at +-1 outside +-3.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
  if x < -3.0 { -1.0 } else if x > 3.0 { 1.0 } else { soft_limit(x) }
}

/// Overdrive with gain staging that keeps perceived level roughly constant
/// as the drive coefficient rises.
#[derive(Clone, Debug, PartialEq)]
pub struct Drive {
  coeff: f32,
  pre_gain: f32,
  post_gain: f32,
}

impl Default for Drive {
  fn default() -> Self { Self::new() }
}

impl Drive {
  pub fn new() -> Self {
    let mut d = Self { coeff: -1.0, pre_gain: 1.0, post_gain: 1.0 };
    d.set_coeff(0.1);
    d
  }

  fn set_coeff(&mut self, k: f32) {
    let k = k.clamp(0.0, 1.0);
    if k == self.coeff { return; }
    self.coeff = k;
    let d = 2.0 * k;
    let d2 = d * d;
    let pre_a = d * 0.5;
    let pre_b = d2 * d2 * d * 24.0;
    self.pre_gain = pre_a + (pre_b - pre_a) * d2;
    let squashed = d * (2.0 - d);
    self.post_gain = 1.0 / soft_clip(0.33 + squashed * (self.pre_gain - 0.33));
  }

  #[inline]
  fn shape(&self, x: f32) -> f32 { soft_clip(self.pre_gain * x) * self.post_gain }

  /// `amount` is the distortion parameter in [0, 1]; drive coefficient and
  /// wet/dry crossfade both follow it.
  #[inline]
  pub fn process(&mut self, l: f32, r: f32, amount: f32) -> (f32, f32) {
    if amount < DRIVE_BYPASS { return (l, r); }
    let amount = amount.min(1.0);
    self.set_coeff(0.1 + 0.8 * amount);
    let dry = 1.0 - amount;
    (l * dry + self.shape(l) * amount, r * dry + self.shape(r) * amount)
  }
}
