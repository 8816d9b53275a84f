use std::f32::consts::TAU;

/// Fixed cutoff of the always-on damping stage.
pub const DAMPING_HZ: f32 = 7000.0;

#[derive(Clone, Debug, PartialEq)]
pub struct OnePoleLP { a: f32, y: f32 }

impl OnePoleLP {
  pub fn new() -> Self { Self { a: 1.0, y: 0.0 } }
  #[inline] pub fn set_cutoff(&mut self, hz: f32, sr: f32) { self.a = one_pole_coeff(hz, sr); }
  #[inline] pub fn coeff(&self) -> f32 { self.a }
  #[inline] pub fn tick(&mut self, x: f32) -> f32 { self.y += self.a * (x - self.y); self.y }
}

#[inline]
pub fn one_pole_coeff(hz: f32, sr: f32) -> f32 { 1.0 - (-TAU * hz / sr).exp() }

/// Stereo one-pole low-pass at [`DAMPING_HZ`], taming the top end before the reverb.
#[derive(Clone, Debug, PartialEq)]
pub struct Damping { l: OnePoleLP, r: OnePoleLP }

impl Damping {
  pub fn new(sr: f32) -> Self {
    let mut l = OnePoleLP::new(); l.set_cutoff(DAMPING_HZ, sr);
    let mut r = OnePoleLP::new(); r.set_cutoff(DAMPING_HZ, sr);
    Self { l, r }
  }
  #[inline]
  pub fn process(&mut self, l: f32, r: f32) -> (f32, f32) { (self.l.tick(l), self.r.tick(r)) }
  pub fn coeff(&self) -> f32 { self.l.coeff() }
}
