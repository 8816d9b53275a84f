//! Modulated comb/all-pass reverberator.
//!
//! Eight damped feedback combs run in parallel per channel and four all-passes
//! in series diffuse their sum. A shared slow sine wobbles the comb lengths in
//! opposite directions on alternate lines and on the two channels.

use super::delay::DelayLine;
use super::lfo::{Lfo, LfoShape};

pub const COMB_TUNING: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
pub const ALLPASS_TUNING: [usize; 4] = [225, 341, 441, 556];
pub const STEREO_SPREAD: usize = 23;

pub const COMB_CAPACITY: usize = 1750;
pub const ALLPASS_CAPACITY: usize = 600;
pub const COMB_MIN_LEN: i32 = 10;
pub const COMB_MAX_LEN: i32 = 1740;

/// Below this the reverb is skipped and none of its state moves.
pub const REVERB_BYPASS: f32 = 0.01;
const MOD_RATE_HZ: f32 = 0.3;
const MOD_DEPTH: f32 = 15.0;
const ALLPASS_GAIN: f32 = 0.5;
const WET_GAIN: f32 = 0.015;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReverbParams {
  pub amount: f32,
  pub length: f32,
  pub tone: f32,
}

#[derive(Clone, Debug, PartialEq)]
struct Comb {
  line: DelayLine,
  damp_state: f32,
}

impl Comb {
  fn new(len: usize) -> Self { Self { line: DelayLine::new(COMB_CAPACITY, len), damp_state: 0.0 } }

  #[inline]
  fn process(&mut self, x: f32, feedback: f32, damping: f32) -> f32 {
    let out = self.line.read();
    self.damp_state = out * (1.0 - damping) + self.damp_state * damping;
    self.line.write(x + self.damp_state * feedback);
    out
  }
}

#[derive(Clone, Debug, PartialEq)]
struct Allpass {
  line: DelayLine,
}

impl Allpass {
  fn new(tuning: usize) -> Self { Self { line: DelayLine::new(ALLPASS_CAPACITY, tuning) } }

  #[inline]
  fn process(&mut self, x: f32) -> f32 {
    let read = self.line.read();
    let write = x + read * ALLPASS_GAIN;
    self.line.write(write);
    read - write * ALLPASS_GAIN
  }
}

#[derive(Clone, Debug, PartialEq)]
struct Channel {
  combs: [Comb; 8],
  allpasses: [Allpass; 4],
}

impl Channel {
  fn new(spread: usize) -> Self {
    Self {
      combs: COMB_TUNING.map(|t| Comb::new(t + spread)),
      allpasses: ALLPASS_TUNING.map(|t| Allpass::new(t + spread)),
    }
  }

  /// `sign` flips the modulation direction for this channel.
  #[inline]
  fn process(&mut self, x: f32, spread: i32, sign: i32, mod_offset: i32, feedback: f32, damping: f32) -> f32 {
    let mut wet = 0.0;
    for (i, comb) in self.combs.iter_mut().enumerate() {
      let dir = if i % 2 == 0 { sign } else { -sign };
      let len = comb_len(i, spread, dir * mod_offset);
      comb.line.set_len(len);
      wet += comb.process(x, feedback, damping);
    }
    for ap in self.allpasses.iter_mut() {
      wet = ap.process(wet);
    }
    wet
  }
}

#[inline]
fn comb_len(i: usize, spread: i32, offset: i32) -> usize {
  (COMB_TUNING[i] as i32 + spread + offset).clamp(COMB_MIN_LEN, COMB_MAX_LEN) as usize
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reverb {
  sr: f32,
  lfo: Lfo,
  l: Channel,
  r: Channel,
}

impl Reverb {
  pub fn new(sr: f32) -> Self {
    Self { sr, lfo: Lfo::new(LfoShape::Sine), l: Channel::new(0), r: Channel::new(STEREO_SPREAD) }
  }

  /// Comb feedback and damping for the given length/tone parameters.
  pub fn coefficients(length: f32, tone: f32) -> (f32, f32) {
    (0.7 + 0.28 * length.clamp(0.0, 1.0), (1.0 - tone.clamp(0.0, 1.0)) * 0.4)
  }

  #[inline]
  pub fn process(&mut self, l: f32, r: f32, p: &ReverbParams) -> (f32, f32) {
    if p.amount < REVERB_BYPASS { return (l, r); }
    let amount = p.amount.min(1.0);
    let (feedback, damping) = Self::coefficients(p.length, p.tone);
    let m = self.lfo.next(MOD_RATE_HZ, self.sr);
    let mod_offset = (m * MOD_DEPTH * amount).floor() as i32;

    let wet_l = self.l.process(l, 0, 1, mod_offset, feedback, damping);
    let wet_r = self.r.process(r, STEREO_SPREAD as i32, -1, mod_offset, feedback, damping);

    let dry = 1.0 - amount * 0.5;
    let wet = amount * WET_GAIN;
    (l * dry + wet_l * wet, r * dry + wet_r * wet)
  }

  #[cfg(test)]
  fn comb_lens(&self) -> impl Iterator<Item = usize> + '_ {
    self.l.combs.iter().chain(self.r.combs.iter()).map(|c| c.line.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params(amount: f32) -> ReverbParams { ReverbParams { amount, length: 0.5, tone: 0.5 } }

  #[test]
  fn bypass_is_idempotent_and_stateless() {
    let mut rv = Reverb::new(48_000.0);
    // put some energy in the lines first
    for n in 0..3000 { rv.process(if n == 0 { 1.0 } else { 0.0 }, 0.0, &params(0.5)); }
    let before = rv.clone();
    let a = rv.process(0.3, -0.2, &params(0.005));
    let b = rv.process(0.3, -0.2, &params(0.005));
    assert_eq!(a, (0.3, -0.2));
    assert_eq!((a.0.to_bits(), a.1.to_bits()), (b.0.to_bits(), b.1.to_bits()));
    assert_eq!(rv, before, "bypassed reverb must not touch its delay lines");
  }

  #[test]
  fn impulse_leaves_a_tail() {
    let mut rv = Reverb::new(48_000.0);
    let p = ReverbParams { amount: 1.0, length: 0.8, tone: 0.5 };
    rv.process(1.0, 1.0, &p);
    let mut found = false;
    for _ in 0..8000 {
      let (l, r) = rv.process(0.0, 0.0, &p);
      if l.abs() > 1e-4 || r.abs() > 1e-4 { found = true; break; }
    }
    assert!(found, "reverb should ring after an impulse");
  }

  #[test]
  fn tail_decays() {
    let mut rv = Reverb::new(48_000.0);
    let p = ReverbParams { amount: 0.6, length: 0.0, tone: 1.0 };
    rv.process(1.0, 1.0, &p);
    let mut late = 0.0f32;
    for n in 0..96_000 {
      let (l, r) = rv.process(0.0, 0.0, &p);
      if n > 90_000 { late = late.max(l.abs().max(r.abs())); }
    }
    assert!(late < 1e-3, "tail should die out, late peak {late}");
  }

  #[test]
  fn comb_lengths_stay_clamped_under_modulation() {
    let mut rv = Reverb::new(8_000.0);
    for _ in 0..20_000 {
      rv.process(0.1, 0.1, &params(1.0));
      for len in rv.comb_lens() {
        assert!((COMB_MIN_LEN as usize..=COMB_MAX_LEN as usize).contains(&len), "comb len {len}");
      }
    }
  }

  #[test]
  fn comb_modulation_is_mirrored_across_lines_and_sides() {
    let mut rv = Reverb::new(48_000.0);
    let mut off = 0i32;
    for _ in 0..48_000 {
      rv.process(0.0, 0.0, &params(1.0));
      off = rv.l.combs[0].line.len() as i32 - 1116;
      if off != 0 { break; }
    }
    assert!(off != 0, "modulation never moved the combs");
    let len = |c: &Comb| c.line.len() as i32;
    assert_eq!(len(&rv.l.combs[0]), 1116 + off);
    assert_eq!(len(&rv.l.combs[1]), 1188 - off);
    assert_eq!(len(&rv.r.combs[0]), 1139 - off);
    assert_eq!(len(&rv.r.combs[1]), 1211 + off);
    for i in 0..COMB_TUNING.len() {
      let dir = if i % 2 == 0 { 1 } else { -1 };
      assert_eq!(len(&rv.l.combs[i]), COMB_TUNING[i] as i32 + dir * off, "left comb {i}");
      assert_eq!(len(&rv.r.combs[i]), COMB_TUNING[i] as i32 + 23 - dir * off, "right comb {i}");
    }
    for (i, t) in ALLPASS_TUNING.iter().enumerate() {
      assert_eq!(rv.l.allpasses[i].line.len(), *t);
      assert_eq!(rv.r.allpasses[i].line.len(), t + STEREO_SPREAD);
    }
  }

  #[test]
  fn comb_len_clamps_both_ends() {
    assert_eq!(comb_len(0, 0, -5000), COMB_MIN_LEN as usize);
    assert_eq!(comb_len(7, 23, 5000), COMB_MAX_LEN as usize);
    assert_eq!(comb_len(2, 23, -4), 1277 + 23 - 4);
  }

  #[test]
  fn coefficients_follow_length_and_tone() {
    let (fb, damp) = Reverb::coefficients(1.0, 0.0);
    assert!((fb - 0.98).abs() < 1e-6);
    assert!((damp - 0.4).abs() < 1e-6);
    assert_eq!(Reverb::coefficients(0.0, 1.0), (0.7, 0.0));
  }

  #[test]
  fn dry_mix_law() {
    // fresh lines read zero, so the first frame is the dry path only
    let mut rv = Reverb::new(48_000.0);
    let (l, _) = rv.process(1.0, 0.0, &params(0.6));
    assert!((l - 0.7).abs() < 1e-6, "dry gain should be 1 - 0.6 * 0.5, got {l}");
  }
}
