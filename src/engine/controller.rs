use log::{debug, trace};
use rand::Rng;

use super::params::{ParamId, ParamSnapshot, ParamStore, PARAMS, PARAM_COUNT};

/// Knob travel (normalized) needed to catch a freshly selected parameter.
pub const LOCK_THRESHOLD: f32 = 0.15;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LockState {
  Unlocked,
  /// Knob input is ignored until it moves away from `reference`.
  Locked { reference: f32 },
}

/// Selection, soft-takeover lock and mute on top of the parameter store.
///
/// Driven once per control tick; never touched by the audio path directly.
#[derive(Clone, Debug)]
pub struct ParamController {
  store: ParamStore,
  current: usize,
  lock: LockState,
  muted: bool,
}

impl Default for ParamController {
  fn default() -> Self { Self::new() }
}

impl ParamController {
  pub fn new() -> Self {
    Self { store: ParamStore::default(), current: 0, lock: LockState::Unlocked, muted: false }
  }

  /// Apply one control tick: mute edge, selection delta, then the knob.
  pub fn update_controls(&mut self, selection_delta: i32, mute_trigger: bool, knob: f32) {
    let knob = if knob.is_finite() { knob.clamp(0.0, 1.0) } else { 0.0 };

    if mute_trigger {
      self.muted = !self.muted;
      trace!("mute -> {}", self.muted);
    }

    if selection_delta != 0 {
      self.current = (self.current as i64 + selection_delta as i64).rem_euclid(PARAM_COUNT as i64) as usize;
      self.lock = LockState::Locked { reference: knob };
      trace!("selected {} ({}), locked at {knob:.3}", self.current, PARAMS[self.current].name);
      return;
    }

    match self.lock {
      LockState::Locked { reference } => {
        if (knob - reference).abs() > LOCK_THRESHOLD {
          self.lock = LockState::Unlocked;
          trace!("{} caught at {knob:.3}", PARAMS[self.current].name);
        }
      }
      LockState::Unlocked => {
        if let Some(id) = ParamId::from_index(self.current) {
          self.store.set_knob(id, knob);
        }
      }
    }
  }

  pub fn randomize(&mut self) { self.randomize_with(&mut rand::thread_rng()); }

  /// Every slot gets a uniform draw from its own randomize range.
  pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
    for id in ParamId::ALL {
      let (lo, hi) = id.desc().random;
      self.store.set(id, rng.gen_range(lo..=hi));
    }
    debug!("parameters randomized");
  }

  pub fn reset(&mut self) {
    *self = Self::new();
    debug!("parameters reset to defaults");
  }

  /// Direct write of a normalized value, outside the selection/lock flow.
  pub fn set_knob_value(&mut self, id: ParamId, knob: f32) {
    let knob = if knob.is_finite() { knob.clamp(0.0, 1.0) } else { 0.0 };
    self.store.set_knob(id, knob);
  }

  pub fn is_muted(&self) -> bool { self.muted }
  pub fn current_param_index(&self) -> usize { self.current }
  pub fn is_param_locked(&self) -> bool { matches!(self.lock, LockState::Locked { .. }) }
  pub fn lock_state(&self) -> LockState { self.lock }

  pub fn param_name(&self, index: usize) -> &'static str {
    ParamId::from_index(index).map_or("Unknown", |id| id.desc().name)
  }

  /// Normalized value for display; 0.0 for unknown indices.
  pub fn param_value(&self, index: usize) -> f32 {
    ParamId::from_index(index).map_or(0.0, |id| self.store.normalized(id))
  }

  pub fn synth_value(&self, id: ParamId) -> f32 { self.store.get(id) }

  pub fn snapshot(&self) -> ParamSnapshot { ParamSnapshot { params: self.store, muted: self.muted } }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::{rngs::StdRng, SeedableRng};

  #[test]
  fn selection_wraps_both_ways() {
    let mut c = ParamController::new();
    c.update_controls(-1, false, 0.0);
    assert_eq!(c.current_param_index(), 13);
    c.update_controls(1, false, 0.0);
    assert_eq!(c.current_param_index(), 0);
    c.update_controls(29, false, 0.0);
    assert_eq!(c.current_param_index(), 1);
    c.update_controls(-30, false, 0.0);
    assert_eq!(c.current_param_index(), 13);
  }

  #[test]
  fn selection_index_always_in_range() {
    for start in 0..PARAM_COUNT as i32 {
      for delta in [-1000, -15, -14, -13, -1, 1, 13, 14, 15, 1000, i32::MIN, i32::MAX] {
        let mut c = ParamController::new();
        if start > 0 { c.update_controls(start, false, 0.5); }
        c.update_controls(delta, false, 0.5);
        let want = (start as i64 + delta as i64).rem_euclid(14) as usize;
        assert_eq!(c.current_param_index(), want, "start {start} delta {delta}");
      }
    }
  }

  #[test]
  fn lock_holds_until_knob_moves_past_threshold() {
    let mut c = ParamController::new();
    c.update_controls(2, false, 0.5); // amplitude
    assert!(c.is_param_locked());
    let before = c.synth_value(ParamId::Amplitude);
    for knob in [0.5, 0.6, 0.4, 0.64, 0.36, 0.65] {
      c.update_controls(0, false, knob);
      assert!(c.is_param_locked(), "knob {knob} should not unlock");
      assert_eq!(c.synth_value(ParamId::Amplitude), before);
    }
    // unlocking tick does not write
    c.update_controls(0, false, 0.9);
    assert!(!c.is_param_locked());
    assert_eq!(c.synth_value(ParamId::Amplitude), before);
    // following tick applies directly
    c.update_controls(0, false, 0.8);
    assert_eq!(c.synth_value(ParamId::Amplitude), 0.8);
  }

  #[test]
  fn unlocked_knob_overwrites_every_tick() {
    let mut c = ParamController::new();
    c.update_controls(0, false, 0.0);
    assert!((c.synth_value(ParamId::Frequency) - 55.0).abs() < 1e-3);
    c.update_controls(0, false, 1.0);
    assert!((c.synth_value(ParamId::Frequency) - 5995.0).abs() < 0.05);
  }

  #[test]
  fn mute_toggles_independently_of_lock() {
    let mut c = ParamController::new();
    c.update_controls(1, true, 0.3);
    assert!(c.is_muted() && c.is_param_locked());
    c.update_controls(0, true, 0.3);
    assert!(!c.is_muted() && c.is_param_locked());
  }

  #[test]
  fn randomize_respects_ranges() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut c = ParamController::new();
    for _ in 0..500 {
      c.randomize_with(&mut rng);
      for id in ParamId::ALL {
        let (lo, hi) = id.desc().random;
        let v = c.synth_value(id);
        assert!(v >= lo && v <= hi, "{id:?} = {v} outside [{lo}, {hi}]");
      }
      let amp = c.synth_value(ParamId::Amplitude);
      assert!((0.3..=0.7).contains(&amp));
    }
  }

  #[test]
  fn reset_restores_defaults_and_clears_flags() {
    let mut c = ParamController::new();
    c.randomize();
    c.update_controls(3, true, 0.2);
    c.reset();
    assert!(!c.is_muted() && !c.is_param_locked());
    assert_eq!(c.current_param_index(), 0);
    assert_eq!(c.snapshot(), ParamSnapshot::default());
  }

  #[test]
  fn introspection_sentinels() {
    let c = ParamController::new();
    assert_eq!(c.param_name(0), "Freq");
    assert_eq!(c.param_name(14), "Unknown");
    assert_eq!(c.param_value(99), 0.0);
    assert!((c.param_value(0) - (440.0f32 / 55.0).log10() / 109.0f32.log10()).abs() < 1e-5);
  }

  #[test]
  fn knob_input_is_clamped() {
    let mut c = ParamController::new();
    c.update_controls(0, false, 4.0);
    assert!((c.param_value(0) - 1.0).abs() < 1e-4);
    c.update_controls(0, false, f32::NAN);
    assert!(c.param_value(0).abs() < 1e-4);
  }
}
