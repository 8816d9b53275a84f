use super::controller::ParamController;
use super::dsp::waveform::morph_sample;
use super::params::ParamId;

/// Knob travel that counts as user activity.
const KNOB_ACTIVITY: f32 = 0.01;
/// After this long without input the footer falls back to the idle tip.
pub const IDLE_MS: u64 = 5000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UiAction {
  #[default]
  None,
  Selection,
  Knob,
  Mute,
}

/// Remembers the most recent user action and when it happened.
#[derive(Clone, Debug, Default)]
pub struct ActivityTracker {
  action: UiAction,
  at_ms: u64,
  last_knob: f32,
}

impl ActivityTracker {
  pub fn new(now_ms: u64) -> Self { Self { at_ms: now_ms, ..Self::default() } }

  /// Classify one control tick. Returns the action it registered, if any.
  pub fn observe(&mut self, selection_delta: i32, mute_trigger: bool, knob: f32, now_ms: u64) -> Option<UiAction> {
    let action = if mute_trigger {
      UiAction::Mute
    } else if selection_delta != 0 {
      UiAction::Selection
    } else if (knob - self.last_knob).abs() > KNOB_ACTIVITY {
      self.last_knob = knob;
      UiAction::Knob
    } else {
      return None;
    };
    self.action = action;
    self.at_ms = now_ms;
    Some(action)
  }

  pub fn last_action(&self) -> UiAction { self.action }

  pub fn idle_ms(&self, now_ms: u64) -> u64 { now_ms.saturating_sub(self.at_ms) }
}

/// Footer hint for the display.
pub fn status_tip(muted: bool, locked: bool, action: UiAction, idle_ms: u64) -> &'static str {
  if muted { return "Press btn to unmute"; }
  if idle_ms > IDLE_MS { return "Touch me pls"; }
  match action {
    UiAction::None => "Touch me pls",
    UiAction::Selection => "Select Param",
    UiAction::Knob if locked => "Unlock -> Wiggle",
    UiAction::Knob => "Changing Value",
    UiAction::Mute => "Mute Toggled",
  }
}

/// One display-width cycle sketch of the current timbre, values in [-1, 1].
/// Higher `freq01` packs more periods into the width.
pub fn waveform_preview(points: usize, freq01: f32, wave01: f32, amp01: f32) -> Vec<f32> {
  if amp01 <= 0.001 { return vec![0.0; points]; }
  let morph = wave01.clamp(0.0, 1.0) * 3.0;
  let density = 1.0 + freq01.clamp(0.0, 1.0) * 3.5;
  let amp = amp01.min(1.0);
  (0..points)
    .map(|i| {
      let phase = (i as f32 / points as f32 * density).fract();
      morph_sample(phase, morph) * amp
    })
    .collect()
}

/// Preview for the controller's current state; flat while muted.
pub fn preview_for(controller: &ParamController, points: usize) -> Vec<f32> {
  let amp = if controller.is_muted() { 0.0 } else { controller.param_value(ParamId::Amplitude.index()) };
  waveform_preview(
    points,
    controller.param_value(ParamId::Frequency.index()),
    controller.param_value(ParamId::Waveform.index()),
    amp,
  )
}
