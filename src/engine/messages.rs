use serde::Deserialize;

use super::params::ParamSnapshot;

/// Control -> audio messages. Snapshots are whole, so the newest one wins.
#[derive(Clone, Debug)]
pub enum EngineMsg {
  Snapshot(ParamSnapshot),
  /// Final: the audio side renders silence from then on.
  Quit,
}

/// One control tick as delivered by the input collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlTick {
  /// Encoder detents since the previous tick.
  pub delta: i32,
  /// Rising edge of the mute button.
  pub mute: bool,
  /// Normalized pot position.
  pub knob: f32,
}

/// A control tick scheduled at a point in time, for scripted renders.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct TimedTick {
  pub at_ms: u64,
  #[serde(flatten)]
  pub tick: ControlTick,
}
