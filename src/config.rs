use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::engine::controller::ParamController;
use crate::engine::messages::TimedTick;
use crate::engine::params::ParamId;
use crate::error::{EngineError, Result};

/// Startup configuration. Every field has a default, so `{}` is a valid file.
///
/// ```json
/// {
///   "sample_rate": 48000,
///   "preset": { "frequency": 0.4, "reverb_amount": 0.5 },
///   "ticks": [ { "at_ms": 500, "mute": true } ]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  pub sample_rate: f32,
  /// Capacity of the control -> audio snapshot channel.
  pub channel_capacity: usize,
  /// Frames rendered per audio callback in offline renders.
  pub block_size: usize,
  /// Parameter key -> normalized knob value, applied after reset.
  pub preset: BTreeMap<String, f32>,
  /// Scripted control ticks for offline renders.
  pub ticks: Vec<TimedTick>,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self { sample_rate: 48_000.0, channel_capacity: 64, block_size: 4, preset: BTreeMap::new(), ticks: Vec::new() }
  }
}

impl EngineConfig {
  pub fn from_json_str(s: &str) -> Result<Self> {
    let cfg: Self = serde_json::from_str(s)?;
    cfg.validate()?;
    Ok(cfg)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let text = fs::read_to_string(path.as_ref())?;
    log::info!("loading config from {}", path.as_ref().display());
    Self::from_json_str(&text)
  }

  pub fn validate(&self) -> Result<()> {
    if !(8_000.0..=192_000.0).contains(&self.sample_rate) {
      return Err(EngineError::InvalidConfig(format!("sample_rate {} outside 8000..=192000", self.sample_rate)));
    }
    if self.channel_capacity == 0 {
      return Err(EngineError::InvalidConfig("channel_capacity must be at least 1".into()));
    }
    if self.block_size == 0 {
      return Err(EngineError::InvalidConfig("block_size must be at least 1".into()));
    }
    for (key, v) in &self.preset {
      if ParamId::from_key(key).is_none() {
        return Err(EngineError::InvalidConfig(format!("unknown parameter '{key}'")));
      }
      if !v.is_finite() {
        return Err(EngineError::InvalidConfig(format!("parameter '{key}' is not a finite number")));
      }
    }
    for t in &self.ticks {
      if !t.tick.knob.is_finite() {
        return Err(EngineError::InvalidConfig(format!("tick at {} ms has a non-finite knob value", t.at_ms)));
      }
    }
    Ok(())
  }

  /// Reset the controller and write the preset values into it.
  pub fn apply_preset(&self, controller: &mut ParamController) {
    controller.reset();
    for (key, &v) in &self.preset {
      if let Some(id) = ParamId::from_key(key) {
        controller.set_knob_value(id, v);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_object_gives_defaults() {
    let cfg = EngineConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, EngineConfig::default());
  }

  #[test]
  fn preset_and_ticks_parse() {
    let cfg = EngineConfig::from_json_str(r#"{
      "sample_rate": 44100,
      "preset": { "amplitude": 0.25, "frequency": 0.0 },
      "ticks": [ { "at_ms": 10, "delta": 1 }, { "at_ms": 20, "mute": true } ]
    }"#).unwrap();
    assert_eq!(cfg.sample_rate, 44_100.0);
    assert_eq!(cfg.ticks.len(), 2);
    assert!(cfg.ticks[1].tick.mute);

    let mut c = ParamController::new();
    cfg.apply_preset(&mut c);
    assert_eq!(c.synth_value(ParamId::Amplitude), 0.25);
    assert!((c.synth_value(ParamId::Frequency) - 55.0).abs() < 1e-3);
  }

  #[test]
  fn rejects_bad_values() {
    assert!(matches!(EngineConfig::from_json_str(r#"{ "sample_rate": 10 }"#), Err(EngineError::InvalidConfig(_))));
    assert!(matches!(EngineConfig::from_json_str(r#"{ "channel_capacity": 0 }"#), Err(EngineError::InvalidConfig(_))));
    assert!(matches!(EngineConfig::from_json_str(r#"{ "preset": { "volume": 1.0 } }"#), Err(EngineError::InvalidConfig(_))));
    assert!(matches!(EngineConfig::from_json_str("not json"), Err(EngineError::Config(_))));
  }
}
