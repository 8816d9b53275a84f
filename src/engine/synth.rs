use rand::Rng;

use super::{controller::ParamController, graph::SynthGraph, messages::ControlTick};
use crate::config::EngineConfig;

/// Controller and graph in one struct, for callers that run control and
/// audio on the same thread (or alternate between them themselves).
pub struct Engine {
  controller: ParamController,
  graph: SynthGraph,
}

impl Engine {
  pub fn new(sample_rate: f32) -> Self {
    log::info!("engine init at {sample_rate} Hz");
    Self { controller: ParamController::new(), graph: SynthGraph::new(sample_rate) }
  }

  /// Build at the configured rate with the configured preset applied.
  pub fn from_config(config: &EngineConfig) -> Self {
    let mut engine = Self::new(config.sample_rate);
    config.apply_preset(&mut engine.controller);
    engine
  }

  pub fn sample_rate(&self) -> f32 { self.graph.sr }

  /// One stereo frame.
  pub fn process(&mut self) -> (f32, f32) {
    let p = self.controller.snapshot();
    self.graph.render_frame(&p)
  }

  pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
    let p = self.controller.snapshot();
    self.graph.render_block(&p, left, right);
  }

  pub fn update_controls(&mut self, selection_delta: i32, mute_trigger: bool, knob: f32) {
    self.controller.update_controls(selection_delta, mute_trigger, knob);
  }

  pub fn apply(&mut self, tick: ControlTick) { self.update_controls(tick.delta, tick.mute, tick.knob); }

  pub fn randomize(&mut self) { self.controller.randomize(); }
  pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) { self.controller.randomize_with(rng); }
  pub fn reset(&mut self) { self.controller.reset(); }

  pub fn is_muted(&self) -> bool { self.controller.is_muted() }
  pub fn current_param_index(&self) -> usize { self.controller.current_param_index() }
  pub fn param_name(&self, index: usize) -> &'static str { self.controller.param_name(index) }
  pub fn param_value(&self, index: usize) -> f32 { self.controller.param_value(index) }
  pub fn is_param_locked(&self) -> bool { self.controller.is_param_locked() }

  pub fn controller(&self) -> &ParamController { &self.controller }
}
