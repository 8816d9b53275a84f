#[cfg(feature = "host")]
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use log::debug;

use super::{controller::ParamController, graph::SynthGraph, messages::{ControlTick, EngineMsg}, params::{ParamId, ParamSnapshot}};
use crate::config::EngineConfig;
#[cfg(feature = "host")]
use crate::error::{EngineError, Result};

/// Build the control/audio pair joined by a bounded snapshot channel.
/// The audio side starts with the controller's initial snapshot (preset applied).
pub fn channel(config: &EngineConfig) -> (ControlSurface, AudioEngine) {
  let capacity = config.channel_capacity.max(1);
  let (tx, rx) = bounded(capacity);
  let mut controller = ParamController::new();
  config.apply_preset(&mut controller);
  let snapshot = controller.snapshot();
  let surface = ControlSurface { tx, evict: rx.clone(), controller, superseded: 0, quit: false };
  let engine = AudioEngine::new(rx, capacity, config.sample_rate, snapshot);
  (surface, engine)
}

/// Control-side half: owns the parameter controller and publishes a full
/// snapshot after every change. Never blocks; when the queue is full the
/// oldest queued snapshot makes room for the new one.
pub struct ControlSurface {
  tx: Sender<EngineMsg>,
  evict: Receiver<EngineMsg>,
  controller: ParamController,
  superseded: u64,
  quit: bool,
}

impl ControlSurface {
  pub fn update_controls(&mut self, selection_delta: i32, mute_trigger: bool, knob: f32) {
    self.controller.update_controls(selection_delta, mute_trigger, knob);
    self.publish();
  }

  pub fn apply(&mut self, tick: ControlTick) { self.update_controls(tick.delta, tick.mute, tick.knob); }

  pub fn randomize(&mut self) {
    self.controller.randomize();
    self.publish();
  }

  pub fn reset(&mut self) {
    self.controller.reset();
    self.publish();
  }

  pub fn set_knob_value(&mut self, id: ParamId, knob: f32) {
    self.controller.set_knob_value(id, knob);
    self.publish();
  }

  /// Ask the audio side to shut down. Nothing is published afterwards.
  pub fn quit(&mut self) -> bool {
    if self.quit { return false; }
    self.quit = true;
    self.send(EngineMsg::Quit)
  }

  /// Push the current snapshot. Returns false only after `quit` or when the
  /// audio side is gone.
  pub fn publish(&mut self) -> bool {
    if self.quit { return false; }
    let snap = self.controller.snapshot();
    self.send(EngineMsg::Snapshot(snap))
  }

  fn send(&mut self, mut msg: EngineMsg) -> bool {
    loop {
      match self.tx.try_send(msg) {
        Ok(()) => return true,
        Err(TrySendError::Full(m)) => {
          // only snapshots are queued before a quit, so the evicted one is stale state
          if self.evict.try_recv().is_ok() {
            self.superseded += 1;
            debug!("engine channel full, replaced oldest snapshot ({} total)", self.superseded);
          }
          msg = m;
        }
        Err(TrySendError::Disconnected(_)) => {
          debug!("engine channel disconnected");
          return false;
        }
      }
    }
  }

  pub fn controller(&self) -> &ParamController { &self.controller }
  /// Queued snapshots discarded to make room for newer ones.
  pub fn superseded(&self) -> u64 { self.superseded }
}

/// State that lives on the audio thread.
struct RenderState {
  rx: Receiver<EngineMsg>,
  drain_limit: usize,
  graph: SynthGraph,
  snapshot: ParamSnapshot,
  quit: bool,
}

impl RenderState {
  /// Take everything queued, keeping the newest snapshot. One pass reads at
  /// most a full queue; later arrivals wait for the next block.
  fn drain(&mut self) {
    for _ in 0..self.drain_limit {
      match self.rx.try_recv() {
        Ok(EngineMsg::Snapshot(s)) => self.snapshot = s,
        Ok(EngineMsg::Quit) => self.quit = true,
        Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
      }
    }
  }

  fn render_block(&mut self, left: &mut [f32], right: &mut [f32]) {
    self.drain();
    if self.quit {
      left.fill(0.0);
      right.fill(0.0);
    } else {
      self.graph.render_block(&self.snapshot, left, right);
    }
  }

  /// Mono devices get the average of both sides; channels past the second stay silent.
  fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
    self.drain();
    for frame in data.chunks_mut(channels.max(1)) {
      let (l, r) = if self.quit { (0.0, 0.0) } else { self.graph.render_frame(&self.snapshot) };
      match frame {
        [mono] => *mono = 0.5 * (l + r),
        [fl, fr, rest @ ..] => {
          *fl = l;
          *fr = r;
          rest.fill(0.0);
        }
        [] => {}
      }
    }
  }
}

/// Audio-side half. Renders offline through `render_block`, or hands its
/// state to a device stream with `start` (feature `host`).
pub struct AudioEngine {
  pub sr: f32,
  state: Option<RenderState>,
  #[cfg(feature = "host")]
  stream: Option<cpal::Stream>,
}

impl AudioEngine {
  fn new(rx: Receiver<EngineMsg>, drain_limit: usize, sr: f32, snapshot: ParamSnapshot) -> Self {
    Self {
      sr,
      state: Some(RenderState { rx, drain_limit, graph: SynthGraph::new(sr), snapshot, quit: false }),
      #[cfg(feature = "host")]
      stream: None,
    }
  }

  /// Apply pending messages, then render one block. Outputs silence after
  /// `Quit` or once the state has moved to a device stream.
  pub fn render_block(&mut self, left: &mut [f32], right: &mut [f32]) {
    match self.state.as_mut() {
      Some(st) => st.render_block(left, right),
      None => {
        left.fill(0.0);
        right.fill(0.0);
      }
    }
  }

  /// Same as `render_block` for an interleaved buffer of `channels` channels.
  pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
    match self.state.as_mut() {
      Some(st) => st.render_interleaved(data, channels),
      None => data.fill(0.0),
    }
  }

  /// Snapshot currently used for rendering, if rendering happens on this thread.
  pub fn snapshot(&self) -> Option<&ParamSnapshot> { self.state.as_ref().map(|s| &s.snapshot) }

  pub fn has_quit(&self) -> bool { self.state.as_ref().is_some_and(|s| s.quit) }

  #[cfg(feature = "host")]
  pub fn start(&mut self) -> Result<()> {
    if self.stream.is_some() { return Ok(()); }
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(EngineError::NoOutputDevice)?;
    let config = match pick_output_config(&device) {
      Some(cfg) => cfg,
      None => device.default_output_config().map_err(|e| EngineError::Stream(e.to_string()))?,
    };
    if config.sample_format() != cpal::SampleFormat::F32 {
      return Err(EngineError::Stream(format!("unsupported sample format {:?}", config.sample_format())));
    }
    let mut cfg: cpal::StreamConfig = config.into();
    // Request a larger buffer for better stability; reduce underruns
    cfg.buffer_size = cpal::BufferSize::Fixed(1024);
    let device_sr = cfg.sample_rate.0 as f32;
    let channels = cfg.channels as usize;

    // Move engine state into the audio thread. Keep None in self.
    let mut state = self.state.take().ok_or_else(|| EngineError::Stream("engine state already moved".into()))?;
    if (device_sr - self.sr).abs() > f32::EPSILON {
      log::info!("device runs at {device_sr} Hz, rebuilding graph (was {} Hz)", self.sr);
      state.graph = SynthGraph::new(device_sr);
      self.sr = device_sr;
    }

    let err_fn = |e: cpal::StreamError| log::error!("stream error: {e}");
    let stream = device
      .build_output_stream(&cfg, move |data: &mut [f32], _: &cpal::OutputCallbackInfo| state.render_interleaved(data, channels), err_fn, None)
      .map_err(|e| EngineError::Stream(e.to_string()))?;
    stream.play().map_err(|e| EngineError::Stream(e.to_string()))?;
    log::info!("audio stream started: {} Hz, {} channels", cfg.sample_rate.0, cfg.channels);
    self.stream = Some(stream);
    Ok(())
  }

  #[cfg(feature = "host")]
  pub fn stop(&mut self) {
    if self.stream.take().is_some() { log::info!("audio stream stopped"); }
  }
}

/// Stereo f32 output, preferring 44.1 kHz, then 48 kHz, then the highest rate offered.
#[cfg(feature = "host")]
fn pick_output_config(device: &cpal::Device) -> Option<cpal::SupportedStreamConfig> {
  let stereo_f32 = |r: &cpal::SupportedStreamConfigRange| r.channels() == 2 && r.sample_format() == cpal::SampleFormat::F32;
  for sr in [44_100u32, 48_000] {
    let found = device.supported_output_configs().ok()?
      .filter(stereo_f32)
      .find(|r| r.min_sample_rate().0 <= sr && r.max_sample_rate().0 >= sr);
    if let Some(range) = found { return Some(range.with_sample_rate(cpal::SampleRate(sr))); }
  }
  device.supported_output_configs().ok()?.find(stereo_f32).map(|r| r.with_max_sample_rate())
}
