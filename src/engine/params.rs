//! The fourteen synth parameters and their mappings.
//!
//! Every slot is described by one row of [`PARAMS`]: display name, config key,
//! knob -> synthesis mapping and its inverse, randomize range and default.

pub const PARAM_COUNT: usize = 14;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ParamId {
  Frequency,
  Waveform,
  Amplitude,
  Filter,
  Distortion,
  Phaser,
  Detune,
  ReverbAmount,
  ReverbLength,
  ReverbTone,
  WobbleAmount,
  WobbleSpeed,
  SweepAmount,
  SweepRate,
}

impl ParamId {
  pub const ALL: [ParamId; PARAM_COUNT] = [
    ParamId::Frequency, ParamId::Waveform, ParamId::Amplitude, ParamId::Filter,
    ParamId::Distortion, ParamId::Phaser, ParamId::Detune, ParamId::ReverbAmount,
    ParamId::ReverbLength, ParamId::ReverbTone, ParamId::WobbleAmount, ParamId::WobbleSpeed,
    ParamId::SweepAmount, ParamId::SweepRate,
  ];

  pub fn from_index(i: usize) -> Option<ParamId> { Self::ALL.get(i).copied() }

  pub fn from_key(key: &str) -> Option<ParamId> {
    Self::ALL.iter().copied().find(|id| id.desc().key == key)
  }

  #[inline]
  pub fn index(self) -> usize { self as usize }

  #[inline]
  pub fn desc(self) -> &'static ParamDesc { &PARAMS[self.index()] }
}

pub struct ParamDesc {
  pub name: &'static str,
  pub key: &'static str,
  pub forward: fn(f32) -> f32,
  pub inverse: fn(f32) -> f32,
  /// Randomize range in synthesis units.
  pub random: (f32, f32),
  pub default: f32,
}

const FREQ_BASE: f32 = 55.0;
const FREQ_SPAN: f32 = 109.0;

/// 55 Hz .. 5995 Hz, exponential.
fn freq_forward(k: f32) -> f32 { FREQ_BASE * FREQ_SPAN.powf(k) }
fn freq_inverse(f: f32) -> f32 { (f.max(f32::MIN_POSITIVE) / FREQ_BASE).log10() / FREQ_SPAN.log10() }
fn identity(v: f32) -> f32 { v }

macro_rules! linear {
  ($name:expr, $key:expr, ($lo:expr, $hi:expr), $default:expr) => {
    ParamDesc { name: $name, key: $key, forward: identity, inverse: identity, random: ($lo, $hi), default: $default }
  };
}

pub static PARAMS: [ParamDesc; PARAM_COUNT] = [
  ParamDesc { name: "Freq", key: "frequency", forward: freq_forward, inverse: freq_inverse, random: (55.0, 3000.0), default: 440.0 },
  linear!("Wave", "waveform", (0.0, 1.0), 0.0),
  linear!("Amp", "amplitude", (0.3, 0.7), 0.5),
  linear!("Filter", "filter", (0.0, 1.0), 0.5),
  linear!("Drive", "distortion", (0.0, 0.4), 0.0),
  linear!("Phaser", "phaser", (0.0, 0.5), 0.0),
  linear!("Detune", "detune", (0.0, 0.3), 0.0),
  linear!("Rev Amt", "reverb_amount", (0.0, 0.6), 0.0),
  linear!("Rev Len", "reverb_length", (0.0, 1.0), 0.5),
  linear!("Rev Tone", "reverb_tone", (0.0, 1.0), 0.5),
  linear!("Wob Amt", "wobble_amount", (0.0, 0.3), 0.0),
  linear!("Wob Spd", "wobble_speed", (0.0, 1.0), 0.2),
  linear!("Swp Amt", "sweep_amount", (0.0, 0.5), 0.0),
  linear!("Swp Rate", "sweep_rate", (0.0, 0.4), 0.1),
];

/// Synthesis-range values of all slots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamStore {
  values: [f32; PARAM_COUNT],
}

impl Default for ParamStore {
  fn default() -> Self {
    let mut values = [0.0; PARAM_COUNT];
    for (v, d) in values.iter_mut().zip(PARAMS.iter()) { *v = d.default; }
    Self { values }
  }
}

impl ParamStore {
  #[inline]
  pub fn get(&self, id: ParamId) -> f32 { self.values[id.index()] }

  #[inline]
  pub fn set(&mut self, id: ParamId, v: f32) { self.values[id.index()] = v; }

  /// Write the forward mapping of a normalized knob value.
  pub fn set_knob(&mut self, id: ParamId, knob: f32) { self.set(id, (id.desc().forward)(knob)); }

  /// Normalized (display) value via the inverse mapping.
  pub fn normalized(&self, id: ParamId) -> f32 { (id.desc().inverse)(self.get(id)) }
}

/// Everything the audio path needs for one processing cycle.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ParamSnapshot {
  pub params: ParamStore,
  pub muted: bool,
}

impl ParamSnapshot {
  #[inline]
  pub fn get(&self, id: ParamId) -> f32 { self.params.get(id) }
}
