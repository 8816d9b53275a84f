pub mod engine {
  pub mod messages;
  pub mod params;
  pub mod controller;
  pub mod graph;
  pub mod audio;
  pub mod synth;
  pub mod status;
  pub mod dsp;
  pub mod modules;
}
pub mod config;
pub mod error;

pub use config::EngineConfig;
pub use engine::audio::{channel, AudioEngine, ControlSurface};
pub use engine::messages::{ControlTick, EngineMsg, TimedTick};
pub use engine::params::{ParamId, ParamSnapshot, PARAM_COUNT};
pub use engine::synth::Engine;
pub use error::{EngineError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the `env_logger` backend for the `log` facade. `RUST_LOG` overrides
/// the default `info` filter. Calling it twice is harmless.
pub fn init_logging() {
  let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
    .format_timestamp_millis()
    .try_init();
}
