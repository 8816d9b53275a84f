use thiserror::Error;

/// Failures at the edges of the engine: configuration, files, audio device.
/// The synthesis core itself has no fallible operations.
#[derive(Debug, Error)]
pub enum EngineError {
  #[error("config parse error: {0}")]
  Config(#[from] serde_json::Error),
  #[error("invalid config: {0}")]
  InvalidConfig(String),
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("wav error: {0}")]
  Wav(#[from] hound::Error),
  #[error("no output device")]
  NoOutputDevice,
  #[error("audio stream error: {0}")]
  Stream(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
