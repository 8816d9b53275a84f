pub mod damping;
pub mod delay;
pub mod drive;
pub mod filter;
pub mod lfo;
pub mod phaser;
pub mod reverb;
pub mod waveform;

// Intentionally do not re-export stages here; import concrete types where needed
