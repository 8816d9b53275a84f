pub mod modulation;
pub mod voice;

// Intentionally do not re-export modules here; import concrete types where needed
