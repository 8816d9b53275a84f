use std::thread;

use wobblebox::{channel, EngineConfig, ParamId};

#[test]
fn snapshots_cross_threads_in_order() {
  let cfg = EngineConfig { channel_capacity: 256, ..EngineConfig::default() };
  let (mut surface, mut engine) = channel(&cfg);

  let control = thread::spawn(move || {
    surface.update_controls(2, false, 0.0);
    surface.update_controls(0, false, 0.5);
    for i in 0..=20 {
      surface.update_controls(0, false, 0.5 + i as f32 * 0.02);
    }
    surface
  });
  let surface = control.join().unwrap();

  // 23 snapshots queued; one block drains them all
  let mut l = [0.0f32; 64];
  let mut r = [0.0f32; 64];
  engine.render_block(&mut l, &mut r);

  let seen = engine.snapshot().copied().unwrap();
  assert_eq!(seen, surface.controller().snapshot());
  assert!((seen.get(ParamId::Amplitude) - 0.9).abs() < 1e-5);
}

#[test]
fn audio_renders_while_control_thread_publishes() {
  let (mut surface, mut engine) = channel(&EngineConfig::default());
  let control = thread::spawn(move || {
    for n in 0..200 {
      surface.update_controls(if n % 10 == 0 { 1 } else { 0 }, n % 50 == 0, (n % 100) as f32 / 100.0);
      if n % 20 == 0 { surface.randomize(); }
    }
    assert!(surface.quit());
  });

  let mut l = vec![0.0f32; 128];
  let mut r = vec![0.0f32; 128];
  let mut blocks = 0;
  while !engine.has_quit() && blocks < 1_000_000 {
    engine.render_block(&mut l, &mut r);
    assert!(l.iter().chain(r.iter()).all(|s| s.is_finite() && s.abs() < 2.0));
    blocks += 1;
  }
  control.join().unwrap();
  assert!(engine.has_quit());
  engine.render_block(&mut l, &mut r);
  assert!(l.iter().chain(r.iter()).all(|&s| s == 0.0));
}
