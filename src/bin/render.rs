use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use rand::{rngs::StdRng, SeedableRng};
use wobblebox::{Engine, EngineConfig};

struct Args {
  config: Option<PathBuf>,
  seconds: f32,
  out: PathBuf,
  randomize: bool,
  seed: Option<u64>,
}

const USAGE: &str = "Usage: wobblebox-render [--config path.json] [--seconds N] [--out file.wav] [--randomize] [--seed N]";

fn parse_args() -> Result<Args> {
  let mut args = Args { config: None, seconds: 4.0, out: PathBuf::from("wobblebox.wav"), randomize: false, seed: None };
  let mut it = env::args().skip(1);
  while let Some(arg) = it.next() {
    match arg.as_str() {
      "--config" => args.config = Some(it.next().context("--config needs a path")?.into()),
      "--seconds" => {
        let v = it.next().context("--seconds needs a value")?;
        args.seconds = v.parse().with_context(|| format!("bad --seconds value '{v}'"))?;
      }
      "--out" => args.out = it.next().context("--out needs a path")?.into(),
      "--randomize" => args.randomize = true,
      "--seed" => {
        let v = it.next().context("--seed needs a value")?;
        args.seed = Some(v.parse().with_context(|| format!("bad --seed value '{v}'"))?);
        args.randomize = true;
      }
      "-h" | "--help" => {
        println!("{USAGE}");
        std::process::exit(0);
      }
      other => bail!("unknown argument '{other}'\n{USAGE}"),
    }
  }
  if !(args.seconds.is_finite() && args.seconds > 0.0) {
    bail!("--seconds must be a positive number");
  }
  Ok(args)
}

fn main() -> Result<()> {
  wobblebox::init_logging();
  log::info!("wobblebox-render {}", wobblebox::VERSION);

  let args = parse_args()?;
  let config = match &args.config {
    Some(path) => EngineConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
    None => EngineConfig::default(),
  };

  let mut engine = Engine::from_config(&config);
  if args.randomize {
    match args.seed {
      Some(seed) => engine.randomize_with(&mut StdRng::seed_from_u64(seed)),
      None => engine.randomize(),
    }
  }

  let sr = config.sample_rate;
  let total = (args.seconds * sr).round() as usize;
  let spec = hound::WavSpec { channels: 2, sample_rate: sr as u32, bits_per_sample: 32, sample_format: hound::SampleFormat::Float };
  let mut writer = hound::WavWriter::create(&args.out, spec).with_context(|| format!("creating {}", args.out.display()))?;

  let mut ticks = config.ticks.clone();
  ticks.sort_by_key(|t| t.at_ms);
  let mut next_tick = 0;

  let block = config.block_size;
  let mut left = vec![0.0f32; block];
  let mut right = vec![0.0f32; block];
  let mut done = 0usize;
  while done < total {
    let now_ms = (done as f64 * 1000.0 / sr as f64) as u64;
    while next_tick < ticks.len() && ticks[next_tick].at_ms <= now_ms {
      engine.apply(ticks[next_tick].tick);
      log::debug!("tick at {} ms -> param {} locked={}", ticks[next_tick].at_ms, engine.current_param_index(), engine.is_param_locked());
      next_tick += 1;
    }
    let n = block.min(total - done);
    engine.process_block(&mut left[..n], &mut right[..n]);
    for (l, r) in left[..n].iter().zip(&right[..n]) {
      writer.write_sample(*l)?;
      writer.write_sample(*r)?;
    }
    done += n;
  }
  writer.finalize()?;

  log::info!("wrote {total} frames ({:.2} s at {sr} Hz) to {}", args.seconds, args.out.display());
  Ok(())
}
