use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use log::info;
use uuid::Uuid;

use sadhana::cli::Args;
use sadhana::core::narration::LogNarrator;
use sadhana::core::player::{PlayState, Player};
use sadhana::core::timeline::Timeline;
use sadhana::entities::Sequence;
use sadhana::export;
use sadhana::store::{JsonDirStore, SequenceStore};

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::new();
    logger.filter_level(args.log_level());
    if let Some(path) = &args.log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }
    logger.init();

    let store_dir = args
        .store_dir
        .clone()
        .unwrap_or_else(JsonDirStore::default_dir);

    if args.list {
        let store = JsonDirStore::open(&store_dir)
            .with_context(|| format!("opening store at {}", store_dir.display()))?;
        for (id, name) in store.list() {
            println!("{}  {}", id, name);
        }
        return Ok(());
    }

    let seq = load_sequence(&args, &store_dir)?;
    info!(
        "Loaded '{}': {} sections, {}s total",
        seq.name,
        seq.sections.len(),
        seq.duration_secs()
    );

    if args.export || !args.play {
        // Outline is also the default action when not playing
        print!("{}", export::render_text(&seq));
    }

    if args.play {
        run_playback(&seq, args.speed, args.tick_ms);
    }

    Ok(())
}

fn load_sequence(args: &Args, store_dir: &std::path::Path) -> Result<Sequence> {
    if let Some(path) = &args.file_path {
        return Sequence::from_json(path).map_err(|e| anyhow!(e));
    }
    if let Some(id_text) = &args.sequence_id {
        let id: Uuid = id_text
            .parse()
            .with_context(|| format!("invalid sequence id '{}'", id_text))?;
        let store = JsonDirStore::open(store_dir)
            .with_context(|| format!("opening store at {}", store_dir.display()))?;
        return store.get(id).map_err(|e| anyhow!(e));
    }
    bail!("Nothing to do: pass a sequence file, --id, or --list (see --help)");
}

/// Headless playback: tick the player at a fixed period until it finishes.
/// Elapsed time comes from the wall clock on every tick, so oversleeping
/// (or a suspended terminal) never desyncs the position.
fn run_playback(seq: &Sequence, speed: f32, tick_ms: u64) {
    let timeline = Timeline::flatten(seq);
    let mut player = Player::new(timeline).with_narrator(Box::new(LogNarrator));
    player.set_speed(speed);
    player.play();

    let tick = Duration::from_millis(tick_ms.max(1));
    let mut last_line = String::new();
    while player.state() == PlayState::Playing {
        thread::sleep(tick);
        player.update();

        let snap = player.snapshot();
        let line = format!(
            "\r{:>7.1}s / {:.0}s  [{:>5.1}%]  {}   ",
            snap.elapsed,
            snap.total,
            snap.progress * 100.0,
            snap.active_id
                .as_deref()
                .and_then(|_| player.timeline().interval_at(snap.elapsed))
                .map(|i| i.pose_ref.clone())
                .unwrap_or_default(),
        );
        if line != last_line {
            print!("{}", line);
            use std::io::Write;
            let _ = std::io::stdout().flush();
            last_line = line;
        }
    }
    println!();
    info!("Done");
}
