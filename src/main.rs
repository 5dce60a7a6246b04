//! TETRS simulator
//!
//! Plays a headless game with a pseudo-random input stream at a fixed frame
//! step and prints where it ended up.

use anyhow::Context;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::time::Duration;
use tetrs_engine::{Action, Game, Settings, Snapshot};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// How many high scores to print
const HIGH_SCORE_COUNT: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "tetrs-sim", version, about = "Run a headless TETRS session")]
struct Args {
    #[arg(long, help = "Seed for the piece generator and the input stream")]
    seed: Option<u64>,

    #[arg(long, default_value_t = 5000, help = "Number of frames to simulate")]
    ticks: u32,

    #[arg(long, default_value_t = 16, help = "Frame length in milliseconds")]
    dt_ms: u64,

    #[arg(short, long, value_name = "FILE", help = "Settings file to use instead of the default")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Write the effective settings to a file")]
    write_config: Option<PathBuf>,

    #[arg(long, help = "Print the final snapshot as JSON")]
    json: bool,

    #[arg(long, help = "Log to stderr instead of a file in the temp directory")]
    log_stderr: bool,
}

/// Get the tetrs temp directory, creating it if needed
fn tetrs_temp_dir() -> std::io::Result<PathBuf> {
    let dir = std::env::temp_dir().join("tetrs");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn init_logging(to_stderr: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::from_default_env().add_directive("tetrs_engine=info".parse()?);

    if to_stderr {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
        return Ok(None);
    }

    let session_id: u32 = rand::random();
    let tetrs_dir = tetrs_temp_dir().context("failed to create log directory")?;
    let log_file = format!("sim-{:08x}.log", session_id);

    let file_appender = tracing_appender::rolling::never(&tetrs_dir, &log_file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "tetrs-sim starting up, session={:08x}, log={}",
        session_id,
        tetrs_dir.join(&log_file).display()
    );
    Ok(Some(guard))
}

/// Inputs for one frame: mostly nothing, sometimes a move, rarely a drop
fn random_actions(rng: &mut ChaCha8Rng) -> Vec<Action> {
    let action = match rng.gen_range(0..100) {
        0..=9 => Action::MoveLeft,
        10..=19 => Action::MoveRight,
        20..=25 => Action::RotateCW,
        26..=29 => Action::RotateCCW,
        30..=33 => Action::SoftDrop,
        34 => Action::HardDrop,
        35 => Action::Hold,
        36 => Action::FastFall(true),
        37..=39 => Action::FastFall(false),
        _ => return Vec::new(),
    };
    vec![action]
}

/// Board from the top row down, one letter per filled cell
fn render(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for row in snapshot.rows.iter().rev() {
        out.push('|');
        for cell in row {
            out.push(cell.map_or('.', |piece| piece.letter()));
        }
        out.push_str("|\n");
    }
    out.push('+');
    out.push_str(&"-".repeat(snapshot.bounds.width() as usize));
    out.push_str("+\n");
    out
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _guard = init_logging(args.log_stderr)?;

    let mut settings = match &args.config {
        Some(path) => Settings::from_path(path)?,
        None => Settings::load(),
    };
    if let Some(seed) = args.seed {
        settings.generator.seed = Some(seed);
    }
    if let Some(path) = &args.write_config {
        settings.save_to(path)?;
        tracing::info!("Wrote settings to {}", path.display());
    }

    let seed = settings.generator.seed.unwrap_or_else(rand::random);
    settings.generator.seed = Some(seed);
    let config = settings.into_config().context("invalid settings")?;
    let mut game = Game::new(config)?;
    // Separate stream so input does not perturb the piece sequence
    let mut input_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));

    tracing::info!(seed, ticks = args.ticks, dt_ms = args.dt_ms, "simulation starting");
    game.process_action(Action::Start);

    let dt = Duration::from_millis(args.dt_ms);
    let mut frames = 0;
    for _ in 0..args.ticks {
        game.tick(dt, random_actions(&mut input_rng));
        frames += 1;
        if game.is_game_over() {
            break;
        }
    }
    tracing::info!(
        frames,
        score = game.score().points,
        level = game.level(),
        "simulation finished"
    );

    let snapshot = game.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render(&snapshot));
        println!(
            "state: {:?}  score: {}  level: {}  lines: {}  frames: {}  seed: {}",
            snapshot.state, snapshot.score, snapshot.level, snapshot.lines, frames, seed
        );
    }

    println!("high scores:");
    for (rank, score) in game.high_scores(HIGH_SCORE_COUNT).iter().enumerate() {
        println!("{:>2}. {}", rank + 1, score);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetrs_engine::GameConfig;

    #[test]
    fn test_render_draws_every_row() {
        let game = Game::new(GameConfig::default()).unwrap();
        let text = render(&game.snapshot());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 21);
        assert_eq!(lines[0], "|..........|");
        assert_eq!(lines[20], "+----------+");
    }

    #[test]
    fn test_input_stream_is_repeatable() {
        let mut a = ChaCha8Rng::seed_from_u64(3);
        let mut b = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            assert_eq!(random_actions(&mut a), random_actions(&mut b));
        }
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["tetrs-sim", "--seed", "7", "--ticks", "10", "--json"]);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.ticks, 10);
        assert_eq!(args.dt_ms, 16);
        assert!(args.json);
        assert!(!args.log_stderr);
    }
}
