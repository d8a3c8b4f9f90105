use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use serde::Serialize;
use tetrisml_engine::{DEFAULT_TICK_INTERVAL, GameEngine, GameSnapshot, RandomPieceSource};
use tetrisml_evaluator::{AiParameters, HeuristicEvaluator};
use tracing::info;

use crate::{command::weights::WeightsSource, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Seed for the piece generator (random when omitted)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Maximum number of ticks to run
    #[arg(long, default_value_t = 10_000)]
    pub(crate) max_ticks: u64,
    /// Interval between ticks in milliseconds
    #[arg(long, default_value_t = duration_millis(DEFAULT_TICK_INTERVAL))]
    pub(crate) tick_ms: u64,
    /// Sleep between ticks instead of running on simulated time
    #[arg(long)]
    pub(crate) realtime: bool,
    /// Leave the AI off; pieces only fall
    #[arg(long)]
    pub(crate) no_ai: bool,
    #[command(flatten)]
    pub(crate) weights: WeightsSource,
    /// Output file path
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: u64,
    ai_parameters: AiParameters,
    board: Vec<String>,
    #[serde(flatten)]
    snapshot: GameSnapshot,
}

#[allow(clippy::cast_possible_truncation)]
const fn duration_millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let ai_parameters = arg.weights.load()?;
    let seed = arg.seed.unwrap_or_else(rand::random);
    let interval = Duration::from_millis(arg.tick_ms);
    info!(seed, ai = !arg.no_ai, max_ticks = arg.max_ticks, "starting simulation");

    let mut engine = GameEngine::new(
        HeuristicEvaluator::new(ai_parameters),
        RandomPieceSource::seeded(seed),
    );
    if !arg.no_ai {
        engine.toggle_ai();
    }
    engine.start_game();

    let mut now = Instant::now();
    for _ in 0..arg.max_ticks {
        if engine.is_game_over() {
            break;
        }
        if arg.realtime {
            thread::sleep(interval);
            engine.tick();
        } else {
            now += interval;
            engine.tick_at(now);
        }
    }

    let stats = engine.stats();
    info!(
        state = %engine.state(),
        score = stats.score(),
        lines = stats.total_cleared_lines(),
        pieces = stats.completed_pieces(),
        ticks = stats.ticks(),
        "simulation finished"
    );

    let report = SimulationReport {
        seed,
        ai_parameters,
        board: engine.board().to_string().lines().map(str::to_owned).collect(),
        snapshot: engine.snapshot(),
    };
    util::save_json(&report, arg.output.as_deref())
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    fn simulate_to_json(seed: u64, no_ai: bool, name: &str) -> serde_json::Value {
        let path = env::temp_dir().join(format!("tetrisml-{}-{name}.json", process::id()));
        let arg = SimulateArg {
            seed: Some(seed),
            max_ticks: 400,
            tick_ms: 500,
            realtime: false,
            no_ai,
            weights: WeightsSource::default(),
            output: Some(path.clone()),
        };
        run(&arg).unwrap();
        let json = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_report_contents() {
        let report = simulate_to_json(5, false, "report");
        assert_eq!(report["seed"], 5);
        assert_eq!(report["ai_enabled"], true);
        assert_eq!(report["ai_parameters"]["completeLines"], 0.760_666);
        assert_eq!(report["board"].as_array().unwrap().len(), 20);
        assert_eq!(report["grid"].as_array().unwrap().len(), 20);
        assert!(report["stats"]["ticks"].as_u64().unwrap() <= 400);
        assert!(report["stats"]["completed_pieces"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = simulate_to_json(11, false, "seed-a");
        let b = simulate_to_json(11, false, "seed-b");
        assert_eq!(a, b);
    }

    #[test]
    fn test_without_ai_pieces_stack_in_spawn_column() {
        let report = simulate_to_json(3, true, "no-ai");
        assert_eq!(report["ai_enabled"], false);
        assert_eq!(report["state"], "GameOver");
        // Nothing ever moves sideways, so columns 0..=3 stay empty.
        for row in report["board"].as_array().unwrap() {
            assert!(row.as_str().unwrap().starts_with("...."));
        }
    }
}
