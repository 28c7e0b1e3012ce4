//! tablut - play Tablut with MCTS.
//!
//! Two modes:
//! 1. `play`: self-play from the standard opening, printing the board after every move
//! 2. `respond`: read one server state as JSON, print the chosen move as JSON

use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use tablut_mcts::games::tablut::{
    GameState, Outcome, ServerAction, ServerState, TablutGame, Weights,
};
use tablut_mcts::mcts::{MCTSConfig, MCTSSearch};

#[derive(Parser, Debug)]
#[command(name = "tablut")]
#[command(about = "Tablut player driven by Monte Carlo Tree Search")]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, env = "TABLUT_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a full game against itself
    Play {
        #[command(flatten)]
        search: SearchArgs,

        /// Stop after this many plies
        #[arg(long, env = "TABLUT_MAX_TURNS", default_value_t = 200)]
        max_turns: u32,
    },
    /// Answer one server state read from stdin (or --input)
    Respond {
        #[command(flatten)]
        search: SearchArgs,

        /// Read the state from this file instead of stdin
        #[arg(long)]
        input: Option<String>,
    },
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Seconds per move; budgets above 2s keep 2s in reserve
    #[arg(long, env = "TABLUT_TIME", default_value_t = 1.0)]
    time: f64,

    /// Seed for rollouts
    #[arg(long, env = "TABLUT_SEED", default_value_t = 42)]
    seed: u64,

    /// Five comma-separated weights, or a JSON file holding them
    #[arg(long, env = "TABLUT_WEIGHTS")]
    weights: Option<String>,
}

impl SearchArgs {
    fn weights(&self) -> Result<Weights> {
        let Some(source) = &self.weights else {
            return Ok(Weights::default());
        };
        let weights = if Path::new(source).is_file() {
            Weights::from_json_file(source)
        } else {
            source.parse()
        };
        weights.with_context(|| format!("invalid --weights '{source}'"))
    }

    fn search(&self) -> Result<MCTSSearch<TablutGame>> {
        let config = MCTSConfig::default()
            .with_time_budget(time_budget(self.time)?)
            .with_seed(self.seed);
        Ok(MCTSSearch::new(TablutGame::new(self.weights()?), config))
    }
}

fn time_budget(secs: f64) -> Result<Duration> {
    anyhow::ensure!(
        secs > 0.0,
        "--time must be a positive number of seconds, got {secs}"
    );
    Duration::try_from_secs_f64(secs).with_context(|| format!("--time {secs} is out of range"))
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn play(search_args: &SearchArgs, max_turns: u32) -> Result<()> {
    let mut search = search_args.search()?;
    play_game(&mut search, max_turns, &mut io::stdout().lock())
}

/// Self-play from the standard opening, writing the board after every move.
fn play_game(
    search: &mut MCTSSearch<TablutGame>,
    max_turns: u32,
    out: &mut impl Write,
) -> Result<()> {
    let mut state = GameState::new();
    writeln!(out, "{state}")?;

    for ply in 1..=max_turns {
        if state.is_terminal() {
            break;
        }
        let side = state.turn();
        let Some(action) = search.search(&state) else {
            break;
        };
        info!(
            ply,
            side = %side,
            action = %action,
            search = %search.stats(),
            "move played"
        );
        state.apply_action(&action);
        writeln!(out, "\n{ply}. {side} {action}\n{state}")?;
    }

    match Outcome::from_status(state.status()) {
        Some(outcome) => writeln!(out, "Result: {outcome:?}")?,
        None => writeln!(out, "Result: unfinished after {max_turns} plies")?,
    }
    Ok(())
}

fn respond(search_args: &SearchArgs, input: Option<&str>) -> Result<()> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read state from {path}"))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read state from stdin")?;
            buf
        }
    };

    let state = ServerState::from_json(&text)
        .and_then(|message| message.to_game_state())
        .map_err(|err| {
            error!(error = %err, "rejected server state");
            err
        })
        .context("malformed server state")?;

    let mut search = search_args.search()?;
    let action = search
        .search(&state)
        .context("no legal move in the given position")?;
    info!(action = %action, search = %search.stats(), "responding");

    println!("{}", ServerAction::from_action(&action).to_json()?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match &cli.command {
        Command::Play { search, max_turns } => play(search, *max_turns),
        Command::Respond { search, input } => respond(search, input.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_budget_rejects_out_of_range() {
        assert_eq!(time_budget(1.5).unwrap(), Duration::from_millis(1500));
        for bad in [1e20, f64::INFINITY, f64::NAN, 0.0, -1.0] {
            assert!(time_budget(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_play_prints_board_after_every_move() {
        let config = MCTSConfig::default().with_max_iterations(3).with_seed(7);
        let game = TablutGame::default().with_max_rollout_plies(10);
        let mut search = MCTSSearch::new(game, config);

        let mut out = Vec::new();
        play_game(&mut search, 4, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let board_rows = text
            .lines()
            .filter(|line| line.len() == 9 && !line.contains(' '))
            .count();
        assert!(text.starts_with(&GameState::new().to_string()));
        for ply in 1..=4 {
            assert_eq!(text.matches(&format!("\n{ply}. ")).count(), 1, "{text}");
        }
        assert_eq!(board_rows, 5 * 9, "{text}");
        assert!(text.trim_end().ends_with("Result: unfinished after 4 plies"), "{text}");
    }
}
