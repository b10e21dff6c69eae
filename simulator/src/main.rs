use anyhow::{bail, Context};
use arcade_execution::Engine;
use arcade_simulator::{default_scenarios, play, simulate_all, Config, Script};
use arcade_types::{
    casino::{
        Action, BetType, BoardSize, Difficulty, GameConfig, GameType, PinCount, Selection,
        SlotMapping, Wager, DEFAULT_WAGER,
    },
    Seed,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Arcade round engine tools")]
struct Args {
    /// YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the configured log level.
    #[arg(short, long)]
    log_level: Option<String>,

    /// Overrides the configured seed.
    #[arg(short, long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play rounds of one game and print the session as JSON.
    Play {
        game: GameType,

        #[arg(short, long, default_value_t = DEFAULT_WAGER)]
        bet: u64,

        /// Board side for Mines and Diamonds (4, 5 or 6).
        #[arg(long)]
        board: Option<u8>,

        #[arg(long)]
        mines: Option<u8>,

        /// Plinko pins (8, 12 or 14).
        #[arg(long)]
        pins: Option<u8>,

        /// Center Plinko buckets on the multiplier table instead of edge mapping.
        #[arg(long)]
        centered: bool,

        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Roulette bet (straight, red, black, odd, even, low, high, dozen, column).
        #[arg(long, default_value = "red")]
        bet_type: BetType,

        /// Straight number, or dozen/column index.
        #[arg(long, default_value_t = 0)]
        number: u8,

        /// Extra straight bets stacked on the roulette bet, each staking `bet`.
        #[arg(long, value_delimiter = ',')]
        straight: Vec<u8>,

        /// Mines tiles to reveal, in order.
        #[arg(long, value_delimiter = ',')]
        reveal: Vec<u8>,

        /// Diamonds cells to select, in order.
        #[arg(long, value_delimiter = ',')]
        select: Vec<u8>,

        #[arg(long)]
        cash_out: bool,

        #[arg(short, long, default_value_t = 1)]
        rounds: u32,
    },
    /// Estimate return-to-player for every game configuration.
    Simulate {
        #[arg(short, long, default_value_t = 100_000)]
        trials: u64,

        #[arg(short, long, default_value_t = DEFAULT_WAGER)]
        bet: u64,

        /// Only simulate scenarios for this game.
        #[arg(short, long)]
        game: Option<GameType>,
    },
}

fn game_config(
    game: GameType,
    board: Option<u8>,
    mines: Option<u8>,
    pins: Option<u8>,
    centered: bool,
    difficulty: Option<Difficulty>,
) -> anyhow::Result<GameConfig> {
    let board = board.map(BoardSize::try_from).transpose()?;
    let config = match GameConfig::default_for(game) {
        GameConfig::Mines {
            board: default_board,
            mines: default_mines,
        } => GameConfig::Mines {
            board: board.unwrap_or(default_board),
            mines: mines.unwrap_or(default_mines),
        },
        GameConfig::Plinko {
            pins: default_pins,
            mapping,
        } => GameConfig::Plinko {
            pins: pins
                .map(PinCount::try_from)
                .transpose()?
                .unwrap_or(default_pins),
            mapping: if centered {
                SlotMapping::Centered
            } else {
                mapping
            },
        },
        GameConfig::Diamonds {
            board: default_board,
            difficulty: default_difficulty,
        } => GameConfig::Diamonds {
            board: board.unwrap_or(default_board),
            difficulty: difficulty.unwrap_or(default_difficulty),
        },
        config => config,
    };
    config.validate()?;
    Ok(config)
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Load config
    let mut config = match &args.config {
        Some(path) => Config::load(path).context("failed to load config")?,
        None => Config::default(),
    };
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    // Create logger
    let level = config.log_level()?;
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    if config.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let seed = config.seed();
    match args.command {
        Command::Play {
            game,
            bet,
            board,
            mines,
            pins,
            centered,
            difficulty,
            bet_type,
            number,
            straight,
            reveal,
            select,
            cash_out,
            rounds,
        } => {
            let game_config = game_config(game, board, mines, pins, centered, difficulty)?;
            let wager = match game {
                GameType::Roulette => {
                    let selections = std::iter::once(Selection::new(bet_type, number))
                        .chain(straight.into_iter().map(Selection::straight))
                        .collect();
                    Wager::with_selections(bet, selections)
                }
                _ if !straight.is_empty() => bail!("{game} takes no roulette bets"),
                _ => Wager::new(bet),
            };
            let actions: Vec<Action> = match game {
                GameType::Mines => reveal.into_iter().map(Action::Reveal).collect(),
                GameType::Diamonds => select.into_iter().map(Action::Select).collect(),
                _ if !reveal.is_empty() || !select.is_empty() => {
                    bail!("{game} takes no actions")
                }
                _ => vec![],
            };
            let script = Script {
                actions,
                cash_out,
                rounds,
                ..Script::new(game_config, wager)
            };

            let mut engine = Engine::new(config.engine_config(seed)?);
            info!(seed, %game, rounds, "playing session");
            let report = play::run(&mut engine, &script)?;
            info!(
                balance = report.final_balance,
                net = report.net,
                "session finished"
            );
            print_json(&report)
        }
        Command::Simulate { trials, bet, game } => {
            if trials == 0 {
                bail!("trials must be > 0");
            }
            let scenarios: Vec<_> = default_scenarios()
                .into_iter()
                .filter(|s| game.map_or(true, |game| s.game_type() == game))
                .collect();
            info!(seed, trials, scenarios = scenarios.len(), "simulating");
            let reports = simulate_all(&Seed::from_u64(seed), &scenarios, bet, trials)?;
            print_json(&reports)
        }
    }
}
