//! Monte Carlo estimate of return-to-player per game configuration.
//!
//! Rounds are driven straight through the game modules (no ledger), so every
//! trial stakes the same wager regardless of earlier results.

use arcade_execution::casino::{
    cash_out_game, game_outcome, init_game, process_game_move, GameError, GameResult, GameRng,
};
use arcade_types::{
    casino::{
        Action, BetType, BoardSize, Difficulty, GameConfig, GameSession, GameType, Gem, Outcome,
        PinCount, Selection, SlotMapping, Wager, MIN_MATCH,
    },
    Seed,
};
use serde::Serialize;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Running totals for a batch of rounds.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    pub trials: u64,
    pub wins: u64,
    total_net: f64,
    total_net_sq: f64,
    total_wagered: f64,
}

impl Stats {
    pub fn add(&mut self, wagered: u64, winnings: u64) {
        let net = winnings as f64 - wagered as f64;
        self.trials += 1;
        if winnings > 0 {
            self.wins += 1;
        }
        self.total_net += net;
        self.total_net_sq += net * net;
        self.total_wagered += wagered as f64;
    }

    pub fn merge(&mut self, other: &Stats) {
        self.trials += other.trials;
        self.wins += other.wins;
        self.total_net += other.total_net;
        self.total_net_sq += other.total_net_sq;
        self.total_wagered += other.total_wagered;
    }

    pub fn mean_net(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.total_net / self.trials as f64
        }
    }

    pub fn mean_wagered(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.total_wagered / self.trials as f64
        }
    }

    pub fn house_edge(&self) -> f64 {
        let mw = self.mean_wagered();
        if mw == 0.0 {
            0.0
        } else {
            -self.mean_net() / mw
        }
    }

    /// Credits returned per credit wagered.
    pub fn rtp(&self) -> f64 {
        1.0 - self.house_edge()
    }

    pub fn hit_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.wins as f64 / self.trials as f64
        }
    }

    pub fn stderr(&self) -> f64 {
        if self.trials <= 1 {
            return 0.0;
        }
        let mean = self.mean_net();
        let var = (self.total_net_sq / self.trials as f64) - mean * mean;
        let var = if var < 0.0 { 0.0 } else { var };
        (var / self.trials as f64).sqrt()
    }
}

/// How the simulated player drives a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Resolve on start.
    SingleShot,
    /// Reveal tiles in order, cashing out after this many safe ones.
    RevealThenCashOut(u8),
    /// Select the first available triple, cashing out after this many matches.
    MatchThenCashOut(u32),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub name: String,
    pub config: GameConfig,
    /// Roulette bets, each staking the per-bet amount.
    pub selections: Vec<Selection>,
    pub strategy: Strategy,
}

impl Scenario {
    pub fn single_shot(name: &str, config: GameConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            selections: vec![],
            strategy: Strategy::SingleShot,
        }
    }

    pub fn roulette(name: &str, selections: &[Selection]) -> Self {
        Self {
            selections: selections.to_vec(),
            ..Self::single_shot(name, GameConfig::Roulette)
        }
    }

    /// Wager placing `amount` on every bet of the scenario.
    pub fn wager(&self, amount: u64) -> Wager {
        Wager::with_selections(amount, self.selections.clone())
    }

    pub fn game_type(&self) -> GameType {
        self.config.game_type()
    }
}

/// Configurations worth comparing, one or more per game.
pub fn default_scenarios() -> Vec<Scenario> {
    let mut scenarios = vec![
        Scenario::single_shot("slots", GameConfig::Slots),
        Scenario::single_shot("dream-catcher", GameConfig::DreamCatcher),
    ];
    for pins in [PinCount::Eight, PinCount::Twelve, PinCount::Fourteen] {
        scenarios.push(Scenario::single_shot(
            &format!("plinko-{}-pins", pins as u8),
            GameConfig::Plinko {
                pins,
                mapping: SlotMapping::Edge,
            },
        ));
        scenarios.push(Scenario::single_shot(
            &format!("plinko-{}-pins-centered", pins as u8),
            GameConfig::Plinko {
                pins,
                mapping: SlotMapping::Centered,
            },
        ));
    }
    scenarios.extend([
        Scenario::roulette("roulette-straight", &[Selection::straight(17)]),
        Scenario::roulette("roulette-red", &[Selection::outside(BetType::Red)]),
        Scenario::roulette("roulette-dozen", &[Selection::new(BetType::Dozen, 0)]),
        Scenario::roulette("roulette-column", &[Selection::new(BetType::Column, 2)]),
        Scenario::roulette(
            "roulette-red-and-seven",
            &[Selection::outside(BetType::Red), Selection::straight(7)],
        ),
    ]);
    for reveals in [1, 3, 5] {
        scenarios.push(Scenario {
            name: format!("mines-5x5-5-reveal-{reveals}"),
            config: GameConfig::default_for(GameType::Mines),
            selections: vec![],
            strategy: Strategy::RevealThenCashOut(reveals),
        });
    }
    for (board, difficulty, matches) in [
        (BoardSize::Four, Difficulty::Easy, 1),
        (BoardSize::Six, Difficulty::Hard, 2),
    ] {
        scenarios.push(Scenario {
            name: format!(
                "diamonds-{side}x{side}-{difficulty:?}-match-{matches}",
                side = board.side()
            )
            .to_lowercase(),
            config: GameConfig::Diamonds { board, difficulty },
            selections: vec![],
            strategy: Strategy::MatchThenCashOut(matches),
        });
    }
    scenarios
}

/// First cells forming a triple of one gem, if the grid has one.
fn find_triple(grid: &[Gem]) -> Option<Vec<u8>> {
    Gem::ALL.iter().find_map(|gem| {
        let cells: Vec<u8> = (0..grid.len() as u8)
            .filter(|c| grid[*c as usize] == *gem)
            .take(MIN_MATCH)
            .collect();
        (cells.len() == MIN_MATCH).then_some(cells)
    })
}

/// Actions for the strategy's next step; empty once it wants to cash out.
///
/// A Diamonds match takes three selections, so the whole triple is returned.
fn next_actions(session: &GameSession, strategy: Strategy) -> Result<Vec<Action>, GameError> {
    match (strategy, game_outcome(session)?) {
        (Strategy::RevealThenCashOut(target), Outcome::Mines { cells, revealed, .. }) => {
            if revealed.len() >= target as usize {
                return Ok(vec![]);
            }
            Ok((0..cells)
                .find(|c| !revealed.contains(c))
                .map(Action::Reveal)
                .into_iter()
                .collect())
        }
        (Strategy::MatchThenCashOut(target), Outcome::Diamonds { grid, matches, .. }) => {
            if matches >= target {
                return Ok(vec![]);
            }
            Ok(find_triple(&grid)
                .unwrap_or_default()
                .into_iter()
                .map(Action::Select)
                .collect())
        }
        _ => Ok(vec![]),
    }
}

/// Play one round and return the credits it paid out.
pub fn play_round(
    seed: &Seed,
    round_id: u64,
    scenario: &Scenario,
    amount: u64,
) -> Result<u64, GameError> {
    let wager = scenario.wager(amount);
    let mut session = GameSession::new(round_id, scenario.config, &wager, 0);
    let mut rng = GameRng::new(seed, round_id, 0);
    let mut result = init_game(&mut session, &mut rng)?;

    while result == GameResult::Continue {
        let actions = next_actions(&session, scenario.strategy)?;
        if actions.is_empty() {
            result = match cash_out_game(&mut session) {
                Ok(result) => result,
                // Nothing to cash out: the round is forfeited
                Err(GameError::InvalidMove) => GameResult::Loss,
                Err(err) => return Err(err),
            };
            break;
        }
        for action in actions {
            session.move_count += 1;
            let mut rng = GameRng::new(seed, round_id, session.move_count);
            result = process_game_move(&mut session, action, &mut rng)?;
            if result != GameResult::Continue {
                break;
            }
        }
    }

    Ok(match result {
        GameResult::Win(winnings) => winnings,
        _ => 0,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub scenario: String,
    pub game: GameType,
    pub trials: u64,
    pub avg_wagered: f64,
    pub avg_net: f64,
    pub house_edge: f64,
    pub rtp: f64,
    pub hit_rate: f64,
    pub stderr: f64,
}

impl Report {
    fn new(scenario: &Scenario, stats: &Stats) -> Self {
        Self {
            scenario: scenario.name.clone(),
            game: scenario.game_type(),
            trials: stats.trials,
            avg_wagered: stats.mean_wagered(),
            avg_net: stats.mean_net(),
            house_edge: stats.house_edge(),
            rtp: stats.rtp(),
            hit_rate: stats.hit_rate(),
            stderr: stats.stderr(),
        }
    }
}

fn trial(seed: &Seed, scenario: &Scenario, amount: u64, round_id: u64) -> Result<Stats, GameError> {
    let staked = scenario.wager(amount).total().ok_or(GameError::Overflow)?;
    let winnings = play_round(seed, round_id, scenario, amount)?;
    let mut stats = Stats::default();
    stats.add(staked, winnings);
    Ok(stats)
}

/// Run `trials` rounds of one scenario.
pub fn simulate(
    seed: &Seed,
    scenario: &Scenario,
    amount: u64,
    trials: u64,
) -> Result<Report, GameError> {
    #[cfg(feature = "parallel")]
    let stats = (1..=trials)
        .into_par_iter()
        .map(|round_id| trial(seed, scenario, amount, round_id))
        .try_reduce(Stats::default, |mut a, b| {
            a.merge(&b);
            Ok(a)
        })?;

    #[cfg(not(feature = "parallel"))]
    let stats = {
        let mut stats = Stats::default();
        for round_id in 1..=trials {
            stats.merge(&trial(seed, scenario, amount, round_id)?);
        }
        stats
    };

    let report = Report::new(scenario, &stats);
    debug!(
        scenario = %report.scenario,
        trials,
        rtp = report.rtp,
        stderr = report.stderr,
        "scenario simulated"
    );
    Ok(report)
}

/// Run every scenario with the same seed, wager and trial count.
pub fn simulate_all(
    seed: &Seed,
    scenarios: &[Scenario],
    amount: u64,
    trials: u64,
) -> Result<Vec<Report>, GameError> {
    scenarios
        .iter()
        .map(|scenario| simulate(seed, scenario, amount, trials))
        .collect()
}
