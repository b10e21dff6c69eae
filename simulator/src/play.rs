//! Scripted play against a round engine.

use arcade_execution::{Engine, Error, RoundUpdate};
use arcade_types::casino::{Action, GameConfig, GameType, Outcome, RoundState, Wager};
use serde::Serialize;
use tracing::{debug, warn};

/// Rounds to play and the decisions to make in each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    pub config: GameConfig,
    pub wager: Wager,
    /// Applied in order to every progressive round.
    pub actions: Vec<Action>,
    /// Cash out once the actions run out; otherwise the round is abandoned.
    pub cash_out: bool,
    pub rounds: u32,
}

impl Script {
    pub fn new(config: GameConfig, wager: Wager) -> Self {
        Self {
            config,
            wager,
            actions: vec![],
            cash_out: false,
            rounds: 1,
        }
    }

    pub fn game_type(&self) -> GameType {
        self.config.game_type()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    pub round_id: u64,
    pub game: GameType,
    pub state: RoundState,
    /// Absent when the round has already left the bounded history.
    pub outcome: Option<Outcome>,
    pub wager: u64,
    pub winnings: u64,
    pub balance: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub starting_balance: u64,
    pub final_balance: u64,
    pub net: i128,
    pub rounds: Vec<RoundReport>,
}

fn report(engine: &Engine, update: &RoundUpdate, wager: u64) -> RoundReport {
    let outcome = engine
        .history()
        .iter()
        .find(|entry| entry.round_id == update.round_id)
        .map(|entry| entry.outcome.clone());
    RoundReport {
        round_id: update.round_id,
        game: update.game_type,
        state: update.state,
        outcome,
        wager,
        winnings: update.winnings.unwrap_or(0),
        balance: update.balance,
    }
}

fn play_progressive(engine: &mut Engine, script: &Script) -> Result<RoundUpdate, Error> {
    let mut update = engine.start_round(script.config, script.wager.clone())?;
    let round_id = update.round_id;
    for (i, action) in script.actions.iter().enumerate() {
        if update.state.is_resolved() {
            warn!(
                round_id,
                skipped = script.actions.len() - i,
                "round resolved before script finished"
            );
            break;
        }
        update = engine.apply_action(round_id, *action)?;
        debug!(round_id, ?action, steps = update.progress.steps, "action applied");
    }
    if update.state.is_resolved() {
        return Ok(update);
    }
    if script.cash_out && update.progress.steps > 0 {
        engine.cash_out(round_id)
    } else {
        engine.abandon(round_id)
    }
}

/// Play every round of `script` and summarize the session.
pub fn run(engine: &mut Engine, script: &Script) -> Result<SessionReport, Error> {
    let starting_balance = engine.balance();
    let game_type = script.game_type();
    let stake = script
        .wager
        .total()
        .ok_or(Error::InvalidWager(script.wager.amount))?;
    let mut rounds = vec![];

    if game_type.is_progressive() {
        for _ in 0..script.rounds {
            let update = play_progressive(engine, script)?;
            rounds.push(report(engine, &update, stake));
        }
    } else {
        if !script.actions.is_empty() {
            return Err(Error::InvalidConfiguration(format!(
                "{game_type} takes no actions"
            )));
        }
        let updates = if script.rounds > 1 {
            engine.autoplay(script.config, script.wager.clone(), script.rounds)?
        } else {
            vec![engine.start_round(script.config, script.wager.clone())?]
        };
        rounds.extend(updates.iter().map(|update| report(engine, update, stake)));
    }

    let final_balance = engine.balance();
    Ok(SessionReport {
        starting_balance,
        final_balance,
        net: final_balance as i128 - starting_balance as i128,
        rounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_execution::mocks::create_engine;
    use arcade_types::casino::{BetType, Selection, STARTING_BALANCE};

    fn assert_balanced(report: &SessionReport) {
        let wagered: u64 = report.rounds.iter().map(|r| r.wager).sum();
        let won: u64 = report.rounds.iter().map(|r| r.winnings).sum();
        assert_eq!(report.final_balance, report.starting_balance - wagered + won);
        assert!(report.rounds.iter().all(|r| r.state.is_resolved()));
    }

    #[test]
    fn test_single_round() {
        let mut engine = create_engine(1);
        let script = Script::new(
            GameConfig::Roulette,
            Wager::with_selection(10_000, Selection::outside(BetType::Red)),
        );
        let report = run(&mut engine, &script).unwrap();
        assert_eq!(report.rounds.len(), 1);
        assert!(matches!(
            report.rounds[0].outcome,
            Some(Outcome::Roulette { .. })
        ));
        assert_eq!(report.starting_balance, STARTING_BALANCE);
        assert_balanced(&report);
    }

    #[test]
    fn test_stacked_roulette_round() {
        let mut engine = create_engine(2);
        let script = Script {
            rounds: 3,
            ..Script::new(
                GameConfig::Roulette,
                Wager::with_selections(
                    5_000,
                    vec![Selection::outside(BetType::Low), Selection::straight(36)],
                ),
            )
        };
        let report = run(&mut engine, &script).unwrap();
        assert_eq!(report.rounds.len(), 3);
        assert!(report.rounds.iter().all(|r| r.wager == 10_000));
        assert_balanced(&report);
    }

    #[test]
    fn test_autoplay_rounds() {
        let mut engine = create_engine(1);
        let script = Script {
            rounds: 5,
            ..Script::new(GameConfig::default_for(GameType::Plinko), Wager::new(5_000))
        };
        let report = run(&mut engine, &script).unwrap();
        assert_eq!(report.rounds.len(), 5);
        assert!(report.rounds.iter().all(|r| r.outcome.is_some()));
        assert_balanced(&report);
    }

    #[test]
    fn test_mines_script() {
        let mut engine = create_engine(3);
        let script = Script {
            actions: vec![Action::Reveal(0), Action::Reveal(1), Action::Reveal(2)],
            cash_out: true,
            rounds: 10,
            ..Script::new(GameConfig::default_for(GameType::Mines), Wager::new(10_000))
        };
        let report = run(&mut engine, &script).unwrap();
        assert_eq!(report.rounds.len(), 10);
        for round in &report.rounds {
            match round.state {
                RoundState::Won => assert_eq!(round.winnings, 13_000),
                RoundState::Lost => assert_eq!(round.winnings, 0),
                state => panic!("unexpected state {state}"),
            }
        }
        assert_balanced(&report);
    }

    #[test]
    fn test_no_progress_abandons() {
        let mut engine = create_engine(1);
        let script = Script {
            cash_out: true,
            ..Script::new(GameConfig::default_for(GameType::Diamonds), Wager::new(10_000))
        };
        let report = run(&mut engine, &script).unwrap();
        assert_eq!(report.rounds[0].state, RoundState::Abandoned);
        assert_eq!(report.net, -10_000);
    }

    #[test]
    fn test_single_shot_rejects_actions() {
        let mut engine = create_engine(1);
        let script = Script {
            actions: vec![Action::Select(0)],
            ..Script::new(GameConfig::Slots, Wager::new(10_000))
        };
        assert!(matches!(
            run(&mut engine, &script),
            Err(Error::InvalidConfiguration(_))
        ));
        assert_eq!(engine.balance(), STARTING_BALANCE);
    }
}
