//! Round engine.
//!
//! Drives one round at a time through `Idle -> Active -> Resolved`: the wager
//! is debited when the round starts, the game module generates the outcome,
//! and winnings are credited exactly once when the round resolves (at start
//! for single-shot games, on a losing reveal, a cleared board or a cash out
//! for progressive ones).

use crate::casino::{
    cash_out_game, game_outcome, game_progress, init_game, process_game_move, GameError,
    GameResult, GameRng, Progress,
};
use crate::ledger::Ledger;
use arcade_types::{
    casino::{
        Action, GameConfig, GameSession, GameType, History, HistoryEntry, Outcome, RoundState,
        Wager, HISTORY_CAPACITY, STARTING_BALANCE, WAGER_CHOICES,
    },
    Seed,
};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Upper bound on the update buffer reserved up front by [Engine::autoplay].
const MAX_PREALLOCATED_ROUNDS: u32 = 1024;

/// Configuration for the [Engine].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Entropy every round's draws are derived from.
    pub seed: Seed,
    pub starting_balance: u64,
    pub history_capacity: usize,
    /// Permitted wager amounts; empty allows any positive wager.
    pub allowed_wagers: Vec<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: Seed::default(),
            starting_balance: STARTING_BALANCE,
            history_capacity: HISTORY_CAPACITY,
            allowed_wagers: WAGER_CHOICES.to_vec(),
        }
    }
}

/// Error returned by engine operations. None of them change any state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: u64, required: u64 },
    #[error("invalid transition: {0}")]
    InvalidTransition(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("wager {0} is not allowed")]
    InvalidWager(u64),
    #[error("invalid action: {0}")]
    InvalidAction(#[from] GameError),
    #[error("round {0} not found")]
    RoundNotFound(u64),
}

/// The current (or most recently resolved) round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    pub session: GameSession,
    pub state: RoundState,
    /// Credits returned to the balance, set once the round resolves.
    pub winnings: Option<u64>,
}

impl Round {
    pub fn id(&self) -> u64 {
        self.session.id
    }

    pub fn game_type(&self) -> GameType {
        self.session.game_type()
    }

    /// Total debited for the round, summed over stacked bets.
    pub fn wager(&self) -> u64 {
        self.session.stake()
    }
}

/// Result reported to callers after every accepted operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundUpdate {
    pub round_id: u64,
    pub game_type: GameType,
    pub state: RoundState,
    pub progress: Progress,
    pub winnings: Option<u64>,
    pub balance: u64,
}

/// Session-scoped round engine.
pub struct Engine {
    config: EngineConfig,
    ledger: Ledger,
    round: Option<Round>,
    next_round_id: u64,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let ledger = Ledger::new(config.starting_balance, config.history_capacity);
        Self {
            config,
            ledger,
            round: None,
            next_round_id: 1,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn balance(&self) -> u64 {
        self.ledger.balance()
    }

    /// Resolved rounds, most recent first.
    pub fn history(&self) -> &History {
        self.ledger.history()
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Outcome of the current round as generated so far.
    pub fn outcome(&self) -> Option<Outcome> {
        self.round
            .as_ref()
            .and_then(|round| game_outcome(&round.session).ok())
    }

    /// Check everything a round needs before any credit moves.
    ///
    /// Returns the total to debit: the per-bet amount times the number of bets.
    fn check_start(&self, config: &GameConfig, wager: &Wager) -> Result<u64, Error> {
        config
            .validate()
            .and_then(|_| config.validate_selections(&wager.selections))
            .map_err(|e| Error::InvalidConfiguration(e.to_string()))?;

        let allowed = &self.config.allowed_wagers;
        if wager.amount == 0 || (!allowed.is_empty() && !allowed.contains(&wager.amount)) {
            return Err(Error::InvalidWager(wager.amount));
        }
        wager.total().ok_or(Error::InvalidWager(wager.amount))
    }

    fn check_balance(&self, required: u64) -> Result<(), Error> {
        if !self.ledger.can_cover(required) {
            return Err(Error::InsufficientBalance {
                balance: self.ledger.balance(),
                required,
            });
        }
        Ok(())
    }

    /// Debit the wager and start a round.
    ///
    /// Single-shot games resolve before this returns; Mines and Diamonds stay
    /// [RoundState::Active] until a losing reveal, a cleared board, a cash out
    /// or [Engine::abandon].
    pub fn start_round(&mut self, config: GameConfig, wager: Wager) -> Result<RoundUpdate, Error> {
        if matches!(&self.round, Some(round) if round.state == RoundState::Active) {
            warn!(game = %config.game_type(), "round already active");
            return Err(Error::InvalidTransition("a round is already active"));
        }
        let total = match self
            .check_start(&config, &wager)
            .and_then(|total| self.check_balance(total).map(|_| total))
        {
            Ok(total) => total,
            Err(err) => {
                warn!(game = %config.game_type(), wager = wager.amount, ?err, "round rejected");
                return Err(err);
            }
        };

        let round_id = self.next_round_id;
        self.next_round_id += 1;
        let mut session = GameSession::new(round_id, config, &wager, now_ms());

        self.ledger.debit(total);
        debug!(
            round_id,
            game = %config.game_type(),
            wager = total,
            bets = wager.bets(),
            balance = self.ledger.balance(),
            "round started"
        );

        let mut rng = GameRng::new(&self.config.seed, round_id, 0);
        let result = match init_game(&mut session, &mut rng) {
            Ok(result) => result,
            Err(err) => {
                // Nothing was generated, so the wager goes back
                self.ledger.credit(total);
                warn!(round_id, ?err, "round failed to start");
                return Err(err.into());
            }
        };

        self.round = Some(Round {
            session,
            state: RoundState::Active,
            winnings: None,
        });
        self.apply_result(result)
    }

    fn active_round(&mut self, round_id: u64) -> Result<&mut Round, Error> {
        let round = self
            .round
            .as_mut()
            .filter(|round| round.id() == round_id)
            .ok_or(Error::RoundNotFound(round_id))?;
        if round.state != RoundState::Active {
            warn!(round_id, state = %round.state, "round is not active");
            return Err(Error::InvalidTransition("round is not active"));
        }
        Ok(round)
    }

    /// Apply one player action to an active round.
    pub fn apply_action(&mut self, round_id: u64, action: Action) -> Result<RoundUpdate, Error> {
        let seed = self.config.seed;
        let round = self.active_round(round_id)?;

        let move_number = round.session.move_count + 1;
        let mut rng = GameRng::new(&seed, round_id, move_number);
        let result = process_game_move(&mut round.session, action, &mut rng).map_err(|err| {
            warn!(round_id, ?action, ?err, "action rejected");
            Error::InvalidAction(err)
        })?;
        round.session.move_count = move_number;
        debug!(round_id, ?action, move_number, "action applied");

        self.apply_result(result)
    }

    /// Resolve an active round at its current multiplier.
    pub fn cash_out(&mut self, round_id: u64) -> Result<RoundUpdate, Error> {
        let round = self.active_round(round_id)?;
        let result = cash_out_game(&mut round.session).map_err(|err| {
            warn!(round_id, ?err, "cash out rejected");
            match err {
                GameError::InvalidMove => Error::InvalidTransition("cash out requires progress"),
                err => Error::InvalidAction(err),
            }
        })?;
        self.apply_result(result)
    }

    /// Quit an active round; the wager and any unclaimed winnings are forfeited.
    pub fn abandon(&mut self, round_id: u64) -> Result<RoundUpdate, Error> {
        self.active_round(round_id)?;
        self.resolve(RoundState::Abandoned, 0)
    }

    /// Play up to `count` single-shot rounds with the same configuration.
    ///
    /// The balance must cover every round up front. Play stops early if the
    /// balance can no longer cover the wager total.
    pub fn autoplay(
        &mut self,
        config: GameConfig,
        wager: Wager,
        count: u32,
    ) -> Result<Vec<RoundUpdate>, Error> {
        if config.game_type().is_progressive() {
            return Err(Error::InvalidConfiguration(format!(
                "{} cannot be autoplayed",
                config.game_type()
            )));
        }
        let total = self.check_start(&config, &wager)?;
        let required = total
            .checked_mul(count as u64)
            .ok_or(Error::InvalidWager(wager.amount))?;
        self.check_balance(required)?;

        let mut updates = Vec::with_capacity(count.min(MAX_PREALLOCATED_ROUNDS) as usize);
        for _ in 0..count {
            if !self.ledger.can_cover(total) {
                debug!(played = updates.len(), count, "autoplay stopped early");
                break;
            }
            updates.push(self.start_round(config, wager.clone())?);
        }
        Ok(updates)
    }

    /// Restore the starting balance and clear history and rounds.
    pub fn reset(&mut self) {
        self.ledger.reset(self.config.starting_balance);
        self.round = None;
        info!(balance = self.ledger.balance(), "session reset");
    }

    fn apply_result(&mut self, result: GameResult) -> Result<RoundUpdate, Error> {
        match result {
            GameResult::Continue => self.update(),
            GameResult::Win(winnings) => self.resolve(RoundState::Won, winnings),
            GameResult::Loss => self.resolve(RoundState::Lost, 0),
        }
    }

    /// Credit winnings, record history and close the round.
    fn resolve(&mut self, state: RoundState, winnings: u64) -> Result<RoundUpdate, Error> {
        let round = self
            .round
            .as_mut()
            .ok_or(Error::InvalidTransition("no round to resolve"))?;
        let outcome = game_outcome(&round.session)?;

        round.state = state;
        round.winnings = Some(winnings);
        round.session.is_complete = true;
        let entry = HistoryEntry {
            round_id: round.id(),
            game_type: round.game_type(),
            outcome,
            wager: round.wager(),
            winnings,
            timestamp: now_ms(),
        };

        self.ledger.credit(winnings);
        info!(
            round_id = entry.round_id,
            game = %entry.game_type,
            outcome = %entry.outcome,
            wager = entry.wager,
            winnings,
            balance = self.ledger.balance(),
            %state,
            "round resolved"
        );
        self.ledger.record(entry);
        self.update()
    }

    fn update(&self) -> Result<RoundUpdate, Error> {
        let round = self
            .round
            .as_ref()
            .ok_or(Error::InvalidTransition("no round"))?;
        let mut progress = game_progress(&round.session)?;
        if round.state.is_resolved() {
            progress.payout = 0;
        }
        Ok(RoundUpdate {
            round_id: round.id(),
            game_type: round.game_type(),
            state: round.state,
            progress,
            winnings: round.winnings,
            balance: self.ledger.balance(),
        })
    }
}
