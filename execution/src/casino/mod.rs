//! Game execution module.
//!
//! This module contains the outcome generators and payout rules for every
//! arcade game:
//! - Slots
//! - Mines
//! - Plinko
//! - Diamonds
//! - DreamCatcher
//! - Roulette

pub mod diamonds;
pub mod dream_catcher;
#[cfg(test)]
mod integration_tests;
pub mod mines;
pub mod payout;
pub mod plinko;
pub mod roulette;
pub mod slots;

pub use payout::{Multiplier, BASE_MULTIPLIER};

use arcade_types::casino::{Action, GameSession, GameType, Outcome};
use arcade_types::Seed;
use commonware_codec::Encode;
use commonware_cryptography::sha256::Sha256;
use commonware_cryptography::Hasher;
use thiserror::Error;

/// Deterministic random number generator for outcome generation.
///
/// Uses SHA256 hash chains to generate random numbers deterministically
/// from the session seed, so a round can be replayed from its seed,
/// round id and move number.
#[derive(Clone)]
pub struct GameRng {
    state: [u8; 32],
    index: usize,
}

impl GameRng {
    /// Create a new RNG from a seed, round ID, and move number.
    pub fn new(seed: &Seed, round_id: u64, move_number: u32) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed.encode().as_ref());
        hasher.update(&round_id.to_be_bytes());
        hasher.update(&move_number.to_be_bytes());
        Self {
            state: hasher.finalize().0,
            index: 0,
        }
    }

    /// Get the next random byte.
    fn next_byte(&mut self) -> u8 {
        if self.index >= 32 {
            // Rehash to get more bytes
            let mut hasher = Sha256::new();
            hasher.update(&self.state);
            self.state = hasher.finalize().0;
            self.index = 0;
        }
        let result = self.state[self.index];
        self.index += 1;
        result
    }

    /// Get a random u8 value.
    pub fn next_u8(&mut self) -> u8 {
        self.next_byte()
    }

    /// Get a random value in range [0, max).
    pub fn next_bounded(&mut self, max: u8) -> u8 {
        if max == 0 {
            return 0;
        }
        // Simple rejection sampling for unbiased distribution
        let limit = u8::MAX - (u8::MAX % max);
        loop {
            let value = self.next_u8();
            if value < limit {
                return value % max;
            }
        }
    }

    /// Fair coin flip.
    pub fn next_bool(&mut self) -> bool {
        self.next_u8() & 1 == 1
    }

    /// Pick one element uniformly.
    pub fn choose<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_bounded(items.len() as u8) as usize;
        items.get(idx).copied()
    }

    /// Shuffle a slice in place using Fisher-Yates.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_bounded((i + 1) as u8) as usize;
            slice.swap(i, j);
        }
    }

    /// Pick `count` distinct cells out of `0..cells`, returned as a bit-set.
    pub fn sample_cells(&mut self, cells: u8, count: u8) -> u64 {
        let mut all: Vec<u8> = (0..cells).collect();
        self.shuffle(&mut all);
        all.iter()
            .take(count as usize)
            .fold(0u64, |mask, cell| mask | (1u64 << cell))
    }
}

/// Result of processing a game move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Game is still in progress, state updated.
    Continue,
    /// Game completed with a win. Value is credits returned (TOTAL RETURN: stake + profit).
    Win(u64),
    /// Game completed with a loss.
    Loss,
}

/// Error during game execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Action or selection does not fit this game.
    #[error("invalid payload")]
    InvalidPayload,
    /// Invalid move for current game state.
    #[error("invalid move")]
    InvalidMove,
    /// Game session has already completed.
    #[error("game already complete")]
    GameAlreadyComplete,
    /// Invalid game state or corrupted state blob.
    #[error("invalid state")]
    InvalidState,
    /// Payout does not fit in a credit balance.
    #[error("payout overflow")]
    Overflow,
}

/// Snapshot of a progressive round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    /// Safe reveals (Mines) or matches (Diamonds) so far.
    pub steps: u32,
    /// Credits a cash out would return right now, 0 if cash out is not allowed yet.
    pub payout: u64,
}

/// Trait for game implementations.
pub trait CasinoGame {
    /// Initialize game state after the wager is debited.
    /// Single-shot games resolve here.
    fn init(session: &mut GameSession, rng: &mut GameRng) -> Result<GameResult, GameError>;

    /// Process a player action.
    /// Updates the session state and returns the result.
    fn process_move(
        _session: &mut GameSession,
        _action: Action,
        _rng: &mut GameRng,
    ) -> Result<GameResult, GameError> {
        Err(GameError::InvalidPayload)
    }

    /// Resolve the round at its current multiplier.
    fn cash_out(_session: &mut GameSession) -> Result<GameResult, GameError> {
        Err(GameError::InvalidMove)
    }

    /// Outcome recorded so far.
    fn outcome(session: &GameSession) -> Result<Outcome, GameError>;

    fn progress(_session: &GameSession) -> Result<Progress, GameError> {
        Ok(Progress::default())
    }
}

macro_rules! dispatch {
    ($session:expr, $method:ident($($arg:expr),*)) => {
        match $session.game_type() {
            GameType::Slots => slots::Slots::$method($($arg),*),
            GameType::Mines => mines::Mines::$method($($arg),*),
            GameType::Plinko => plinko::Plinko::$method($($arg),*),
            GameType::Diamonds => diamonds::Diamonds::$method($($arg),*),
            GameType::DreamCatcher => dream_catcher::DreamCatcher::$method($($arg),*),
            GameType::Roulette => roulette::Roulette::$method($($arg),*),
        }
    };
}

/// Dispatch game initialization to the appropriate game module.
pub fn init_game(session: &mut GameSession, rng: &mut GameRng) -> Result<GameResult, GameError> {
    dispatch!(session, init(session, rng))
}

/// Dispatch an action to the appropriate game module.
pub fn process_game_move(
    session: &mut GameSession,
    action: Action,
    rng: &mut GameRng,
) -> Result<GameResult, GameError> {
    if session.is_complete {
        return Err(GameError::GameAlreadyComplete);
    }
    dispatch!(session, process_move(session, action, rng))
}

/// Dispatch a cash out to the appropriate game module.
pub fn cash_out_game(session: &mut GameSession) -> Result<GameResult, GameError> {
    if session.is_complete {
        return Err(GameError::GameAlreadyComplete);
    }
    dispatch!(session, cash_out(session))
}

/// Decode the outcome from a session's state.
pub fn game_outcome(session: &GameSession) -> Result<Outcome, GameError> {
    dispatch!(session, outcome(session))
}

/// Current progress of a session.
pub fn game_progress(session: &GameSession) -> Result<Progress, GameError> {
    dispatch!(session, progress(session))
}
