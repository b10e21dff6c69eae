use serde::{Deserialize, Serialize};
use std::fmt;

use super::{GameConfig, GameType, Selection};

/// Credits staked on a round, plus the bets for games that need them.
///
/// Roulette stacks up to [MAX_BETS](super::MAX_BETS) bets on one spin, each staking `amount`.
/// Every other game takes a single unlabeled stake.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wager {
    /// Credits staked per bet.
    pub amount: u64,
    #[serde(default)]
    pub selections: Vec<Selection>,
}

impl Wager {
    pub fn new(amount: u64) -> Self {
        Self {
            amount,
            selections: vec![],
        }
    }

    pub fn with_selection(amount: u64, selection: Selection) -> Self {
        Self::with_selections(amount, vec![selection])
    }

    pub fn with_selections(amount: u64, selections: Vec<Selection>) -> Self {
        Self { amount, selections }
    }

    /// Number of stakes the wager places (at least one).
    pub fn bets(&self) -> u64 {
        self.selections.len().max(1) as u64
    }

    /// Credits debited when the round starts, `None` on overflow.
    pub fn total(&self) -> Option<u64> {
        self.amount.checked_mul(self.bets())
    }
}

/// Lifecycle of a round once it has left Idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    /// Awaiting player actions (Mines, Diamonds).
    Active,
    /// Resolved with a credit to the balance.
    Won,
    /// Resolved with nothing returned.
    Lost,
    /// Quit before cash out; the wager is forfeited.
    Abandoned,
}

impl RoundState {
    pub fn is_resolved(self) -> bool {
        !matches!(self, RoundState::Active)
    }
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundState::Active => "active",
            RoundState::Won => "won",
            RoundState::Lost => "lost",
            RoundState::Abandoned => "abandoned",
        };
        f.write_str(name)
    }
}

/// Game-side view of a round.
///
/// Each game keeps its private progress in `state_blob`, encoded with the
/// workspace codec, so the engine can drive every variant through one type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSession {
    pub id: u64,
    pub config: GameConfig,
    /// Credits staked per bet.
    pub bet: u64,
    pub selections: Vec<Selection>,
    pub state_blob: Vec<u8>,
    pub move_count: u32,
    pub created_at: u64,
    pub is_complete: bool,
}

impl GameSession {
    pub fn new(id: u64, config: GameConfig, wager: &Wager, created_at: u64) -> Self {
        Self {
            id,
            config,
            bet: wager.amount,
            selections: wager.selections.clone(),
            state_blob: vec![],
            move_count: 0,
            created_at,
            is_complete: false,
        }
    }

    pub fn game_type(&self) -> GameType {
        self.config.game_type()
    }

    /// Credits the round took from the balance.
    pub fn stake(&self) -> u64 {
        self.bet.saturating_mul(self.selections.len().max(1) as u64)
    }
}
