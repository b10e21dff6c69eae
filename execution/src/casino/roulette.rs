//! Single-zero roulette implementation.
//!
//! State blob format (commonware codec):
//! [result:u8] [count:u8] [Selection × count]
//!
//! A spin carries every bet stacked on the wager, each staking the same amount:
//! Straight (number 0-36) returns 37x
//! Red, Black, Even, Odd, Low (1-18), High (19-36) return 2x
//! Dozen (number 0/1/2) and Column (number 0/1/2) return 3x
//!
//! Zero loses every bet except a straight bet on 0. The round returns the sum
//! of every winning bet's return.

use super::{CasinoGame, GameError, GameResult, GameRng, Multiplier};
use arcade_types::casino::{
    BetType, Color, GameSession, Outcome, Selection, MAX_BETS, ROULETTE_POCKETS,
};
use bytes::{Buf, BufMut};
use commonware_codec::{DecodeExt, Encode, EncodeSize, Error, FixedSize, Read, ReadExt, Write};

/// Check if a bet wins for a given result.
pub fn bet_wins(bet_type: BetType, bet_number: u8, result: u8) -> bool {
    // Zero loses all except straight bet on 0
    if result == 0 {
        return bet_type == BetType::Straight && bet_number == 0;
    }

    match bet_type {
        BetType::Straight => bet_number == result,
        BetType::Red => Color::of(result) == Color::Red,
        BetType::Black => Color::of(result) == Color::Black,
        BetType::Even => result % 2 == 0,
        BetType::Odd => result % 2 == 1,
        BetType::Low => (1..=18).contains(&result),
        BetType::High => (19..=36).contains(&result),
        BetType::Dozen => (result - 1) / 12 == bet_number,
        BetType::Column => (result - 1) % 3 == bet_number,
    }
}

/// Total return for a winning bet (includes the original bet).
pub fn payout_multiplier(bet_type: BetType) -> Multiplier {
    match bet_type {
        BetType::Straight => Multiplier::from_int(37),
        BetType::Red
        | BetType::Black
        | BetType::Even
        | BetType::Odd
        | BetType::Low
        | BetType::High => Multiplier::from_int(2),
        BetType::Dozen | BetType::Column => Multiplier::from_int(3),
    }
}

/// Multiplier for `selection` when the wheel lands on `result`.
pub fn payout_for(selection: &Selection, result: u8) -> Multiplier {
    if bet_wins(selection.bet_type, selection.number, result) {
        payout_multiplier(selection.bet_type)
    } else {
        Multiplier::ZERO
    }
}

/// Summed return of every bet staking `amount` when the wheel lands on `result`.
pub fn total_return(selections: &[Selection], amount: u64, result: u8) -> Option<u64> {
    selections.iter().try_fold(0u64, |total, selection| {
        total.checked_add(payout_for(selection, result).apply(amount)?)
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct State {
    result: u8,
    bets: Vec<Selection>,
}

impl Write for State {
    fn write(&self, writer: &mut impl BufMut) {
        self.result.write(writer);
        (self.bets.len() as u8).write(writer);
        for bet in &self.bets {
            bet.write(writer);
        }
    }
}

impl Read for State {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let result = u8::read(reader)?;
        if result >= ROULETTE_POCKETS {
            return Err(Error::Invalid("Roulette", "result"));
        }
        let count = u8::read(reader)? as usize;
        if count == 0 || count > MAX_BETS {
            return Err(Error::Invalid("Roulette", "bet count"));
        }
        let bets = (0..count)
            .map(|_| Selection::read(reader))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { result, bets })
    }
}

impl EncodeSize for State {
    fn encode_size(&self) -> usize {
        u8::SIZE + u8::SIZE + self.bets.len() * Selection::SIZE
    }
}

fn load(session: &GameSession) -> Result<State, GameError> {
    State::decode(session.state_blob.as_slice()).map_err(|_| GameError::InvalidState)
}

/// Store the spin result and resolve the round.
pub(crate) fn settle(session: &mut GameSession, result: u8) -> Result<GameResult, GameError> {
    let bets = session.selections.clone();
    if bets.is_empty() || bets.len() > MAX_BETS {
        return Err(GameError::InvalidPayload);
    }
    for bet in &bets {
        bet.validate().map_err(|_| GameError::InvalidPayload)?;
    }
    let winnings = total_return(&bets, session.bet, result).ok_or(GameError::Overflow)?;

    session.state_blob = State { result, bets }.encode().to_vec();
    session.is_complete = true;
    if winnings == 0 {
        return Ok(GameResult::Loss);
    }
    Ok(GameResult::Win(winnings))
}

pub struct Roulette;

impl CasinoGame for Roulette {
    fn init(session: &mut GameSession, rng: &mut GameRng) -> Result<GameResult, GameError> {
        if session.selections.is_empty() {
            return Err(GameError::InvalidPayload);
        }
        let result = rng.next_bounded(ROULETTE_POCKETS);
        settle(session, result)
    }

    fn outcome(session: &GameSession) -> Result<Outcome, GameError> {
        let state = load(session)?;
        Ok(Outcome::roulette(state.result))
    }
}
