//! Slots game implementation.
//!
//! State blob format (commonware codec):
//! [reel:SlotSymbol × 3]
//!
//! Three reels are drawn uniformly from six symbols. The round wins only when
//! every reel shows the same symbol, returning the wager times that symbol's
//! multiplier.

use super::{CasinoGame, GameError, GameResult, GameRng, Multiplier};
use arcade_types::casino::{GameSession, Outcome, SlotSymbol, SLOT_REELS};
use bytes::{Buf, BufMut};
use commonware_codec::{DecodeExt, Encode, EncodeSize, Error, FixedSize, Read, ReadExt, Write};

/// Multiplier paid for three of a kind.
pub fn symbol_multiplier(symbol: SlotSymbol) -> Multiplier {
    match symbol {
        SlotSymbol::Cherry => Multiplier::from_int(2),
        SlotSymbol::Orange => Multiplier::from_int(3),
        SlotSymbol::Lemon => Multiplier::from_int(4),
        SlotSymbol::Grape => Multiplier::from_int(5),
        SlotSymbol::Diamond => Multiplier::from_int(10),
        SlotSymbol::Crown => Multiplier::from_int(20),
    }
}

/// Multiplier for a full set of reels, zero unless all match.
pub fn payout_for(reels: &[SlotSymbol]) -> Multiplier {
    match reels.split_first() {
        Some((first, rest)) if rest.iter().all(|s| s == first) => symbol_multiplier(*first),
        _ => Multiplier::ZERO,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct State {
    reels: Vec<SlotSymbol>,
}

impl Write for State {
    fn write(&self, writer: &mut impl BufMut) {
        for reel in &self.reels {
            reel.write(writer);
        }
    }
}

impl Read for State {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let reels = (0..SLOT_REELS)
            .map(|_| SlotSymbol::read(reader))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { reels })
    }
}

impl EncodeSize for State {
    fn encode_size(&self) -> usize {
        self.reels.len() * SlotSymbol::SIZE
    }
}

/// Store the reels and resolve the round.
pub(crate) fn settle(
    session: &mut GameSession,
    reels: &[SlotSymbol],
) -> Result<GameResult, GameError> {
    let multiplier = payout_for(reels);
    let winnings = multiplier.apply(session.bet).ok_or(GameError::Overflow)?;

    let state = State {
        reels: reels.to_vec(),
    };
    session.state_blob = state.encode().to_vec();
    session.is_complete = true;
    if winnings == 0 {
        return Ok(GameResult::Loss);
    }
    Ok(GameResult::Win(winnings))
}

pub struct Slots;

impl CasinoGame for Slots {
    fn init(session: &mut GameSession, rng: &mut GameRng) -> Result<GameResult, GameError> {
        let reels: Vec<SlotSymbol> = (0..SLOT_REELS)
            .map(|_| rng.choose(&SlotSymbol::ALL).ok_or(GameError::InvalidState))
            .collect::<Result<_, _>>()?;
        settle(session, &reels)
    }

    fn outcome(session: &GameSession) -> Result<Outcome, GameError> {
        let state =
            State::decode(session.state_blob.as_slice()).map_err(|_| GameError::InvalidState)?;
        Ok(Outcome::Slots {
            reels: state.reels,
        })
    }
}
