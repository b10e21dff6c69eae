//! DreamCatcher wheel implementation.
//!
//! State blob format:
//! [segment:u8]
//!
//! The wheel has eight segments, each landing with equal probability. Every
//! segment pays at least 1x, so the wager always comes back.

use super::{CasinoGame, GameError, GameResult, GameRng, Multiplier};
use arcade_types::casino::{GameSession, Outcome, WHEEL_SEGMENTS};

/// Multiplier printed on each segment, clockwise from the top.
pub const SEGMENTS: [Multiplier; WHEEL_SEGMENTS as usize] = [
    Multiplier::from_int(1),
    Multiplier::from_int(2),
    Multiplier::from_int(5),
    Multiplier::from_int(10),
    Multiplier::from_int(2),
    Multiplier::from_int(5),
    Multiplier::from_int(1),
    Multiplier::from_int(3),
];

pub fn payout_for(segment: u8) -> Multiplier {
    SEGMENTS
        .get(segment as usize)
        .copied()
        .unwrap_or(Multiplier::ZERO)
}

pub struct DreamCatcher;

impl CasinoGame for DreamCatcher {
    fn init(session: &mut GameSession, rng: &mut GameRng) -> Result<GameResult, GameError> {
        let segment = rng.next_bounded(WHEEL_SEGMENTS);
        session.state_blob = vec![segment];
        session.is_complete = true;

        let winnings = payout_for(segment)
            .apply(session.bet)
            .ok_or(GameError::Overflow)?;
        Ok(GameResult::Win(winnings))
    }

    fn outcome(session: &GameSession) -> Result<Outcome, GameError> {
        match session.state_blob.as_slice() {
            [segment] if *segment < WHEEL_SEGMENTS => Ok(Outcome::DreamCatcher {
                segment: *segment,
            }),
            _ => Err(GameError::InvalidState),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{create_seed, create_session};
    use arcade_types::casino::GameConfig;

    #[test]
    fn test_payout_table() {
        assert_eq!(payout_for(3), Multiplier::from_int(10));
        assert_eq!(payout_for(7), Multiplier::from_int(3));
        assert_eq!(payout_for(8), Multiplier::ZERO);
        assert!(SEGMENTS.iter().all(|m| *m >= Multiplier::ONE));
    }

    #[test]
    fn test_spin_always_returns_wager() {
        let seed = create_seed(1);
        let mut seen = [false; WHEEL_SEGMENTS as usize];
        for round_id in 1..200 {
            let mut session = create_session(GameConfig::DreamCatcher, 5_000, round_id);
            let mut rng = GameRng::new(&seed, round_id, 0);
            let result = DreamCatcher::init(&mut session, &mut rng).unwrap();
            assert!(session.is_complete);

            let Outcome::DreamCatcher { segment } = DreamCatcher::outcome(&session).unwrap() else {
                panic!("expected dream catcher outcome");
            };
            seen[segment as usize] = true;
            let expected = payout_for(segment).apply(5_000).unwrap();
            assert_eq!(result, GameResult::Win(expected));
            assert!(expected >= 5_000);
        }
        assert!(seen.iter().all(|s| *s));
    }
}
