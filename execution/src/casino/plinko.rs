//! Plinko game implementation.
//!
//! State blob format:
//! [rows:u8] [path:u16 BE]
//!
//! Bit `i` of `path` is set when the ball bounced right at peg row `i`. The
//! bucket is the number of right bounces (binomial over `0..=rows`). With the
//! default [SlotMapping::Edge] the slot is `max(0, bucket - 1)`, so both of the
//! two leftmost buckets pay the edge multiplier; [SlotMapping::Centered] shifts
//! the buckets so the middle bucket hits the middle of the 15-slot table.

use super::{CasinoGame, GameError, GameResult, GameRng, Multiplier};
use arcade_types::casino::{GameConfig, GameSession, Outcome, PinCount, SlotMapping, PLINKO_SLOTS};

const fn table(tenths: [u64; PLINKO_SLOTS]) -> [Multiplier; PLINKO_SLOTS] {
    let mut out = [Multiplier::ZERO; PLINKO_SLOTS];
    let mut i = 0;
    while i < PLINKO_SLOTS {
        out[i] = Multiplier::from_tenths(tenths[i]);
        i += 1;
    }
    out
}

const FOURTEEN_PINS: [Multiplier; PLINKO_SLOTS] = table([
    3530, 490, 140, 53, 21, 5, 2, 0, 2, 5, 21, 53, 140, 490, 3530,
]);

const TWELVE_PINS: [Multiplier; PLINKO_SLOTS] = table([
    550, 120, 56, 32, 16, 10, 7, 2, 7, 10, 16, 32, 56, 120, 550,
]);

const EIGHT_PINS: [Multiplier; PLINKO_SLOTS] = table([
    180, 32, 16, 13, 12, 11, 10, 5, 10, 11, 12, 13, 16, 32, 180,
]);

/// Multiplier table for a pin configuration, edges high and center low.
pub fn multipliers(pins: PinCount) -> &'static [Multiplier; PLINKO_SLOTS] {
    match pins {
        PinCount::Eight => &EIGHT_PINS,
        PinCount::Twelve => &TWELVE_PINS,
        PinCount::Fourteen => &FOURTEEN_PINS,
    }
}

/// Table slot for a bucket in `0..=rows`.
pub fn slot_for(rows: u8, bucket: u8, mapping: SlotMapping) -> u8 {
    match mapping {
        SlotMapping::Edge => bucket.saturating_sub(1),
        SlotMapping::Centered => {
            let offset = (PLINKO_SLOTS as u8).saturating_sub(rows + 1) / 2;
            bucket + offset
        }
    }
}

/// Multiplier paid when the ball lands in `bucket`.
pub fn payout_for(pins: PinCount, mapping: SlotMapping, bucket: u8) -> Multiplier {
    let slot = slot_for(pins.rows(), bucket, mapping) as usize;
    multipliers(pins)
        .get(slot)
        .copied()
        .unwrap_or(Multiplier::ZERO)
}

fn parse_state(state: &[u8]) -> Option<(u8, u16)> {
    if state.len() != 3 {
        return None;
    }
    let rows = state[0];
    let path = u16::from_be_bytes([state[1], state[2]]);
    if rows > 16 || (rows < 16 && path >> rows != 0) {
        return None;
    }
    Some((rows, path))
}

fn serialize_state(rows: u8, path: u16) -> Vec<u8> {
    let mut state = Vec::with_capacity(3);
    state.push(rows);
    state.extend_from_slice(&path.to_be_bytes());
    state
}

fn board(session: &GameSession) -> Result<(PinCount, SlotMapping), GameError> {
    match session.config {
        GameConfig::Plinko { pins, mapping } => Ok((pins, mapping)),
        _ => Err(GameError::InvalidState),
    }
}

pub struct Plinko;

impl CasinoGame for Plinko {
    fn init(session: &mut GameSession, rng: &mut GameRng) -> Result<GameResult, GameError> {
        let (pins, mapping) = board(session)?;
        let rows = pins.rows();

        let path = (0..rows).fold(0u16, |path, row| {
            if rng.next_bool() {
                path | (1 << row)
            } else {
                path
            }
        });
        session.state_blob = serialize_state(rows, path);
        session.is_complete = true;

        let bucket = path.count_ones() as u8;
        let winnings = payout_for(pins, mapping, bucket)
            .apply(session.bet)
            .ok_or(GameError::Overflow)?;
        if winnings == 0 {
            return Ok(GameResult::Loss);
        }
        Ok(GameResult::Win(winnings))
    }

    fn outcome(session: &GameSession) -> Result<Outcome, GameError> {
        let (_, mapping) = board(session)?;
        let (rows, path) = parse_state(&session.state_blob).ok_or(GameError::InvalidState)?;
        let bucket = path.count_ones() as u8;
        Ok(Outcome::Plinko {
            rows,
            path: (0..rows).map(|row| path & (1 << row) != 0).collect(),
            bucket,
            slot: slot_for(rows, bucket, mapping),
        })
    }
}
