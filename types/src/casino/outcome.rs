use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Color, GameType, Gem, NumberRange, Parity, SlotSymbol};

/// Randomly generated result a round's payout is computed from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum Outcome {
    Slots {
        reels: Vec<SlotSymbol>,
    },
    Mines {
        cells: u8,
        mines: Vec<u8>,
        revealed: Vec<u8>,
        /// Mine uncovered by the last reveal, if any.
        hit: Option<u8>,
    },
    Plinko {
        rows: u8,
        /// One entry per peg row, `true` when the ball bounced right.
        path: Vec<bool>,
        bucket: u8,
        slot: u8,
    },
    Diamonds {
        grid: Vec<Gem>,
        selected: Vec<u8>,
        last_match: Vec<u8>,
        matches: u32,
        score: u64,
    },
    DreamCatcher {
        segment: u8,
    },
    Roulette {
        number: u8,
        color: Color,
        /// Absent for zero, like `range`.
        parity: Option<Parity>,
        range: Option<NumberRange>,
    },
}

impl Outcome {
    /// Classified roulette result for `number`.
    pub fn roulette(number: u8) -> Self {
        Outcome::Roulette {
            number,
            color: Color::of(number),
            parity: Parity::of(number),
            range: NumberRange::of(number),
        }
    }

    pub fn game_type(&self) -> GameType {
        match self {
            Outcome::Slots { .. } => GameType::Slots,
            Outcome::Mines { .. } => GameType::Mines,
            Outcome::Plinko { .. } => GameType::Plinko,
            Outcome::Diamonds { .. } => GameType::Diamonds,
            Outcome::DreamCatcher { .. } => GameType::DreamCatcher,
            Outcome::Roulette { .. } => GameType::Roulette,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Slots { reels } => {
                let glyphs: Vec<&str> = reels.iter().map(|s| s.glyph()).collect();
                write!(f, "{}", glyphs.join(" "))
            }
            Outcome::Mines { revealed, hit, .. } => match hit {
                Some(cell) => {
                    let safe = revealed.len().saturating_sub(1);
                    write!(f, "mine at {} after {} safe", cell, safe)
                }
                None => write!(f, "{} safe revealed", revealed.len()),
            },
            Outcome::Plinko { rows, slot, .. } => write!(f, "slot {} of {} rows", slot, rows),
            Outcome::Diamonds { matches, score, .. } => {
                write!(f, "{} matches for {} credits", matches, score)
            }
            Outcome::DreamCatcher { segment } => write!(f, "segment {}", segment),
            Outcome::Roulette {
                number,
                color,
                parity,
                range,
            } => {
                write!(f, "{} {:?}", number, color)?;
                if let Some(parity) = parity {
                    write!(f, " {:?}", parity)?;
                }
                if let Some(range) = range {
                    write!(f, " {:?}", range)?;
                }
                Ok(())
            }
        }
    }
}
