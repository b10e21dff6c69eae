//! Diamonds game implementation.
//!
//! State blob format (commonware codec):
//! [cells:u8] [grid:Gem×cells] [selected:u64] [last_match:u64] [matches:u32] [score:u64]
//!
//! The grid is filled with uniformly drawn gems. Each `Select` toggles a cell
//! in the current selection; once the selection holds at least three cells of
//! a single gem it scores `count * 5000 * difficulty` credits, the matched
//! cells are redrawn and the selection is cleared. Cashing out returns the
//! wager plus the accumulated score.

use super::{CasinoGame, GameError, GameResult, GameRng, Multiplier, Progress};
use arcade_types::casino::{
    Action, Difficulty, GameConfig, GameSession, Gem, Outcome, DIAMONDS_BASE_UNIT, MIN_MATCH,
};
use bytes::{Buf, BufMut};
use commonware_codec::{DecodeExt, Encode, EncodeSize, Error, FixedSize, Read, ReadExt, Write};

/// Score multiplier for a difficulty level.
pub fn difficulty_multiplier(difficulty: Difficulty) -> Multiplier {
    match difficulty {
        Difficulty::Easy => Multiplier::ONE,
        Difficulty::Medium => Multiplier::from_tenths(15),
        Difficulty::Hard => Multiplier::from_int(2),
    }
}

/// Credits scored by a match of `count` gems.
pub fn match_bonus(count: u32, difficulty: Difficulty) -> Option<u64> {
    let base = DIAMONDS_BASE_UNIT.checked_mul(count as u64)?;
    difficulty_multiplier(difficulty).apply(base)
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct State {
    grid: Vec<Gem>,
    selected: u64,
    last_match: u64,
    matches: u32,
    score: u64,
}

impl State {
    fn cells_in(&self, mask: u64) -> Vec<u8> {
        (0..self.grid.len() as u8)
            .filter(|c| mask & (1u64 << c) != 0)
            .collect()
    }

    /// Gem shared by every selected cell, if the selection is a match.
    fn matched_gem(&self) -> Option<Gem> {
        if (self.selected.count_ones() as usize) < MIN_MATCH {
            return None;
        }
        let mut gems = self.cells_in(self.selected).into_iter().map(|c| self.grid[c as usize]);
        let first = gems.next()?;
        gems.all(|gem| gem == first).then_some(first)
    }
}

impl Write for State {
    fn write(&self, writer: &mut impl BufMut) {
        (self.grid.len() as u8).write(writer);
        for gem in &self.grid {
            gem.write(writer);
        }
        self.selected.write(writer);
        self.last_match.write(writer);
        self.matches.write(writer);
        self.score.write(writer);
    }
}

impl Read for State {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let cells = u8::read(reader)?;
        if cells == 0 || cells > 64 {
            return Err(Error::Invalid("Diamonds", "grid size"));
        }
        let grid = (0..cells)
            .map(|_| Gem::read(reader))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            grid,
            selected: u64::read(reader)?,
            last_match: u64::read(reader)?,
            matches: u32::read(reader)?,
            score: u64::read(reader)?,
        })
    }
}

impl EncodeSize for State {
    fn encode_size(&self) -> usize {
        u8::SIZE + self.grid.len() * Gem::SIZE + u64::SIZE * 2 + u32::SIZE + u64::SIZE
    }
}

fn load(session: &GameSession) -> Result<State, GameError> {
    State::decode(session.state_blob.as_slice()).map_err(|_| GameError::InvalidState)
}

fn store(session: &mut GameSession, state: &State) {
    session.state_blob = state.encode().to_vec();
}

fn difficulty(session: &GameSession) -> Result<Difficulty, GameError> {
    match session.config {
        GameConfig::Diamonds { difficulty, .. } => Ok(difficulty),
        _ => Err(GameError::InvalidState),
    }
}

fn draw_gem(rng: &mut GameRng) -> Result<Gem, GameError> {
    rng.choose(&Gem::ALL).ok_or(GameError::InvalidState)
}

pub struct Diamonds;

impl CasinoGame for Diamonds {
    fn init(session: &mut GameSession, rng: &mut GameRng) -> Result<GameResult, GameError> {
        let GameConfig::Diamonds { board, .. } = session.config else {
            return Err(GameError::InvalidState);
        };
        let grid = (0..board.cells())
            .map(|_| draw_gem(rng))
            .collect::<Result<Vec<_>, _>>()?;
        let state = State {
            grid,
            selected: 0,
            last_match: 0,
            matches: 0,
            score: 0,
        };
        store(session, &state);
        Ok(GameResult::Continue)
    }

    fn process_move(
        session: &mut GameSession,
        action: Action,
        rng: &mut GameRng,
    ) -> Result<GameResult, GameError> {
        let Action::Select(cell) = action else {
            return Err(GameError::InvalidPayload);
        };
        let difficulty = difficulty(session)?;
        let mut state = load(session)?;
        if cell as usize >= state.grid.len() {
            return Err(GameError::InvalidPayload);
        }

        state.selected ^= 1u64 << cell;
        if state.matched_gem().is_some() {
            let matched = state.cells_in(state.selected);
            let bonus =
                match_bonus(matched.len() as u32, difficulty).ok_or(GameError::Overflow)?;
            state.score = state.score.checked_add(bonus).ok_or(GameError::Overflow)?;
            state.matches += 1;

            // Matched cells are redrawn in place
            for c in &matched {
                state.grid[*c as usize] = draw_gem(rng)?;
            }
            state.last_match = state.selected;
            state.selected = 0;
        }

        store(session, &state);
        Ok(GameResult::Continue)
    }

    fn cash_out(session: &mut GameSession) -> Result<GameResult, GameError> {
        let state = load(session)?;
        if state.matches == 0 {
            return Err(GameError::InvalidMove);
        }
        let winnings = session
            .bet
            .checked_add(state.score)
            .ok_or(GameError::Overflow)?;
        session.is_complete = true;
        Ok(GameResult::Win(winnings))
    }

    fn outcome(session: &GameSession) -> Result<Outcome, GameError> {
        let state = load(session)?;
        Ok(Outcome::Diamonds {
            selected: state.cells_in(state.selected),
            last_match: state.cells_in(state.last_match),
            matches: state.matches,
            score: state.score,
            grid: state.grid,
        })
    }

    fn progress(session: &GameSession) -> Result<Progress, GameError> {
        let state = load(session)?;
        let payout = if state.matches == 0 {
            0
        } else {
            session.bet.saturating_add(state.score)
        };
        Ok(Progress {
            steps: state.matches,
            payout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{create_seed, create_session};
    use arcade_types::casino::BoardSize;

    fn start(round_id: u64, board: BoardSize, difficulty: Difficulty) -> GameSession {
        let seed = create_seed(1);
        let mut session =
            create_session(GameConfig::Diamonds { board, difficulty }, 10_000, round_id);
        let mut rng = GameRng::new(&seed, round_id, 0);
        assert_eq!(Diamonds::init(&mut session, &mut rng), Ok(GameResult::Continue));
        session
    }

    fn select(session: &mut GameSession, cell: u8) -> Result<GameResult, GameError> {
        session.move_count += 1;
        let mut rng = GameRng::new(&create_seed(1), session.id, session.move_count);
        Diamonds::process_move(session, Action::Select(cell), &mut rng)
    }

    fn grid(session: &GameSession) -> Vec<Gem> {
        let Outcome::Diamonds { grid, .. } = Diamonds::outcome(session).unwrap() else {
            panic!("expected diamonds outcome");
        };
        grid
    }

    /// First three cells sharing a gem (16 cells over 4 gems always has one).
    fn triple(grid: &[Gem]) -> Vec<u8> {
        for gem in Gem::ALL {
            let cells: Vec<u8> = (0..grid.len() as u8)
                .filter(|c| grid[*c as usize] == gem)
                .collect();
            if cells.len() >= 3 {
                return cells[..3].to_vec();
            }
        }
        panic!("pigeonhole guarantees a triple");
    }

    #[test]
    fn test_match_bonus() {
        assert_eq!(match_bonus(3, Difficulty::Easy), Some(15_000));
        assert_eq!(match_bonus(3, Difficulty::Medium), Some(22_500));
        assert_eq!(match_bonus(3, Difficulty::Hard), Some(30_000));
        assert_eq!(match_bonus(4, Difficulty::Easy), Some(20_000));
    }

    #[test]
    fn test_grid_sizes() {
        for (board, cells) in [
            (BoardSize::Four, 16),
            (BoardSize::Five, 25),
            (BoardSize::Six, 36),
        ] {
            let session = start(1, board, Difficulty::Easy);
            assert_eq!(grid(&session).len(), cells);
        }
    }

    #[test]
    fn test_match_scores_and_redraws() {
        for round_id in 1..30 {
            let mut session = start(round_id, BoardSize::Four, Difficulty::Medium);
            let cells = triple(&grid(&session));

            assert_eq!(select(&mut session, cells[0]), Ok(GameResult::Continue));
            assert_eq!(select(&mut session, cells[1]), Ok(GameResult::Continue));
            assert_eq!(Diamonds::progress(&session).unwrap(), Progress::default());
            assert_eq!(select(&mut session, cells[2]), Ok(GameResult::Continue));

            let Outcome::Diamonds {
                selected,
                last_match,
                matches,
                score,
                ..
            } = Diamonds::outcome(&session).unwrap()
            else {
                panic!("expected diamonds outcome");
            };
            assert!(selected.is_empty());
            assert_eq!(last_match, cells);
            assert_eq!(matches, 1);
            assert_eq!(score, 22_500);
            assert!(!session.is_complete);

            let progress = Diamonds::progress(&session).unwrap();
            assert_eq!(progress.steps, 1);
            assert_eq!(progress.payout, 32_500);
        }
    }

    #[test]
    fn test_mismatch_keeps_selection() {
        let mut session = start(5, BoardSize::Four, Difficulty::Easy);
        let grid = grid(&session);
        let a = 0u8;
        let b = (1..16u8)
            .find(|c| grid[*c as usize] != grid[0])
            .expect("grid with a single gem");
        let c = (1..16u8).find(|c| *c != b).unwrap();

        select(&mut session, a).unwrap();
        select(&mut session, b).unwrap();
        select(&mut session, c).unwrap();
        let Outcome::Diamonds {
            selected, matches, ..
        } = Diamonds::outcome(&session).unwrap()
        else {
            panic!("expected diamonds outcome");
        };
        assert_eq!(selected.len(), 3);
        assert_eq!(matches, 0);

        // Toggling removes a cell from the selection
        select(&mut session, b).unwrap();
        let Outcome::Diamonds { selected, .. } = Diamonds::outcome(&session).unwrap() else {
            panic!("expected diamonds outcome");
        };
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_cash_out() {
        let mut session = start(9, BoardSize::Four, Difficulty::Hard);
        assert_eq!(Diamonds::cash_out(&mut session), Err(GameError::InvalidMove));

        for cell in triple(&grid(&session)) {
            select(&mut session, cell).unwrap();
        }
        assert_eq!(Diamonds::cash_out(&mut session), Ok(GameResult::Win(40_000)));
        assert!(session.is_complete);
    }

    #[test]
    fn test_invalid_actions() {
        let mut session = start(2, BoardSize::Four, Difficulty::Easy);
        assert_eq!(select(&mut session, 16), Err(GameError::InvalidPayload));
        let mut rng = GameRng::new(&create_seed(1), session.id, 9);
        assert_eq!(
            Diamonds::process_move(&mut session, Action::Reveal(0), &mut rng),
            Err(GameError::InvalidPayload)
        );
    }
}
