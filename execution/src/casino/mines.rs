//! Mines game implementation.
//!
//! State blob format (commonware codec):
//! [cells:u8] [mine_mask:u64] [revealed_mask:u64] [hit:Option<u8>]
//!
//! Mines are placed uniformly without replacement when the round starts.
//! Each safe reveal adds a 0.1x step to the multiplier, starting from 1.0x.
//! Revealing every safe tile doubles the final multiplier and resolves the
//! round; hitting a mine loses the wager.
//!
//! Actions:
//! Reveal(cell) - uncover a tile (0-based, row-major)
//! Cash out - lock in the current multiplier (needs at least one safe reveal)

use super::{CasinoGame, GameError, GameResult, GameRng, Multiplier, Progress};
use arcade_types::casino::{Action, GameConfig, GameSession, Outcome};
use bytes::{Buf, BufMut};
use commonware_codec::{DecodeExt, Encode, EncodeSize, Error, FixedSize, Read, ReadExt, Write};

/// Multiplier added per safe reveal (0.1x).
pub const STEP_BONUS: Multiplier = Multiplier::from_bps(1_000);

/// Factor applied when the board is cleared.
pub const CLEAR_BONUS: u64 = 2;

/// Multiplier after `safe` reveals, with the clear bonus when `cleared`.
pub fn multiplier(safe: u32, cleared: bool) -> Multiplier {
    let steps = STEP_BONUS.bps().saturating_mul(safe as u64);
    let base = Multiplier::from_bps(Multiplier::ONE.bps().saturating_add(steps));
    if cleared {
        Multiplier::from_bps(base.bps().saturating_mul(CLEAR_BONUS))
    } else {
        base
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct State {
    cells: u8,
    mine_mask: u64,
    revealed_mask: u64,
    hit: Option<u8>,
}

impl State {
    fn mines(&self) -> u32 {
        self.mine_mask.count_ones()
    }

    fn safe_revealed(&self) -> u32 {
        (self.revealed_mask & !self.mine_mask).count_ones()
    }

    fn safe_total(&self) -> u32 {
        self.cells as u32 - self.mines()
    }

    fn cleared(&self) -> bool {
        self.safe_revealed() == self.safe_total()
    }

    fn cells_in(&self, mask: u64) -> Vec<u8> {
        (0..self.cells).filter(|c| mask & (1u64 << c) != 0).collect()
    }
}

impl Write for State {
    fn write(&self, writer: &mut impl BufMut) {
        self.cells.write(writer);
        self.mine_mask.write(writer);
        self.revealed_mask.write(writer);
        self.hit.write(writer);
    }
}

impl Read for State {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let cells = u8::read(reader)?;
        if cells == 0 || cells > 64 {
            return Err(Error::Invalid("Mines", "board size"));
        }
        let mine_mask = u64::read(reader)?;
        let revealed_mask = u64::read(reader)?;
        let hit = Option::<u8>::read(reader)?;
        let board = if cells == 64 { u64::MAX } else { (1u64 << cells) - 1 };
        if (mine_mask | revealed_mask) & !board != 0 {
            return Err(Error::Invalid("Mines", "cell outside board"));
        }
        Ok(Self {
            cells,
            mine_mask,
            revealed_mask,
            hit,
        })
    }
}

impl EncodeSize for State {
    fn encode_size(&self) -> usize {
        u8::SIZE + u64::SIZE + u64::SIZE + self.hit.encode_size()
    }
}

fn load(session: &GameSession) -> Result<State, GameError> {
    State::decode(session.state_blob.as_slice()).map_err(|_| GameError::InvalidState)
}

fn store(session: &mut GameSession, state: &State) {
    session.state_blob = state.encode().to_vec();
}

fn winnings(session: &GameSession, state: &State) -> Result<u64, GameError> {
    multiplier(state.safe_revealed(), state.cleared())
        .apply(session.bet)
        .ok_or(GameError::Overflow)
}

pub struct Mines;

impl CasinoGame for Mines {
    fn init(session: &mut GameSession, rng: &mut GameRng) -> Result<GameResult, GameError> {
        let GameConfig::Mines { board, mines } = session.config else {
            return Err(GameError::InvalidState);
        };
        session
            .config
            .validate()
            .map_err(|_| GameError::InvalidPayload)?;

        let cells = board.cells();
        let state = State {
            cells,
            mine_mask: rng.sample_cells(cells, mines),
            revealed_mask: 0,
            hit: None,
        };
        store(session, &state);
        Ok(GameResult::Continue)
    }

    fn process_move(
        session: &mut GameSession,
        action: Action,
        _rng: &mut GameRng,
    ) -> Result<GameResult, GameError> {
        let Action::Reveal(cell) = action else {
            return Err(GameError::InvalidPayload);
        };
        let mut state = load(session)?;
        if cell >= state.cells {
            return Err(GameError::InvalidPayload);
        }
        let bit = 1u64 << cell;
        if state.revealed_mask & bit != 0 {
            return Err(GameError::InvalidMove);
        }

        state.revealed_mask |= bit;
        if state.mine_mask & bit != 0 {
            state.hit = Some(cell);
            store(session, &state);
            session.is_complete = true;
            return Ok(GameResult::Loss);
        }

        // Rejected before any mutation when the payout no longer fits
        let payout = winnings(session, &state)?;
        store(session, &state);
        if state.cleared() {
            session.is_complete = true;
            return Ok(GameResult::Win(payout));
        }
        Ok(GameResult::Continue)
    }

    fn cash_out(session: &mut GameSession) -> Result<GameResult, GameError> {
        let state = load(session)?;
        if state.safe_revealed() == 0 {
            return Err(GameError::InvalidMove);
        }
        let winnings = winnings(session, &state)?;
        session.is_complete = true;
        Ok(GameResult::Win(winnings))
    }

    fn outcome(session: &GameSession) -> Result<Outcome, GameError> {
        let state = load(session)?;
        Ok(Outcome::Mines {
            cells: state.cells,
            mines: state.cells_in(state.mine_mask),
            revealed: state.cells_in(state.revealed_mask),
            hit: state.hit,
        })
    }

    fn progress(session: &GameSession) -> Result<Progress, GameError> {
        let state = load(session)?;
        let steps = state.safe_revealed();
        let payout = if steps == 0 || state.hit.is_some() {
            0
        } else {
            winnings(session, &state)?
        };
        Ok(Progress { steps, payout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{create_seed, create_session};
    use arcade_types::casino::BoardSize;

    fn start(round_id: u64, board: BoardSize, mines: u8) -> GameSession {
        let seed = create_seed(1);
        let mut session = create_session(GameConfig::Mines { board, mines }, 10_000, round_id);
        let mut rng = GameRng::new(&seed, round_id, 0);
        assert_eq!(Mines::init(&mut session, &mut rng), Ok(GameResult::Continue));
        session
    }

    fn mine_cells(session: &GameSession) -> (Vec<u8>, Vec<u8>) {
        let Outcome::Mines { cells, mines, .. } = Mines::outcome(session).unwrap() else {
            panic!("expected mines outcome");
        };
        let safe = (0..cells).filter(|c| !mines.contains(c)).collect();
        (mines, safe)
    }

    fn reveal(session: &mut GameSession, cell: u8) -> Result<GameResult, GameError> {
        let mut rng = GameRng::new(&create_seed(1), session.id, 1);
        Mines::process_move(session, Action::Reveal(cell), &mut rng)
    }

    #[test]
    fn test_multiplier() {
        assert_eq!(multiplier(0, false), Multiplier::ONE);
        assert_eq!(multiplier(3, false), Multiplier::from_tenths(13));
        assert_eq!(multiplier(20, false), Multiplier::from_int(3));
        assert_eq!(multiplier(20, true), Multiplier::from_int(6));
    }

    #[test]
    fn test_init_places_mines() {
        for round_id in 1..50 {
            let session = start(round_id, BoardSize::Five, 5);
            let (mines, safe) = mine_cells(&session);
            assert_eq!(mines.len(), 5);
            assert_eq!(safe.len(), 20);
            assert!(!session.is_complete);
        }
    }

    #[test]
    fn test_three_safe_then_cash_out() {
        let mut session = start(7, BoardSize::Five, 5);
        let (_, safe) = mine_cells(&session);

        for (i, cell) in safe.iter().take(3).enumerate() {
            assert_eq!(reveal(&mut session, *cell), Ok(GameResult::Continue));
            let progress = Mines::progress(&session).unwrap();
            assert_eq!(progress.steps, i as u32 + 1);
        }
        assert_eq!(Mines::progress(&session).unwrap().payout, 13_000);
        assert_eq!(Mines::cash_out(&mut session), Ok(GameResult::Win(13_000)));
        assert!(session.is_complete);
    }

    #[test]
    fn test_mine_hit_loses() {
        let mut session = start(3, BoardSize::Five, 5);
        let (mines, safe) = mine_cells(&session);

        assert_eq!(reveal(&mut session, safe[0]), Ok(GameResult::Continue));
        assert_eq!(reveal(&mut session, mines[0]), Ok(GameResult::Loss));
        assert!(session.is_complete);

        let Outcome::Mines { revealed, hit, .. } = Mines::outcome(&session).unwrap() else {
            panic!("expected mines outcome");
        };
        assert_eq!(hit, Some(mines[0]));
        assert_eq!(revealed.len(), 2);
        assert_eq!(Mines::progress(&session).unwrap().payout, 0);
    }

    #[test]
    fn test_clear_board_doubles() {
        for round_id in 1..20 {
            let mut session = start(round_id, BoardSize::Five, 5);
            let (_, safe) = mine_cells(&session);
            let (last, rest) = safe.split_last().unwrap();
            for cell in rest {
                assert_eq!(reveal(&mut session, *cell), Ok(GameResult::Continue));
            }
            // 20 safe tiles: (1 + 20 * 0.1) * 2 = 6x
            assert_eq!(reveal(&mut session, *last), Ok(GameResult::Win(60_000)));
            assert!(session.is_complete);
        }
    }

    #[test]
    fn test_small_board_single_safe() {
        let mut session = start(11, BoardSize::Four, 15);
        let (_, safe) = mine_cells(&session);
        assert_eq!(safe.len(), 1);
        // (1 + 0.1) * 2
        assert_eq!(reveal(&mut session, safe[0]), Ok(GameResult::Win(22_000)));
    }

    #[test]
    fn test_overflowing_clear_leaves_round_open() {
        let seed = create_seed(1);
        let config = GameConfig::Mines {
            board: BoardSize::Four,
            mines: 15,
        };
        let mut session = create_session(config, u64::MAX / 2, 11);
        let mut rng = GameRng::new(&seed, 11, 0);
        Mines::init(&mut session, &mut rng).unwrap();
        let (_, safe) = mine_cells(&session);
        let before = session.state_blob.clone();

        assert_eq!(reveal(&mut session, safe[0]), Err(GameError::Overflow));
        assert!(!session.is_complete);
        assert_eq!(session.state_blob, before);
        assert_eq!(Mines::progress(&session).unwrap(), Progress::default());
    }

    #[test]
    fn test_cash_out_requires_progress() {
        let mut session = start(1, BoardSize::Six, 3);
        assert_eq!(Mines::cash_out(&mut session), Err(GameError::InvalidMove));
        assert!(!session.is_complete);
        assert_eq!(Mines::progress(&session).unwrap(), Progress::default());
    }

    #[test]
    fn test_invalid_reveals() {
        let mut session = start(2, BoardSize::Four, 2);
        let (_, safe) = mine_cells(&session);

        assert_eq!(reveal(&mut session, 16), Err(GameError::InvalidPayload));
        assert_eq!(reveal(&mut session, safe[0]), Ok(GameResult::Continue));
        assert_eq!(reveal(&mut session, safe[0]), Err(GameError::InvalidMove));

        let mut rng = GameRng::new(&create_seed(1), session.id, 2);
        assert_eq!(
            Mines::process_move(&mut session, Action::Select(0), &mut rng),
            Err(GameError::InvalidPayload)
        );
    }

    #[test]
    fn test_state_roundtrip() {
        let state = State {
            cells: 36,
            mine_mask: 0b1011,
            revealed_mask: 1 << 20,
            hit: Some(3),
        };
        let encoded = state.encode();
        assert_eq!(encoded.len(), state.encode_size());
        assert_eq!(State::decode(encoded).unwrap(), state);

        let outside = State {
            cells: 16,
            mine_mask: 1 << 20,
            revealed_mask: 0,
            hit: None,
        };
        assert!(State::decode(outside.encode()).is_err());
    }
}
