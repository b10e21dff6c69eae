//! Integration tests for game execution.
//!
//! These tests verify the full flow from round start through player actions
//! to resolution, both through the dispatch functions and the round engine.

#[cfg(test)]
mod tests {
    use crate::casino::{
        cash_out_game, game_outcome, init_game, process_game_move, GameError, GameResult, GameRng,
    };
    use crate::engine::{Engine, Error};
    use crate::mocks::{create_engine, create_seed, create_session};
    use arcade_types::casino::{
        Action, BetType, GameConfig, GameSession, GameType, Outcome, RoundState, Selection,
        SlotSymbol, Wager, HISTORY_CAPACITY, STARTING_BALANCE, WAGER_CHOICES,
    };
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn wager_for(game_type: GameType, amount: u64) -> Wager {
        match game_type {
            GameType::Roulette => Wager::with_selection(amount, Selection::outside(BetType::Red)),
            _ => Wager::new(amount),
        }
    }

    /// Test that all games can be initialized.
    #[test]
    fn test_all_games_initialize() {
        let seed = create_seed(1);

        for (i, game_type) in GameType::ALL.iter().enumerate() {
            let wager = wager_for(*game_type, 10_000);
            let mut session = GameSession::new(
                i as u64 + 1,
                GameConfig::default_for(*game_type),
                &wager,
                0,
            );
            let mut rng = GameRng::new(&seed, session.id, 0);
            let result = init_game(&mut session, &mut rng).unwrap();

            // Only progressive games wait for the player
            assert_eq!(session.is_complete, !game_type.is_progressive());
            assert_eq!(result == GameResult::Continue, game_type.is_progressive());
            assert_eq!(game_outcome(&session).unwrap().game_type(), *game_type);
        }
    }

    /// Same seed, round and move always produce the same outcome.
    #[test]
    fn test_deterministic_outcomes() {
        let seed = create_seed(1);
        for game_type in GameType::ALL {
            let config = GameConfig::default_for(game_type);
            let wager = wager_for(game_type, 10_000);
            let mut a = GameSession::new(7, config, &wager, 0);
            let mut b = GameSession::new(7, config, &wager, 0);
            init_game(&mut a, &mut GameRng::new(&seed, 7, 0)).unwrap();
            init_game(&mut b, &mut GameRng::new(&seed, 7, 0)).unwrap();
            assert_eq!(a.state_blob, b.state_blob);
        }
    }

    /// Test that completed rounds reject further moves.
    #[test]
    fn test_completed_games_reject_moves() {
        let seed = create_seed(1);
        let mut session = create_session(GameConfig::Slots, 10_000, 1);
        init_game(&mut session, &mut GameRng::new(&seed, 1, 0)).unwrap();

        let mut rng = GameRng::new(&seed, 1, 1);
        assert_eq!(
            process_game_move(&mut session, Action::Reveal(0), &mut rng),
            Err(GameError::GameAlreadyComplete)
        );
        assert_eq!(
            cash_out_game(&mut session),
            Err(GameError::GameAlreadyComplete)
        );
    }

    /// Single-shot games do not take actions or cash outs.
    #[test]
    fn test_single_shot_has_no_moves() {
        let seed = create_seed(1);
        let mut session = create_session(GameConfig::DreamCatcher, 10_000, 1);
        let mut rng = GameRng::new(&seed, 1, 0);
        // Uninitialized session is not complete yet
        assert_eq!(
            process_game_move(&mut session, Action::Select(0), &mut rng),
            Err(GameError::InvalidPayload)
        );
        assert_eq!(cash_out_game(&mut session), Err(GameError::InvalidMove));
    }

    /// Slots: 1,000,000 credits, 10,000 on a crown triple ends at 1,190,000.
    #[test]
    fn test_slots_crown_triple() {
        let mut found = false;
        for view in 0..20_000 {
            let mut engine = create_engine(view);
            let update = engine
                .start_round(GameConfig::Slots, Wager::new(10_000))
                .unwrap();
            let crowns = Outcome::Slots {
                reels: vec![SlotSymbol::Crown; 3],
            };
            if engine.outcome() != Some(crowns) {
                continue;
            }
            assert_eq!(update.state, RoundState::Won);
            assert_eq!(update.winnings, Some(200_000));
            assert_eq!(engine.balance(), 1_190_000);
            found = true;
            break;
        }
        assert!(found, "no crown triple in 20,000 seeds");
    }

    /// Roulette: 10,000 on red, wheel lands on 7, returns 20,000.
    #[test]
    fn test_roulette_red_seven() {
        let wager = Wager::with_selection(10_000, Selection::outside(BetType::Red));
        let mut found = false;
        for view in 0..20_000 {
            let mut engine = create_engine(view);
            let update = engine.start_round(GameConfig::Roulette, wager.clone()).unwrap();
            let Some(Outcome::Roulette { number, .. }) = engine.outcome() else {
                panic!("expected roulette outcome");
            };
            if number != 7 {
                continue;
            }
            assert_eq!(update.winnings, Some(20_000));
            assert_eq!(engine.balance(), STARTING_BALANCE + 10_000);
            found = true;
            break;
        }
        assert!(found, "wheel never landed on 7");
    }

    /// Mines: 25 cells, 5 mines, three safe reveals then cash out returns 13,000.
    #[test]
    fn test_mines_three_safe_cash_out() {
        let mut engine = create_engine(1);
        let round_id = engine
            .start_round(GameConfig::default_for(GameType::Mines), Wager::new(10_000))
            .unwrap()
            .round_id;
        let Some(Outcome::Mines { cells, mines, .. }) = engine.outcome() else {
            panic!("expected mines outcome");
        };
        assert_eq!((cells, mines.len()), (25, 5));

        let safe: Vec<u8> = (0..cells).filter(|c| !mines.contains(c)).take(3).collect();
        for cell in safe {
            engine.apply_action(round_id, Action::Reveal(cell)).unwrap();
        }
        let update = engine.cash_out(round_id).unwrap();
        assert_eq!(update.winnings, Some(13_000));
        assert_eq!(engine.balance(), STARTING_BALANCE - 10_000 + 13_000);
    }

    /// Play one round to resolution with random decisions.
    fn play_random(engine: &mut Engine, rng: &mut StdRng) -> Result<(u64, u64), Error> {
        let game_type = GameType::ALL[rng.gen_range(0..GameType::ALL.len())];
        let amount = WAGER_CHOICES[rng.gen_range(0..WAGER_CHOICES.len())];
        let mut update = engine.start_round(
            GameConfig::default_for(game_type),
            wager_for(game_type, amount),
        )?;

        let mut steps = 0;
        while update.state == RoundState::Active {
            steps += 1;
            let cells = match engine.outcome() {
                Some(Outcome::Mines { cells, .. }) => cells,
                Some(Outcome::Diamonds { grid, .. }) => grid.len() as u8,
                _ => unreachable!("only progressive rounds stay active"),
            };
            let action = match game_type {
                GameType::Mines => Action::Reveal(rng.gen_range(0..cells)),
                _ => Action::Select(rng.gen_range(0..cells)),
            };
            update = match rng.gen_range(0..10) {
                0 if update.progress.steps > 0 => engine.cash_out(update.round_id)?,
                1 if steps > 20 => engine.abandon(update.round_id)?,
                _ => match engine.apply_action(update.round_id, action) {
                    Ok(update) => update,
                    // Tile already revealed
                    Err(Error::InvalidAction(GameError::InvalidMove)) => update,
                    Err(err) => return Err(err),
                },
            };
        }
        Ok((amount, update.winnings.unwrap_or(0)))
    }

    /// For all rounds: balance after = balance before - wager + winnings.
    #[test]
    fn test_balance_invariant() {
        let mut rng = StdRng::seed_from_u64(42);
        for view in 0..20 {
            let mut engine = create_engine(view);
            for _ in 0..50 {
                let before = engine.balance();
                if before < 50_000 {
                    engine.reset();
                    continue;
                }
                let (wager, winnings) = play_random(&mut engine, &mut rng).unwrap();
                assert_eq!(engine.balance(), before - wager + winnings);

                let latest = engine.history().latest().unwrap();
                assert_eq!(latest.wager, wager);
                assert_eq!(latest.winnings, winnings);
                assert!(engine.history().len() <= HISTORY_CAPACITY);
            }
        }
    }

    /// History never exceeds its bound and keeps the newest rounds.
    #[test]
    fn test_history_bounded() {
        let mut engine = create_engine(1);
        let mut ids = Vec::new();
        for _ in 0..25 {
            let update = engine
                .start_round(GameConfig::DreamCatcher, Wager::new(5_000))
                .unwrap();
            ids.push(update.round_id);
            assert!(engine.history().len() <= HISTORY_CAPACITY);
        }
        let recent: Vec<u64> = engine.history().iter().map(|e| e.round_id).collect();
        let expected: Vec<u64> = ids.iter().rev().take(HISTORY_CAPACITY).copied().collect();
        assert_eq!(recent, expected);
    }
}
