use crate::engine::{Engine, EngineConfig};
use arcade_types::{
    casino::{GameConfig, GameSession, Selection, Wager},
    Seed,
};
use commonware_cryptography::{sha256::Sha256, Hasher};

/// Creates a deterministic session seed for a test view
pub fn create_seed(view: u64) -> Seed {
    let mut hasher = Sha256::new();
    hasher.update(b"arcade-test-seed");
    hasher.update(&view.to_be_bytes());
    Seed::new(hasher.finalize().0)
}

/// Creates a fresh round for a game configuration
pub fn create_session(config: GameConfig, bet: u64, session_id: u64) -> GameSession {
    GameSession::new(session_id, config, &Wager::new(bet), 0)
}

/// Creates a fresh roulette round carrying `selection`
pub fn create_session_with_selection(
    selection: Selection,
    bet: u64,
    session_id: u64,
) -> GameSession {
    create_session_with_selections(vec![selection], bet, session_id)
}

/// Creates a fresh roulette round with `bet` staked on each selection
pub fn create_session_with_selections(
    selections: Vec<Selection>,
    bet: u64,
    session_id: u64,
) -> GameSession {
    GameSession::new(
        session_id,
        GameConfig::Roulette,
        &Wager::with_selections(bet, selections),
        0,
    )
}

/// Creates an engine with the default economy and a fixed seed
pub fn create_engine(view: u64) -> Engine {
    Engine::new(EngineConfig {
        seed: create_seed(view),
        ..EngineConfig::default()
    })
}
