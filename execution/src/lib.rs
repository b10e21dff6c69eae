pub mod casino;
pub mod engine;
pub mod ledger;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use engine::{Engine, EngineConfig, Error, Round, RoundUpdate};
pub use ledger::Ledger;
