//! Common types shared by the arcade round engine and its tools.

pub mod casino;
mod seed;

pub use seed::{Seed, SEED_LENGTH};
