//! Tools for driving the arcade round engine outside a frontend: YAML
//! configuration, scripted sessions and house-edge estimates.

pub mod config;
pub mod house_edge;
pub mod play;

pub use config::{Config, ConfigError};
pub use house_edge::{default_scenarios, simulate, simulate_all, Report, Scenario, Stats, Strategy};
pub use play::{run, RoundReport, Script, SessionReport};
