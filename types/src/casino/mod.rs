mod constants;
mod game;
mod history;
mod outcome;
mod session;

pub use constants::*;
pub use game::*;
pub use history::*;
pub use outcome::*;
pub use session::*;
