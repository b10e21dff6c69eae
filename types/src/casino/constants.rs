/// Starting credits for a new session
pub const STARTING_BALANCE: u64 = 1_000_000;

/// Number of resolved rounds retained by the session history
pub const HISTORY_CAPACITY: usize = 10;

/// Wager choices offered by every game
pub const WAGER_CHOICES: [u64; 4] = [5_000, 10_000, 25_000, 50_000];

/// Default wager per round
pub const DEFAULT_WAGER: u64 = 10_000;

/// Reels drawn per slots spin
pub const SLOT_REELS: usize = 3;

/// Segments on the dream catcher wheel
pub const WHEEL_SEGMENTS: u8 = 8;

/// Pockets on the roulette wheel (0-36)
pub const ROULETTE_POCKETS: u8 = 37;

/// Red numbers on a roulette wheel.
pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Bets a single roulette spin can carry
pub const MAX_BETS: usize = 16;

/// Mines placed on a board unless configured otherwise
pub const DEFAULT_MINES: u8 = 5;

/// Smallest selection that can form a diamonds match
pub const MIN_MATCH: usize = 3;

/// Credits awarded per matched gem before the difficulty multiplier
pub const DIAMONDS_BASE_UNIT: u64 = 5_000;

/// Multiplier table width shared by every plinko board
pub const PLINKO_SLOTS: usize = 15;
