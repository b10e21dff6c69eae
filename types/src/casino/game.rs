use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

use super::{DEFAULT_MINES, MAX_BETS, RED_NUMBERS};

/// Error returned when parsing a game identifier or option from text.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Error returned when a game configuration or selection is unsupported.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{mines} mines do not fit a board of {cells} cells")]
    MineCount { mines: u8, cells: u8 },
    #[error("{0} requires a bet selection")]
    MissingSelection(GameType),
    #[error("{0} does not take a bet selection")]
    UnexpectedSelection(GameType),
    #[error("{count} bets exceed the limit of {limit} per round")]
    TooManyBets { count: usize, limit: usize },
    #[error("number {number} is out of range for a {bet_type} bet")]
    SelectionNumber { bet_type: BetType, number: u8 },
}

/// Game variants offered by the arcade
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum GameType {
    Slots = 0,
    Mines = 1,
    Plinko = 2,
    Diamonds = 3,
    DreamCatcher = 4,
    Roulette = 5,
}

impl GameType {
    pub const ALL: [GameType; 6] = [
        GameType::Slots,
        GameType::Mines,
        GameType::Plinko,
        GameType::Diamonds,
        GameType::DreamCatcher,
        GameType::Roulette,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GameType::Slots => "slots",
            GameType::Mines => "mines",
            GameType::Plinko => "plinko",
            GameType::Diamonds => "diamonds",
            GameType::DreamCatcher => "dream-catcher",
            GameType::Roulette => "roulette",
        }
    }

    /// Progressive games stay active across player actions and resolve on cash out.
    pub fn is_progressive(self) -> bool {
        matches!(self, GameType::Mines | GameType::Diamonds)
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slots" => Ok(GameType::Slots),
            "mines" => Ok(GameType::Mines),
            "plinko" => Ok(GameType::Plinko),
            "diamonds" => Ok(GameType::Diamonds),
            "dream-catcher" | "dream_catcher" | "dreamcatcher" => Ok(GameType::DreamCatcher),
            "roulette" => Ok(GameType::Roulette),
            _ => Err(ParseError::new("game", s)),
        }
    }
}

/// Square board sizes shared by Mines and Diamonds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BoardSize {
    Four = 4,
    #[default]
    Five = 5,
    Six = 6,
}

impl BoardSize {
    pub fn side(self) -> u8 {
        self as u8
    }

    pub fn cells(self) -> u8 {
        self.side() * self.side()
    }
}

impl TryFrom<u8> for BoardSize {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(BoardSize::Four),
            5 => Ok(BoardSize::Five),
            6 => Ok(BoardSize::Six),
            _ => Err(ParseError::new("board size", &value.to_string())),
        }
    }
}

/// Plinko pin configurations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PinCount {
    Eight = 8,
    Twelve = 12,
    #[default]
    Fourteen = 14,
}

impl PinCount {
    /// Peg rows the ball bounces through.
    pub fn rows(self) -> u8 {
        match self {
            PinCount::Eight => 8,
            PinCount::Twelve => 10,
            PinCount::Fourteen => 12,
        }
    }
}

impl TryFrom<u8> for PinCount {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(PinCount::Eight),
            12 => Ok(PinCount::Twelve),
            14 => Ok(PinCount::Fourteen),
            _ => Err(ParseError::new("pin count", &value.to_string())),
        }
    }
}

/// How a Plinko bucket (right bounces, `0..=rows`) picks a multiplier slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotMapping {
    /// Slot `max(0, bucket - 1)`, counted from the left edge of the table.
    #[default]
    Edge,
    /// Bucket centered in the table so the middle bucket hits the middle slot.
    Centered,
}

impl FromStr for SlotMapping {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "edge" => Ok(SlotMapping::Edge),
            "centered" => Ok(SlotMapping::Centered),
            _ => Err(ParseError::new("slot mapping", s)),
        }
    }
}

/// Diamonds difficulty levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseError::new("difficulty", s)),
        }
    }
}

/// Per-variant options chosen before a round starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum GameConfig {
    Slots,
    Mines { board: BoardSize, mines: u8 },
    Plinko {
        pins: PinCount,
        #[serde(default)]
        mapping: SlotMapping,
    },
    Diamonds { board: BoardSize, difficulty: Difficulty },
    DreamCatcher,
    Roulette,
}

impl GameConfig {
    /// Options each game uses when the player picks nothing.
    pub fn default_for(game_type: GameType) -> Self {
        match game_type {
            GameType::Slots => GameConfig::Slots,
            GameType::Mines => GameConfig::Mines {
                board: BoardSize::Five,
                mines: DEFAULT_MINES,
            },
            GameType::Plinko => GameConfig::Plinko {
                pins: PinCount::default(),
                mapping: SlotMapping::default(),
            },
            GameType::Diamonds => GameConfig::Diamonds {
                board: BoardSize::Four,
                difficulty: Difficulty::Easy,
            },
            GameType::DreamCatcher => GameConfig::DreamCatcher,
            GameType::Roulette => GameConfig::Roulette,
        }
    }

    pub fn game_type(&self) -> GameType {
        match self {
            GameConfig::Slots => GameType::Slots,
            GameConfig::Mines { .. } => GameType::Mines,
            GameConfig::Plinko { .. } => GameType::Plinko,
            GameConfig::Diamonds { .. } => GameType::Diamonds,
            GameConfig::DreamCatcher => GameType::DreamCatcher,
            GameConfig::Roulette => GameType::Roulette,
        }
    }

    /// Reject combinations the outcome generators cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let GameConfig::Mines { board, mines } = *self {
            let cells = board.cells();
            if mines == 0 || mines >= cells {
                return Err(ConfigError::MineCount { mines, cells });
            }
        }
        Ok(())
    }

    /// Check that bet selections are present exactly when the game needs them.
    pub fn validate_selections(&self, selections: &[Selection]) -> Result<(), ConfigError> {
        let game_type = self.game_type();
        match game_type {
            GameType::Roulette if selections.is_empty() => {
                Err(ConfigError::MissingSelection(game_type))
            }
            GameType::Roulette if selections.len() > MAX_BETS => Err(ConfigError::TooManyBets {
                count: selections.len(),
                limit: MAX_BETS,
            }),
            GameType::Roulette => selections.iter().try_for_each(Selection::validate),
            _ if !selections.is_empty() => Err(ConfigError::UnexpectedSelection(game_type)),
            _ => Ok(()),
        }
    }
}

/// Slot reel symbols, ordered by payout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SlotSymbol {
    Cherry = 0,
    Orange = 1,
    Lemon = 2,
    Grape = 3,
    Diamond = 4,
    Crown = 5,
}

impl SlotSymbol {
    pub const ALL: [SlotSymbol; 6] = [
        SlotSymbol::Cherry,
        SlotSymbol::Orange,
        SlotSymbol::Lemon,
        SlotSymbol::Grape,
        SlotSymbol::Diamond,
        SlotSymbol::Crown,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            SlotSymbol::Cherry => "🍒",
            SlotSymbol::Orange => "🍊",
            SlotSymbol::Lemon => "🍋",
            SlotSymbol::Grape => "🍇",
            SlotSymbol::Diamond => "💎",
            SlotSymbol::Crown => "👑",
        }
    }
}

impl TryFrom<u8> for SlotSymbol {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SlotSymbol::ALL
            .get(value as usize)
            .copied()
            .ok_or(Error::InvalidEnum(value))
    }
}

impl Write for SlotSymbol {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for SlotSymbol {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        SlotSymbol::try_from(u8::read(reader)?)
    }
}

impl FixedSize for SlotSymbol {
    const SIZE: usize = 1;
}

/// Diamonds grid gems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Gem {
    Diamond = 0,
    Ring = 1,
    Crown = 2,
    Star = 3,
}

impl Gem {
    pub const ALL: [Gem; 4] = [Gem::Diamond, Gem::Ring, Gem::Crown, Gem::Star];

    pub fn glyph(self) -> &'static str {
        match self {
            Gem::Diamond => "💎",
            Gem::Ring => "💍",
            Gem::Crown => "👑",
            Gem::Star => "⭐",
        }
    }
}

impl TryFrom<u8> for Gem {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Gem::ALL
            .get(value as usize)
            .copied()
            .ok_or(Error::InvalidEnum(value))
    }
}

impl Write for Gem {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Gem {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Gem::try_from(u8::read(reader)?)
    }
}

impl FixedSize for Gem {
    const SIZE: usize = 1;
}

/// Roulette bet types.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetType {
    Straight = 0, // Single number (36:1)
    Red = 1,      // Red (1:1)
    Black = 2,    // Black (1:1)
    Even = 3,     // Even (1:1)
    Odd = 4,      // Odd (1:1)
    Low = 5,      // 1-18 (1:1)
    High = 6,     // 19-36 (1:1)
    Dozen = 7,    // 1-12, 13-24, 25-36 (2:1)
    Column = 8,   // First, second, third column (2:1)
}

impl BetType {
    pub fn name(self) -> &'static str {
        match self {
            BetType::Straight => "straight",
            BetType::Red => "red",
            BetType::Black => "black",
            BetType::Even => "even",
            BetType::Odd => "odd",
            BetType::Low => "low",
            BetType::High => "high",
            BetType::Dozen => "dozen",
            BetType::Column => "column",
        }
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BetType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "straight" | "number" => Ok(BetType::Straight),
            "red" => Ok(BetType::Red),
            "black" => Ok(BetType::Black),
            "even" => Ok(BetType::Even),
            "odd" => Ok(BetType::Odd),
            "low" => Ok(BetType::Low),
            "high" => Ok(BetType::High),
            "dozen" => Ok(BetType::Dozen),
            "column" => Ok(BetType::Column),
            _ => Err(ParseError::new("bet type", s)),
        }
    }
}

impl TryFrom<u8> for BetType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BetType::Straight),
            1 => Ok(BetType::Red),
            2 => Ok(BetType::Black),
            3 => Ok(BetType::Even),
            4 => Ok(BetType::Odd),
            5 => Ok(BetType::Low),
            6 => Ok(BetType::High),
            7 => Ok(BetType::Dozen),
            8 => Ok(BetType::Column),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl Write for BetType {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for BetType {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        BetType::try_from(u8::read(reader)?)
    }
}

impl FixedSize for BetType {
    const SIZE: usize = 1;
}

/// Game-specific bet descriptor carried by a wager (the roulette bet).
///
/// `number` is the pocket for straight bets and the 0-based dozen or column for
/// those bets; other bet types ignore it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub bet_type: BetType,
    pub number: u8,
}

impl Selection {
    pub fn new(bet_type: BetType, number: u8) -> Self {
        Self { bet_type, number }
    }

    pub fn straight(number: u8) -> Self {
        Self::new(BetType::Straight, number)
    }

    pub fn outside(bet_type: BetType) -> Self {
        Self::new(bet_type, 0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limit = match self.bet_type {
            BetType::Straight => 36,
            BetType::Dozen | BetType::Column => 2,
            _ => return Ok(()),
        };
        if self.number > limit {
            return Err(ConfigError::SelectionNumber {
                bet_type: self.bet_type,
                number: self.number,
            });
        }
        Ok(())
    }
}

impl Write for Selection {
    fn write(&self, writer: &mut impl BufMut) {
        self.bet_type.write(writer);
        self.number.write(writer);
    }
}

impl Read for Selection {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            bet_type: BetType::read(reader)?,
            number: u8::read(reader)?,
        })
    }
}

impl FixedSize for Selection {
    const SIZE: usize = BetType::SIZE + u8::SIZE;
}

/// Pocket color on the roulette wheel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Green,
    Red,
    Black,
}

impl Color {
    pub fn of(number: u8) -> Self {
        if number == 0 {
            Color::Green
        } else if RED_NUMBERS.contains(&number) {
            Color::Red
        } else {
            Color::Black
        }
    }
}

/// Odd or even classification of a non-zero roulette number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    /// `None` for zero.
    pub fn of(number: u8) -> Option<Self> {
        match number {
            0 => None,
            n if n % 2 == 1 => Some(Parity::Odd),
            _ => Some(Parity::Even),
        }
    }
}

/// Low (1-18) or high (19-36) half of the roulette table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberRange {
    Low,
    High,
}

impl NumberRange {
    /// `None` for zero.
    pub fn of(number: u8) -> Option<Self> {
        match number {
            0 => None,
            1..=18 => Some(NumberRange::Low),
            _ => Some(NumberRange::High),
        }
    }
}

/// Player decision applied to an active round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Uncover a Mines tile.
    Reveal(u8),
    /// Toggle a Diamonds gem in or out of the current selection.
    Select(u8),
}
