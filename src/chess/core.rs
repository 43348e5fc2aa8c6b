//! Chess primitives commonly used within [`crate::chess`]: board geometry,
//! squares, players and piece kinds.

use std::fmt::{self, Write};

use anyhow::bail;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 10;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
    I = 8,
    J = 9,
}

impl File {
    /// All files from left to right (from White's perspective).
    pub const ALL: [Self; BOARD_WIDTH as usize] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::I,
        Self::J,
    ];

    #[must_use]
    pub(super) const fn index(self) -> u8 {
        self as u8
    }

    /// Lowercase letter of the file.
    #[must_use]
    pub const fn letter(self) -> char {
        (b'a' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.letter())
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='j' => Ok(Self::ALL[(file as u8 - b'a') as usize]),
            _ => bail!("file should be within 'a'..='j', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match Self::ALL.get(column as usize) {
            Some(file) => Ok(*file),
            None => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
    Nine = 8,
    Ten = 9,
}

impl Rank {
    /// All ranks from bottom to top (from White's perspective).
    pub const ALL: [Self; BOARD_WIDTH as usize] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
    ];

    #[must_use]
    pub(super) const fn index(self) -> u8 {
        self as u8
    }

    /// Human-readable rank number (1..=10).
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    /// The rank on which the pieces of given player start.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Ten,
        }
    }

    /// The rank on which the pawns of given player start.
    #[must_use]
    pub const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Nine,
        }
    }

    /// The farthest rank for given player: pawns reaching it are promoted.
    #[must_use]
    pub const fn promotion(player: Player) -> Self {
        Self::backrank(player.opponent())
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match Self::ALL.get(row as usize) {
            Some(rank) => Ok(*rank),
            None => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use decachess::chess::core::{File, Rank, Square};
///
/// assert_eq!(Square::new(File::A, Rank::One).index(), 0);
/// assert_eq!(Square::new(File::J, Rank::One).index(), 9);
/// assert_eq!(Square::new(File::A, Rank::Two).index(), 10);
/// assert_eq!(Square::new(File::J, Rank::Ten).index(), 99);
/// ```
///
/// Unlike [`Coordinate`], a [`Square`] is always on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self(file.index() + rank.index() * BOARD_WIDTH)
    }

    /// Position of the square within 0..[`BOARD_SIZE`].
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        File::ALL[(self.0 % BOARD_WIDTH) as usize]
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 / BOARD_WIDTH) as usize]
    }

    /// Squares are colored like a checkerboard; A1 is dark.
    #[must_use]
    pub const fn is_light(self) -> bool {
        (self.file().index() + self.rank().index()) % 2 == 1
    }

    /// Moves the square by given number of files and ranks. Returns [`None`]
    /// if the result is off the board.
    #[must_use]
    pub fn offset(self, files: i8, ranks: i8) -> Option<Self> {
        let file = self.file().index() as i8 + files;
        let rank = self.rank().index() as i8 + ranks;
        if !(0..BOARD_WIDTH as i8).contains(&file) || !(0..BOARD_WIDTH as i8).contains(&rank) {
            return None;
        }
        Some(Self::new(
            File::ALL[file as usize],
            Rank::ALL[rank as usize],
        ))
    }

    /// Moves the square one step in given direction.
    #[must_use]
    pub fn shift(self, direction: Direction) -> Option<Self> {
        let (files, ranks) = direction.delta();
        self.offset(files, ranks)
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        if square_index >= BOARD_SIZE {
            bail!("square index should be in 0..BOARD_SIZE, got {square_index}");
        }
        Ok(Self(square_index))
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let coordinate = Coordinate::parse(square);
        if coordinate == Coordinate::EMPTY {
            bail!("square should look like 'a1'..'j10', got '{square}'");
        }
        match coordinate.square() {
            Some(square) => Ok(square),
            None => bail!("square {coordinate} is outside of the board"),
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Coordinate::from(*self))
    }
}

/// Unvalidated (file, rank) pair, e.g. parsed from user input. Malformed input
/// degrades to [`Coordinate::EMPTY`] which is never on the board.
///
/// ```
/// use decachess::chess::core::Coordinate;
///
/// assert!(Coordinate::parse("j10").in_board());
/// assert!(!Coordinate::parse("k1").in_board());
/// assert_eq!(Coordinate::parse("1a"), Coordinate::EMPTY);
/// assert!(!Coordinate::EMPTY.in_board());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// Lowercase file letter.
    pub file: char,
    /// Rank number, 1-based.
    pub rank: u8,
}

impl Coordinate {
    /// "No coordinate" marker.
    pub const EMPTY: Self = Self {
        file: '\0',
        rank: 0,
    };

    /// Pairs a file letter (any case) with a 1-based rank; no validation.
    #[must_use]
    pub fn new(file: char, rank: u8) -> Self {
        Self {
            file: file.to_ascii_lowercase(),
            rank,
        }
    }

    /// Reads "a1".."j10"-like text. Anything that is not a letter followed by
    /// one or two digits yields [`Coordinate::EMPTY`].
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut chars = text.chars();
        let Some(file) = chars.next().filter(char::is_ascii_alphabetic) else {
            return Self::EMPTY;
        };
        let digits = chars.as_str();
        if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Self::EMPTY;
        }
        match digits.parse::<u8>() {
            Ok(rank) => Self::new(file, rank),
            Err(_) => Self::EMPTY,
        }
    }

    /// True iff the file is within 'a'..='j' and the rank within 1..=10.
    #[must_use]
    pub fn in_board(self) -> bool {
        ('a'..='j').contains(&self.file) && (1..=BOARD_WIDTH).contains(&self.rank)
    }

    /// Converts to a [`Square`] if the coordinate is on the board.
    #[must_use]
    pub fn square(self) -> Option<Square> {
        if !self.in_board() {
            return None;
        }
        Some(Square::new(
            File::ALL[(self.file as u8 - b'a') as usize],
            Rank::ALL[(self.rank - 1) as usize],
        ))
    }
}

impl From<Square> for Coordinate {
    fn from(square: Square) -> Self {
        Self::new(square.file().letter(), square.rank().number())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::EMPTY {
            return f.write_char('-');
        }
        write!(f, "{}{}", self.file, self.rank)
    }
}

/// A game is played between two players: White (having the advantage of the
/// first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Direction in which the pawns of this player advance.
    #[must_use]
    pub const fn push_direction(self) -> Direction {
        match self {
            Self::White => Direction::Up,
            Self::Black => Direction::Down,
        }
    }
}

impl std::ops::Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match &self {
            Self::White => "White",
            Self::Black => "Black",
        })
    }
}

/// The six standard chess pieces and three compound pieces.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
    /// Moves as a knight or a bishop.
    Archbishop,
    /// Moves as a rook or a knight.
    Chancellor,
    /// Moves as a rook, a knight or a bishop.
    Amazon,
}

impl PieceKind {
    /// Letter used in algebraic notation. Pawns have none.
    #[must_use]
    pub const fn notation(self) -> Option<char> {
        match self {
            Self::Pawn => None,
            _ => Some(self.symbol()),
        }
    }

    /// Uppercase letter used in placement text.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::King => 'K',
            Self::Queen => 'Q',
            Self::Rook => 'R',
            Self::Bishop => 'B',
            Self::Knight => 'N',
            Self::Pawn => 'P',
            Self::Archbishop => 'A',
            Self::Chancellor => 'C',
            Self::Amazon => 'M',
        }
    }

    /// A pawn may be promoted to anything but a king or another pawn.
    #[must_use]
    pub const fn is_promotion_target(self) -> bool {
        !matches!(self, Self::King | Self::Pawn)
    }
}

impl TryFrom<char> for PieceKind {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol.to_ascii_uppercase() {
            'K' => Ok(Self::King),
            'Q' => Ok(Self::Queen),
            'R' => Ok(Self::Rook),
            'B' => Ok(Self::Bishop),
            'N' => Ok(Self::Knight),
            'P' => Ok(Self::Pawn),
            'A' => Ok(Self::Archbishop),
            'C' => Ok(Self::Chancellor),
            'M' => Ok(Self::Amazon),
            _ => bail!("piece symbol should be within \"KQRBNPACM\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match &self {
            Self::King => "King",
            Self::Queen => "Queen",
            Self::Rook => "Rook",
            Self::Bishop => "Bishop",
            Self::Knight => "Knight",
            Self::Pawn => "Pawn",
            Self::Archbishop => "Archbishop",
            Self::Chancellor => "Chancellor",
            Self::Amazon => "Amazon",
        })
    }
}

/// Directions on the board from a perspective of White player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Direction {
    UpLeft,
    Up,
    UpRight,
    Right,
    Left,
    DownLeft,
    Down,
    DownRight,
}

impl Direction {
    /// Rook-like directions.
    pub const ORTHOGONAL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];
    /// Bishop-like directions.
    pub const DIAGONAL: [Self; 4] = [Self::UpRight, Self::DownRight, Self::DownLeft, Self::UpLeft];
    /// Queen-like directions.
    pub const ALL: [Self; 8] = [
        Self::Up,
        Self::UpRight,
        Self::Right,
        Self::DownRight,
        Self::Down,
        Self::DownLeft,
        Self::Left,
        Self::UpLeft,
    ];

    /// (files, ranks) step.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::UpLeft => (-1, 1),
            Self::Up => (0, 1),
            Self::UpRight => (1, 1),
            Self::Right => (1, 0),
            Self::Left => (-1, 0),
            Self::DownLeft => (-1, -1),
            Self::Down => (0, -1),
            Self::DownRight => (1, -1),
        }
    }
}
