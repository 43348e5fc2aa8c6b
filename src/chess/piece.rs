//! Pieces and their movement. Every piece kind composes up to three basic
//! patterns (sliding rays, single steps and knight jumps); pawns are special
//! cased because their movement depends on occupancy and history.
//!
//! A piece only ever sees the board through a shared reference: the board owns
//! the pieces and is the only place where they are relocated.

use std::fmt;

use arrayvec::ArrayVec;

use crate::chess::bitboard::Bitboard;
use crate::chess::board::{Board, CastleSide, Castling};
use crate::chess::core::{Direction, PieceKind, Player, Rank, Square, BOARD_WIDTH};

/// Identity of a logical piece: two copies of the same piece compare equal
/// even if their mutable state differs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId {
    #[allow(missing_docs)]
    pub kind: PieceKind,
    #[allow(missing_docs)]
    pub owner: Player,
    /// The square the piece was created on.
    pub origin: Square,
}

impl PieceId {
    /// Placement-text symbol: uppercase for White, lowercase for Black.
    #[must_use]
    pub const fn symbol(self) -> char {
        let symbol = self.kind.symbol();
        match self.owner {
            Player::White => symbol,
            Player::Black => symbol.to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.symbol(), self.origin)
    }
}

/// Basic movement patterns pieces are composed of.
#[derive(Copy, Clone, Debug)]
enum Pattern {
    /// Ray scans in given directions, at most `limit` steps each.
    Slide {
        directions: &'static [Direction],
        limit: u8,
    },
    /// Knight jumps.
    Jump,
}

/// L-shaped jumps, grouped in symmetric pairs.
const KNIGHT_JUMPS: [[(i8, i8); 2]; 4] = [
    [(1, 2), (-1, -2)],
    [(2, 1), (-2, -1)],
    [(2, -1), (-2, 1)],
    [(1, -2), (-1, 2)],
];

const fn slide(directions: &'static [Direction], limit: u8) -> Pattern {
    Pattern::Slide { directions, limit }
}

fn patterns(kind: PieceKind) -> ArrayVec<Pattern, 3> {
    let mut patterns = ArrayVec::new();
    match kind {
        PieceKind::King => patterns.push(slide(&Direction::ALL, 1)),
        PieceKind::Queen => patterns.push(slide(&Direction::ALL, BOARD_WIDTH)),
        PieceKind::Rook => patterns.push(slide(&Direction::ORTHOGONAL, BOARD_WIDTH)),
        PieceKind::Bishop => patterns.push(slide(&Direction::DIAGONAL, BOARD_WIDTH)),
        PieceKind::Knight => patterns.push(Pattern::Jump),
        // Pawns do not follow any of the basic patterns.
        PieceKind::Pawn => (),
        PieceKind::Archbishop => {
            patterns.push(Pattern::Jump);
            patterns.push(slide(&Direction::DIAGONAL, BOARD_WIDTH));
        },
        PieceKind::Chancellor => {
            patterns.push(slide(&Direction::ORTHOGONAL, BOARD_WIDTH));
            patterns.push(Pattern::Jump);
        },
        PieceKind::Amazon => {
            patterns.push(slide(&Direction::ORTHOGONAL, BOARD_WIDTH));
            patterns.push(Pattern::Jump);
            patterns.push(slide(&Direction::DIAGONAL, BOARD_WIDTH));
        },
    }
    patterns
}

/// A piece on the board together with the state it accumulates during the
/// game.
///
/// Kind-specific state:
///
/// - pawns track the square they stood on before the last move, whether they
///   have just advanced two squares and an optional promotion choice;
/// - kings cache castling destinations computed during the last update;
/// - rooks cache the square they land on when their king castles.
#[derive(Clone, Debug)]
pub struct Piece {
    id: PieceId,
    pub(super) square: Square,
    pub(super) has_moved: bool,
    pub(super) potential_moves: Bitboard,
    pub(super) previous_square: Option<Square>,
    pub(super) moved_two: bool,
    pub(super) promotion: Option<PieceKind>,
    pub(super) castling: [Option<Castling>; 2],
    pub(super) castle_destination: Option<Square>,
}

impl Piece {
    /// Creates an unmoved piece with `origin = square`.
    ///
    /// ```
    /// use decachess::chess::core::{PieceKind, Player, Square};
    /// use decachess::chess::piece::Piece;
    ///
    /// let square = Square::try_from("c1").unwrap();
    /// let piece = Piece::new(PieceKind::Chancellor, Player::White, square);
    /// assert_eq!(piece.origin(), square);
    /// assert!(!piece.has_moved());
    /// assert_eq!(piece.to_string(), "C");
    /// ```
    #[must_use]
    pub fn new(kind: PieceKind, owner: Player, square: Square) -> Self {
        Self {
            id: PieceId {
                kind,
                owner,
                origin: square,
            },
            square,
            has_moved: false,
            potential_moves: Bitboard::empty(),
            previous_square: None,
            moved_two: false,
            promotion: None,
            castling: [None, None],
            castle_destination: None,
        }
    }

    /// Creates the piece a pawn turns into on the farthest rank.
    #[must_use]
    pub(super) fn promoted(kind: PieceKind, owner: Player, square: Square) -> Self {
        Self {
            has_moved: true,
            ..Self::new(kind, owner, square)
        }
    }

    /// Identity that survives relocation and copying.
    #[must_use]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    /// Never changes: promotion replaces the pawn with a new piece.
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.id.kind
    }

    /// The player this piece belongs to.
    #[must_use]
    pub const fn owner(&self) -> Player {
        self.id.owner
    }

    /// Square the piece was created on: its starting or promotion square, or
    /// wherever a placement put it.
    #[must_use]
    pub const fn origin(&self) -> Square {
        self.id.origin
    }

    /// Current square of the piece.
    #[must_use]
    pub const fn square(&self) -> Square {
        self.square
    }

    /// Pawns placed off their starting rank count as moved.
    #[must_use]
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Legal destinations computed during the last update.
    #[must_use]
    pub const fn potential_moves(&self) -> Bitboard {
        self.potential_moves
    }

    /// Square the pawn stood on before the last accepted move.
    #[must_use]
    pub const fn previous_square(&self) -> Option<Square> {
        self.previous_square
    }

    /// True only for the pawn that advanced two squares on the last move.
    #[must_use]
    pub const fn moved_two(&self) -> bool {
        self.moved_two
    }

    /// Pending promotion choice for a pawn; queen when unset.
    #[must_use]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    /// Castling available to this king, if any.
    #[must_use]
    pub const fn castling(&self, side: CastleSide) -> Option<Castling> {
        self.castling[side as usize]
    }

    /// Castling whose king destination is `to`.
    #[must_use]
    pub fn castling_to(&self, to: Square) -> Option<Castling> {
        self.castling
            .iter()
            .flatten()
            .find(|castling| castling.king_to == to)
            .copied()
    }

    /// Where this rook lands when its king castles.
    #[must_use]
    pub const fn castle_destination(&self) -> Option<Square> {
        self.castle_destination
    }

    /// Geometric destinations, ignoring the safety of the own king.
    #[must_use]
    pub fn raw_moves(&self, board: &Board) -> Bitboard {
        if self.kind() == PieceKind::Pawn {
            return self.pawn_moves(board);
        }
        patterns(self.kind())
            .into_iter()
            .fold(Bitboard::empty(), |moves, pattern| {
                moves
                    | match pattern {
                        Pattern::Slide { directions, limit } => directions
                            .iter()
                            .fold(Bitboard::empty(), |rays, direction| {
                                rays | self.scan(board, *direction, limit)
                            }),
                        Pattern::Jump => self.jumps(board),
                    }
            })
    }

    /// Walks from the current square until the edge, an occupied square or the
    /// step limit. Occupied squares are included only when they hold an
    /// opponent piece.
    fn scan(&self, board: &Board, direction: Direction, limit: u8) -> Bitboard {
        let mut result = Bitboard::empty();
        let mut current = self.square;
        for _ in 0..limit {
            let Some(next) = current.shift(direction) else {
                break;
            };
            match board.at(next) {
                None => result.insert(next),
                Some(piece) => {
                    if piece.owner() != self.owner() {
                        result.insert(next);
                    }
                    break;
                },
            }
            current = next;
        }
        result
    }

    fn jumps(&self, board: &Board) -> Bitboard {
        KNIGHT_JUMPS
            .iter()
            .flatten()
            .filter_map(|(files, ranks)| self.square.offset(*files, *ranks))
            .filter(|target| board.at(*target).map_or(true, |piece| piece.owner() != self.owner()))
            .collect()
    }

    fn pawn_moves(&self, board: &Board) -> Bitboard {
        let mut moves = Bitboard::empty();
        let forward = self.owner().push_direction();
        if let Some(one) = self.square.shift(forward) {
            if board.at(one).is_none() {
                moves.insert(one);
                if !self.has_moved && self.square.rank() == Rank::pawns_starting(self.owner()) {
                    if let Some(two) = one.shift(forward).filter(|two| board.at(*two).is_none()) {
                        moves.insert(two);
                    }
                }
            }
        }
        let (_, ranks) = forward.delta();
        for target in [-1, 1].into_iter().filter_map(|files| self.square.offset(files, ranks)) {
            let capture = match board.at(target) {
                Some(piece) => piece.owner() != self.owner(),
                None => board.en_passant_victim(self.square, target).is_some(),
            };
            if capture {
                moves.insert(target);
            }
        }
        moves
    }

    /// The legality filter: keeps raw destinations that do not leave the own
    /// king attacked. Each candidate is played on a scratch copy of `board`.
    /// Without an own king on the board every raw move is kept.
    #[must_use]
    pub fn remove_own_check(&self, board: &Board) -> Bitboard {
        self.raw_moves(board)
            .iter()
            .filter(|to| {
                let scratch = board.simulate(self.square, *to);
                scratch
                    .king(self.owner())
                    .map_or(true, |king| !scratch.is_attacked(king, !self.owner()))
            })
            .collect()
    }

    /// Stores the result of [`Piece::remove_own_check`] as the legal moves.
    pub fn update_potential_moves(&mut self, board: &Board) {
        self.potential_moves = self.remove_own_check(board);
    }

    /// True iff `to` is among the legal destinations and `player` owns the
    /// piece.
    #[must_use]
    pub fn is_valid_move(&self, to: Square, player: Player) -> bool {
        self.owner() == player && self.potential_moves.contains(to)
    }
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Piece {}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id.symbol())
    }
}
