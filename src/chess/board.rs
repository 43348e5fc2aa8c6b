//! Square-centric [`Board`]: the square→piece mapping, read-only aggregate
//! queries over it, castling pre-conditions and the placement text format.

use std::fmt::{self, Write};

use anyhow::bail;

use crate::chess::bitboard::Bitboard;
use crate::chess::core::{File, PieceKind, Player, Rank, Square, BOARD_SIZE, BOARD_WIDTH};
use crate::chess::piece::{Piece, PieceId};

/// Snapshot of the square→piece assignment. Two boards with equal placements
/// are the same position for repetition purposes.
pub type Placement = [Option<PieceId>; BOARD_SIZE as usize];

/// Back rank layout (files a through j) of the standard starting position.
const BACK_RANK: [PieceKind; BOARD_WIDTH as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Chancellor,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Archbishop,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Direction of castling: kingside ("O-O") castles with the rook on the J
/// file, queenside ("O-O-O") with the rook on the A file.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum CastleSide {
    Kingside = 0,
    Queenside = 1,
}

impl CastleSide {
    #[allow(missing_docs)]
    pub const ALL: [Self; 2] = [Self::Kingside, Self::Queenside];

    #[must_use]
    const fn rook_file(self) -> File {
        match self {
            Self::Kingside => File::J,
            Self::Queenside => File::A,
        }
    }

    #[must_use]
    const fn step(self) -> i8 {
        match self {
            Self::Kingside => 1,
            Self::Queenside => -1,
        }
    }
}

impl fmt::Display for CastleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Kingside => "O-O",
            Self::Queenside => "O-O-O",
        })
    }
}

/// Squares involved in a castling move that passed all pre-conditions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Castling {
    #[allow(missing_docs)]
    pub side: CastleSide,
    /// Two squares from the king towards the rook.
    pub king_to: Square,
    #[allow(missing_docs)]
    pub rook_from: Square,
    /// The square the king crosses.
    pub rook_to: Square,
}

/// Square→piece mapping. At most one piece per square, and each piece's
/// square matches the slot it is stored in.
#[derive(Clone)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
}

impl Board {
    /// Board without any pieces.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            squares: std::array::from_fn(|_| None),
        }
    }

    /// Standard starting layout: the archbishop stands next to the king, the
    /// chancellor next to the queen.
    ///
    /// ```
    /// use decachess::chess::board::Board;
    ///
    /// assert_eq!(
    ///     Board::starting().to_string(),
    ///     "rnbcqkabnr/pppppppppp/10/10/10/10/10/10/PPPPPPPPPP/RNBCQKABNR"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for player in [Player::White, Player::Black] {
            for (file, kind) in File::ALL.into_iter().zip(BACK_RANK) {
                board.place(Piece::new(
                    kind,
                    player,
                    Square::new(file, Rank::backrank(player)),
                ));
            }
            for file in File::ALL {
                board.place(Piece::new(
                    PieceKind::Pawn,
                    player,
                    Square::new(file, Rank::pawns_starting(player)),
                ));
            }
        }
        board
    }

    /// Builds a board from arbitrary pieces.
    ///
    /// # Errors
    ///
    /// Two pieces on one square or more than one king per player.
    pub fn from_pieces(pieces: impl IntoIterator<Item = Piece>) -> anyhow::Result<Self> {
        let mut board = Self::empty();
        for piece in pieces {
            if let Some(occupant) = board.at(piece.square()) {
                bail!(
                    "{piece} can not be placed on {}: it is occupied by {occupant}",
                    piece.square()
                );
            }
            board.place(piece);
        }
        board.validate()?;
        Ok(board)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for player in [Player::White, Player::Black] {
            let kings = self
                .colour_pieces(player)
                .filter(|piece| piece.kind() == PieceKind::King)
                .count();
            if kings > 1 {
                bail!("expected at most one {player} king, got {kings}");
            }
        }
        Ok(())
    }

    /// Parses placement text: ten ranks from 10 down to 1 separated by `/`,
    /// files from a to j, digits (including `10`) for runs of empty squares.
    /// Pawns outside of their starting rank are considered to have moved.
    ///
    /// # Errors
    ///
    /// Malformed text or an illegal combination of pieces.
    pub fn from_placement(input: &str) -> anyhow::Result<Self> {
        let mut board = Self::empty();
        let mut ranks = Rank::ALL.into_iter().rev();
        for rank_text in input.split('/') {
            let Some(rank) = ranks.next() else {
                bail!("incorrect placement: expected {BOARD_WIDTH} ranks, got {input}");
            };
            let mut file: u8 = 0;
            let mut symbols = rank_text.chars().peekable();
            while let Some(symbol) = symbols.next() {
                if let Some(digit) = symbol.to_digit(10) {
                    let mut empty = digit as u8;
                    if empty == 1 && symbols.next_if_eq(&'0').is_some() {
                        empty = 10;
                    }
                    if empty == 0 {
                        bail!("incorrect placement: increment can not be 0 in {rank_text}");
                    }
                    file += empty;
                    if file > BOARD_WIDTH {
                        bail!("incorrect placement: rank size should be exactly {BOARD_WIDTH}, got {rank_text}");
                    }
                    continue;
                }
                let kind = PieceKind::try_from(symbol)?;
                let owner = if symbol.is_ascii_uppercase() {
                    Player::White
                } else {
                    Player::Black
                };
                let square = Square::new(File::try_from(file)?, rank);
                let mut piece = Piece::new(kind, owner, square);
                piece.has_moved =
                    kind == PieceKind::Pawn && rank != Rank::pawns_starting(owner);
                board.place(piece);
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail!(
                    "incorrect placement: rank size should be exactly {BOARD_WIDTH}, got {rank_text} of length {file}"
                );
            }
        }
        if ranks.next().is_some() {
            bail!("incorrect placement: expected {BOARD_WIDTH} ranks, got {input}");
        }
        board.validate()?;
        Ok(board)
    }

    /// Piece standing on given square.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<&Piece> {
        self.squares[square.index() as usize].as_ref()
    }

    pub(super) fn at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.squares[square.index() as usize].as_mut()
    }

    /// Puts the piece on its square, replacing whatever was there.
    pub(super) fn place(&mut self, piece: Piece) {
        let index = piece.square().index() as usize;
        self.squares[index] = Some(piece);
    }

    pub(super) fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.index() as usize].take()
    }

    /// All pieces, from A1 to J10.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.squares.iter().flatten()
    }

    pub(super) fn pieces_mut(&mut self) -> impl Iterator<Item = &mut Piece> + '_ {
        self.squares.iter_mut().flatten()
    }

    /// Pieces owned by `player`.
    pub fn colour_pieces(&self, player: Player) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces().filter(move |piece| piece.owner() == player)
    }

    /// Square of the king of given player.
    #[must_use]
    pub fn king(&self, player: Player) -> Option<Square> {
        self.colour_pieces(player)
            .find(|piece| piece.kind() == PieceKind::King)
            .map(Piece::square)
    }

    /// Union of legal destinations of every piece owned by `player`.
    #[must_use]
    pub fn all_coloured_potentials(&self, player: Player) -> Bitboard {
        self.colour_pieces(player)
            .fold(Bitboard::empty(), |moves, piece| moves | piece.potential_moves())
    }

    /// Union of raw destinations of every piece owned by `player`.
    #[must_use]
    pub fn all_coloured_raws(&self, player: Player) -> Bitboard {
        self.colour_pieces(player)
            .fold(Bitboard::empty(), |moves, piece| moves | piece.raw_moves(self))
    }

    /// True if any piece of `attacker` can reach given square geometrically.
    #[must_use]
    pub fn is_attacked(&self, square: Square, attacker: Player) -> bool {
        self.colour_pieces(attacker)
            .any(|piece| piece.raw_moves(self).contains(square))
    }

    /// Unconditionally moves the piece from one square to another, marking it
    /// as moved. Returns the piece previously standing on the destination.
    pub(super) fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let mut piece = self.take(from)?;
        piece.square = to;
        piece.has_moved = true;
        self.squares[to.index() as usize].replace(piece)
    }

    /// Square of the pawn captured en passant if the pawn on `from` moves to
    /// `to`.
    #[must_use]
    pub fn en_passant_victim(&self, from: Square, to: Square) -> Option<Square> {
        let pawn = self.at(from).filter(|piece| piece.kind() == PieceKind::Pawn)?;
        if self.at(to).is_some() || from.file() == to.file() {
            return None;
        }
        let victim = Square::new(to.file(), from.rank());
        self.at(victim)
            .filter(|piece| {
                piece.kind() == PieceKind::Pawn
                    && piece.owner() != pawn.owner()
                    && piece.moved_two()
            })
            .map(Piece::square)
    }

    /// Scratch copy of the board with the move played, including the removal
    /// of a pawn captured en passant.
    #[must_use]
    pub fn simulate(&self, from: Square, to: Square) -> Self {
        let mut scratch = self.clone();
        if let Some(victim) = self.en_passant_victim(from, to) {
            let _ = scratch.take(victim);
        }
        let _ = scratch.relocate(from, to);
        scratch
    }

    /// Checks castling pre-conditions for the king on `king_square`:
    ///
    /// - neither the king nor the rook on the corner of its back rank have
    ///   moved;
    /// - every square between them is empty, and there are at least two (see
    ///   `BACK_RANK` for the starting distances);
    /// - the king is not in check, does not cross an attacked square and does
    ///   not land on one.
    #[must_use]
    pub fn castling(&self, king_square: Square, side: CastleSide) -> Option<Castling> {
        let king = self
            .at(king_square)
            .filter(|piece| piece.kind() == PieceKind::King && !piece.has_moved())?;
        let owner = king.owner();
        let rank = king_square.rank();
        if rank != Rank::backrank(owner) {
            return None;
        }
        let rook_from = Square::new(side.rook_file(), rank);
        if !self.at(rook_from).is_some_and(|piece| {
            piece.kind() == PieceKind::Rook && piece.owner() == owner && !piece.has_moved()
        }) {
            return None;
        }

        let mut between = 0;
        let mut current = king_square.offset(side.step(), 0)?;
        while current != rook_from {
            if self.at(current).is_some() {
                return None;
            }
            between += 1;
            current = current.offset(side.step(), 0)?;
        }
        // The king needs room for its two steps. With BACK_RANK the king starts
        // on the F file, three squares away from the J rook and four from the A
        // rook, so the gap has a lower bound instead of a fixed size per side.
        if between < 2 {
            return None;
        }

        let rook_to = king_square.offset(side.step(), 0)?;
        let king_to = rook_to.offset(side.step(), 0)?;
        if self.is_attacked(king_square, !owner)
            || self.simulate(king_square, rook_to).is_attacked(rook_to, !owner)
        {
            return None;
        }
        let mut after = self.simulate(king_square, king_to);
        let _ = after.relocate(rook_from, rook_to);
        if after.is_attacked(king_to, !owner) {
            return None;
        }
        Some(Castling {
            side,
            king_to,
            rook_from,
            rook_to,
        })
    }

    /// Recomputes legal moves of every piece from scratch and refreshes the
    /// castling caches of kings and rooks.
    pub(super) fn update_potentials(&mut self) {
        let snapshot = self.clone();
        for piece in self.pieces_mut() {
            piece.update_potential_moves(&snapshot);
            piece.castling = [None, None];
            piece.castle_destination = None;
        }
        for player in [Player::White, Player::Black] {
            let Some(king_square) = snapshot.king(player) else {
                continue;
            };
            for side in CastleSide::ALL {
                let Some(castling) = snapshot.castling(king_square, side) else {
                    continue;
                };
                if let Some(rook) = self.at_mut(castling.rook_from) {
                    rook.castle_destination = Some(castling.rook_to);
                }
                if let Some(king) = self.at_mut(king_square) {
                    king.castling[side as usize] = Some(castling);
                    king.potential_moves.insert(castling.king_to);
                }
            }
        }
    }

    /// Square→piece identity snapshot.
    #[must_use]
    pub fn placement(&self) -> Placement {
        std::array::from_fn(|index| self.squares[index].as_ref().map(Piece::id))
    }

    /// Other pieces of the same kind and owner as the one on `square`. Kings
    /// never have rivals.
    fn rivals(&self, square: Square) -> impl Iterator<Item = &Piece> + '_ {
        let piece = self
            .at(square)
            .filter(|piece| piece.kind() != PieceKind::King)
            .map(Piece::id);
        self.pieces().filter(move |other| {
            piece.is_some_and(|piece| {
                other.square() != square && other.kind() == piece.kind && other.owner() == piece.owner
            })
        })
    }

    /// True if another piece of the same kind and owner stands on the same
    /// file.
    #[must_use]
    pub fn piece_in_same_file(&self, square: Square) -> bool {
        self.rivals(square)
            .any(|other| other.square().file() == square.file())
    }

    /// True if another piece of the same kind and owner stands on the same
    /// rank.
    #[must_use]
    pub fn piece_in_same_rank(&self, square: Square) -> bool {
        self.rivals(square)
            .any(|other| other.square().rank() == square.rank())
    }

    /// True if another piece of the same kind and owner can legally move to
    /// `to` as well.
    ///
    /// # Errors
    ///
    /// If there is no piece on `from` or `to` is not among its legal moves.
    pub fn piece_to_same_square(&self, from: Square, to: Square) -> anyhow::Result<bool> {
        let Some(piece) = self.at(from) else {
            bail!("no piece on {from}");
        };
        if !piece.potential_moves().contains(to) {
            bail!("{piece} on {from} can not move to {to}");
        }
        Ok(self
            .rivals(from)
            .any(|other| other.potential_moves().contains(to)))
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    fn try_from(input: &str) -> anyhow::Result<Self> {
        Self::from_placement(input.trim())
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.placement() == other.placement()
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    /// Prints the board as placement text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            let mut empty_squares = 0;
            for file in File::ALL {
                if let Some(piece) = self.at(Square::new(file, rank)) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                f.write_char('/')?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, placement
    /// symbol for piece) with rank numbers and file letters around it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            write!(f, "{:>2} ", rank.number())?;
            for file in File::ALL {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, " {piece}"),
                    None => f.write_str(" ."),
                }?;
            }
            f.write_char('\n')?;
        }
        f.write_str("   ")?;
        for file in File::ALL {
            write!(f, " {file}")?;
        }
        Ok(())
    }
}
