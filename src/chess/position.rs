//! Provides [`Position`]: the current [`Board`], the board as it was before the
//! last move and the history of every placement since the game started.
//!
//! Moves are applied through [`Position::make_move`], which validates the move
//! against precomputed legal moves, handles the special moves (castling, en
//! passant, promotion) and recomputes legal moves of every piece.

use std::fmt;

use anyhow::bail;
use bitflags::bitflags;
use itertools::Itertools;

use crate::chess::bitboard::Bitboard;
use crate::chess::board::{Board, CastleSide, Placement};
use crate::chess::core::{PieceKind, Player, Rank, Square};
use crate::chess::piece::{Piece, PieceId};

bitflags! {
    /// Side effects of an accepted move.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MoveFlags : u8 {
        #[allow(missing_docs)]
        const CAPTURE = 1;
        #[allow(missing_docs)]
        const DOUBLE_PAWN_PUSH = 1 << 1;
        #[allow(missing_docs)]
        const EN_PASSANT = 1 << 2;
        #[allow(missing_docs)]
        const KINGSIDE_CASTLE = 1 << 3;
        #[allow(missing_docs)]
        const QUEENSIDE_CASTLE = 1 << 4;
        #[allow(missing_docs)]
        const PROMOTION = 1 << 5;
    }
}

/// What happened during an accepted move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    /// The piece that moved (for promotions: the pawn).
    pub piece: PieceId,
    #[allow(missing_docs)]
    pub from: Square,
    #[allow(missing_docs)]
    pub to: Square,
    #[allow(missing_docs)]
    pub captured: Option<PieceId>,
    #[allow(missing_docs)]
    pub flags: MoveFlags,
    /// Kind the pawn turned into.
    pub promotion: Option<PieceKind>,
    /// Rook relocation that accompanied castling.
    pub rook: Option<(Square, Square)>,
}

/// State of the game: the board, the previous board, whether the last move was
/// a capture and the history of placements used for repetition detection.
///
/// [`Position::try_from()`] accepts placement text (surrounding whitespace is
/// trimmed). Legal moves of every piece are always up to date.
#[derive(Clone)]
pub struct Position {
    board: Board,
    previous: Board,
    capture: bool,
    history: Vec<Placement>,
    last_move: Option<MoveRecord>,
}

impl Position {
    /// Creates the standard starting position.
    ///
    /// ```
    /// use decachess::chess::core::Player;
    /// use decachess::chess::position::Position;
    ///
    /// let position = Position::starting();
    /// assert_eq!(position.all_coloured_potentials(Player::White).count(), 20);
    /// assert_eq!(position.is_check(Player::White).unwrap(), false);
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self::from_board(Board::starting())
    }

    /// Creates a position from an arbitrary set of pieces.
    ///
    /// # Errors
    ///
    /// Two pieces on one square or more than one king per player.
    pub fn from_pieces(pieces: impl IntoIterator<Item = Piece>) -> anyhow::Result<Self> {
        Ok(Self::from_board(Board::from_pieces(pieces)?))
    }

    fn from_board(mut board: Board) -> Self {
        board.update_potentials();
        Self {
            previous: board.clone(),
            history: vec![board.placement()],
            board,
            capture: false,
            last_move: None,
        }
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The board as it was right before the last accepted move.
    #[must_use]
    pub const fn previous(&self) -> &Board {
        &self.previous
    }

    /// Placements since the initial position, including the current one.
    #[must_use]
    pub fn history(&self) -> &[Placement] {
        &self.history
    }

    #[must_use]
    pub const fn last_move(&self) -> Option<&MoveRecord> {
        self.last_move.as_ref()
    }

    #[must_use]
    pub const fn last_move_was_capture(&self) -> bool {
        self.capture
    }

    #[must_use]
    pub fn at(&self, square: Square) -> Option<&Piece> {
        self.board.at(square)
    }

    /// Pieces owned by `player`.
    pub fn colour_pieces(&self, player: Player) -> impl Iterator<Item = &Piece> + '_ {
        self.board.colour_pieces(player)
    }

    /// Union of legal destinations of `player`'s pieces.
    #[must_use]
    pub fn all_coloured_potentials(&self, player: Player) -> Bitboard {
        self.board.all_coloured_potentials(player)
    }

    /// Union of raw destinations of `player`'s pieces.
    #[must_use]
    pub fn all_coloured_raws(&self, player: Player) -> Bitboard {
        self.board.all_coloured_raws(player)
    }

    /// Chooses what the pawn on `square` turns into when it reaches the
    /// farthest rank. Queen is used when nothing was chosen.
    ///
    /// # Errors
    ///
    /// If there is no pawn on `square` or `kind` is a king or a pawn.
    pub fn set_promotion(&mut self, square: Square, kind: PieceKind) -> anyhow::Result<()> {
        if !kind.is_promotion_target() {
            bail!("pawn can not be promoted to {kind}");
        }
        match self.board.at_mut(square) {
            Some(pawn) if pawn.kind() == PieceKind::Pawn => {
                pawn.promotion = Some(kind);
                Ok(())
            },
            _ => bail!("there is no pawn on {square}"),
        }
    }

    /// Unconditionally moves the piece on `from` to `to` and marks it as moved.
    /// Does not check legality, record history or update legal moves. Returns
    /// the identity of the piece that stood on `to`.
    pub fn piece_move(&mut self, from: Square, to: Square) -> Option<PieceId> {
        self.board.relocate(from, to).map(|piece| piece.id())
    }

    /// Applies a legal move of the piece on `from`.
    ///
    /// # Errors
    ///
    /// If there is no piece on `from` or `to` is not among its legal moves.
    /// The position is left untouched.
    pub fn make_move(&mut self, from: Square, to: Square) -> anyhow::Result<MoveRecord> {
        let Some(piece) = self.board.at(from) else {
            bail!("there is no piece on {from}");
        };
        if !piece.is_valid_move(to, piece.owner()) {
            bail!("illegal move: {} on {from} can not move to {to}", piece.kind());
        }
        let piece = piece.clone();
        let owner = piece.owner();

        let previous = self.board.clone();
        let mut record = MoveRecord {
            piece: piece.id(),
            from,
            to,
            captured: self
                .board
                .at(to)
                .filter(|target| target.owner() != owner)
                .map(Piece::id),
            flags: MoveFlags::empty(),
            promotion: None,
            rook: None,
        };

        let en_passant = match piece.kind() {
            PieceKind::Pawn => self.board.en_passant_victim(from, to),
            _ => None,
        };
        for other in self.board.pieces_mut() {
            other.moved_two = false;
        }
        match piece.kind() {
            PieceKind::Pawn => {
                for pawn in self
                    .board
                    .pieces_mut()
                    .filter(|other| other.kind() == PieceKind::Pawn)
                {
                    pawn.previous_square = Some(pawn.square());
                }
                if let Some(victim) = en_passant {
                    record.captured = self.board.take(victim).map(|pawn| pawn.id());
                    record.flags |= MoveFlags::EN_PASSANT;
                }
                if to.rank() == Rank::promotion(owner) {
                    let kind = piece.promotion().unwrap_or(PieceKind::Queen);
                    let _ = self.board.take(from);
                    self.board.place(Piece::promoted(kind, owner, to));
                    record.flags |= MoveFlags::PROMOTION;
                    record.promotion = Some(kind);
                } else {
                    let _ = self.board.relocate(from, to);
                    if from.rank().number().abs_diff(to.rank().number()) == 2 {
                        if let Some(pawn) = self.board.at_mut(to) {
                            pawn.moved_two = true;
                        }
                        record.flags |= MoveFlags::DOUBLE_PAWN_PUSH;
                    }
                }
            },
            PieceKind::King => {
                let castling = piece.castling_to(to);
                let _ = self.board.relocate(from, to);
                if let Some(castling) = castling {
                    let _ = self.board.relocate(castling.rook_from, castling.rook_to);
                    record.rook = Some((castling.rook_from, castling.rook_to));
                    record.flags |= match castling.side {
                        CastleSide::Kingside => MoveFlags::KINGSIDE_CASTLE,
                        CastleSide::Queenside => MoveFlags::QUEENSIDE_CASTLE,
                    };
                }
            },
            _ => {
                let _ = self.board.relocate(from, to);
            },
        }
        if record.captured.is_some() {
            record.flags |= MoveFlags::CAPTURE;
        }

        self.previous = previous;
        self.capture = record.captured.is_some();
        self.history.push(self.board.placement());
        self.board.update_potentials();
        self.last_move = Some(record);
        Ok(record)
    }

    /// Square of `player`'s king.
    ///
    /// # Errors
    ///
    /// If the king is missing: the position is corrupted.
    pub fn find_king(&self, player: Player) -> anyhow::Result<Square> {
        match self.board.king(player) {
            Some(square) => Ok(square),
            None => bail!("{player} king is missing from the board"),
        }
    }

    /// True iff the opponent's raw moves reach `player`'s king.
    ///
    /// # Errors
    ///
    /// If the king is missing.
    pub fn is_check(&self, player: Player) -> anyhow::Result<bool> {
        let king = self.find_king(player)?;
        Ok(self.board.is_attacked(king, !player))
    }

    /// True iff `player` is in check and has no legal moves.
    ///
    /// # Errors
    ///
    /// If the king is missing.
    pub fn is_checkmate(&self, player: Player) -> anyhow::Result<bool> {
        Ok(self.is_check(player)? && self.all_coloured_potentials(player).is_empty())
    }

    /// True iff the opponent of `player` (i.e. the side that is about to move
    /// after `player` moved) has no legal moves and is not in check.
    ///
    /// # Errors
    ///
    /// If the opponent's king is missing.
    pub fn is_stalemate(&self, player: Player) -> anyhow::Result<bool> {
        let opponent = !player;
        Ok(!self.is_check(opponent)? && self.all_coloured_potentials(opponent).is_empty())
    }

    /// Draw by insufficient material or threefold repetition.
    ///
    /// Insufficient material is:
    ///
    /// - two bare kings;
    /// - kings and a single bishop or knight;
    /// - kings and one bishop per player, both starting on the same square
    ///   color;
    /// - kings and one knight per player.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.has_insufficient_material() || self.is_threefold_repetition()
    }

    fn has_insufficient_material(&self) -> bool {
        let pieces: Vec<&Piece> = self.board.pieces().collect();
        let kings = pieces
            .iter()
            .filter(|piece| piece.kind() == PieceKind::King)
            .count();
        if kings != 2 {
            return false;
        }
        let minor: Vec<&Piece> = pieces
            .into_iter()
            .filter(|piece| piece.kind() != PieceKind::King)
            .collect();
        match minor.as_slice() {
            [] => true,
            [piece] => matches!(piece.kind(), PieceKind::Bishop | PieceKind::Knight),
            [first, second] => {
                first.owner() != second.owner()
                    && first.kind() == second.kind()
                    && match first.kind() {
                        PieceKind::Bishop => first.origin().is_light() == second.origin().is_light(),
                        PieceKind::Knight => true,
                        _ => false,
                    }
            },
            _ => false,
        }
    }

    fn is_threefold_repetition(&self) -> bool {
        self.history.iter().counts().values().any(|&count| count >= 3)
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        if input == "startpos" {
            return Ok(Self::starting());
        }
        Ok(Self::from_board(Board::from_placement(input)?))
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board && self.history == other.history
    }
}

impl Eq for Position {}

impl fmt::Display for Position {
    /// Prints the placement text of the current board.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.board)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Placement: {}", &self.board)?;
        match &self.last_move {
            Some(record) => writeln!(
                f,
                "Last move: {} {}{} ({:?})",
                record.piece, record.from, record.to, record.flags
            ),
            None => writeln!(f, "Last move: -"),
        }?;
        writeln!(f, "History: {} placements", self.history.len())
    }
}
