//! Algebraic notation of accepted moves, e.g. `Nc3`, `exd5`, `Rad1`, `O-O`,
//! `b10=C+`.

use std::fmt::Write;

use anyhow::bail;

use crate::chess::core::{PieceKind, Square};
use crate::chess::position::Position;

/// Renders the move from `from` to `to` that was the last move applied to
/// `after`. The pre-move board (`after.previous()`) drives disambiguation and
/// castling detection; the check and mate markers are computed on `after`.
///
/// Disambiguation is added only when another piece of the same kind and owner
/// could also reach `to`: the file when it tells them apart, otherwise the
/// rank, otherwise both.
///
/// ```
/// use decachess::chess::core::Square;
/// use decachess::chess::notation::encode;
/// use decachess::chess::position::Position;
///
/// let mut position = Position::starting();
/// let from = Square::try_from("e2").unwrap();
/// let to = Square::try_from("e4").unwrap();
/// let _ = position.make_move(from, to).unwrap();
/// assert_eq!(encode(&position, from, to).unwrap(), "e4");
/// ```
///
/// # Errors
///
/// If there was no piece on `from` before the move, it could not legally move
/// to `to`, or either king is missing.
pub fn encode(after: &Position, from: Square, to: Square) -> anyhow::Result<String> {
    let before = after.previous();
    let Some(mover) = before.at(from) else {
        bail!("there was no piece on {from} before the move");
    };
    let piece = mover.id();
    if !mover.potential_moves().contains(to) {
        bail!("{mover} could not move from {from} to {to}");
    }

    let mut text = String::new();
    if let Some(castling) = mover.castling_to(to) {
        write!(text, "{}", castling.side)?;
    } else {
        let capture = after.last_move_was_capture();
        match piece.kind.notation() {
            None => {
                if capture {
                    write!(text, "{}x", from.file())?;
                }
            },
            Some(letter) => {
                text.push(letter);
                if before.piece_to_same_square(from, to)? {
                    if !before.piece_in_same_file(from) {
                        write!(text, "{}", from.file())?;
                    } else if !before.piece_in_same_rank(from) {
                        write!(text, "{}", from.rank())?;
                    } else {
                        write!(text, "{from}")?;
                    }
                }
                if capture {
                    text.push('x');
                }
            },
        }
        write!(text, "{to}")?;
        if piece.kind == PieceKind::Pawn {
            if let Some(letter) = after
                .at(to)
                .map(|promoted| promoted.kind())
                .filter(|kind| *kind != PieceKind::Pawn)
                .and_then(PieceKind::notation)
            {
                write!(text, "={letter}")?;
            }
        }
    }

    let opponent = !piece.owner;
    if after.is_checkmate(opponent)? {
        text.push('#');
    } else if after.is_check(opponent)? {
        text.push('+');
    }
    Ok(text)
}
