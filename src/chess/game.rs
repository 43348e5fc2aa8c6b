//! Turn tracking on top of [`Position`]: whose move it is, the notation of
//! every move played and the result once the game is over.

use std::fmt;

use anyhow::{bail, Context};
use itertools::Itertools;

use crate::chess::core::{PieceKind, Player, Rank, Square};
use crate::chess::notation;
use crate::chess::position::Position;

/// How the game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    #[allow(missing_docs)]
    Checkmate { winner: Player },
    /// The side to move has no legal moves and is not in check.
    Stalemate,
    /// Insufficient material or threefold repetition.
    Draw,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate { winner } => write!(f, "{winner} wins by checkmate"),
            Self::Stalemate => f.write_str("Draw by stalemate"),
            Self::Draw => f.write_str("Draw"),
        }
    }
}

/// A game in progress.
pub struct Game {
    position: Position,
    first_to_move: Player,
    side_to_move: Player,
    moves: Vec<String>,
    result: Option<GameResult>,
}

impl Game {
    /// Standard starting position, White to move.
    #[must_use]
    pub fn new() -> Self {
        Self::with_position(Position::starting(), Player::White)
    }

    /// Continues from an arbitrary position.
    ///
    /// # Errors
    ///
    /// If either king is missing.
    pub fn from_position(position: Position, side_to_move: Player) -> anyhow::Result<Self> {
        for player in [Player::White, Player::Black] {
            let _ = position.find_king(player)?;
        }
        Ok(Self::with_position(position, side_to_move))
    }

    const fn with_position(position: Position, side_to_move: Player) -> Self {
        Self {
            position,
            first_to_move: side_to_move,
            side_to_move,
            moves: Vec::new(),
            result: None,
        }
    }

    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    /// Notation of every move played so far.
    #[must_use]
    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    #[must_use]
    pub const fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Plays a move of the side to move and returns its notation. On error the
    /// game is left as it was.
    ///
    /// # Errors
    ///
    /// If the game is over, there is no piece of the side to move on `from`
    /// or the move is illegal.
    pub fn play(&mut self, from: Square, to: Square) -> anyhow::Result<String> {
        self.validate(from, to)?;
        self.apply(from, to, None)
    }

    /// Plays a pawn move to the farthest rank promoting to `kind`.
    ///
    /// # Errors
    ///
    /// Same as [`Game::play`], and if the move does not reach the farthest
    /// rank, the piece on `from` is not a pawn or `kind` is not a promotion
    /// target.
    pub fn play_promoting(
        &mut self,
        from: Square,
        to: Square,
        kind: PieceKind,
    ) -> anyhow::Result<String> {
        self.validate(from, to)?;
        if to.rank() != Rank::promotion(self.side_to_move) {
            bail!("{to} is not on the farthest rank, there is nothing to promote");
        }
        self.apply(from, to, Some(kind))
    }

    fn validate(&self, from: Square, to: Square) -> anyhow::Result<()> {
        if let Some(result) = self.result {
            bail!("the game is over: {result}");
        }
        let Some(piece) = self.position.at(from) else {
            bail!("there is no piece on {from}");
        };
        if piece.owner() != self.side_to_move {
            bail!("it is {}'s turn, {} on {from} can not move", self.side_to_move, piece.kind());
        }
        if !piece.is_valid_move(to, self.side_to_move) {
            bail!("illegal move: {} on {from} can not move to {to}", piece.kind());
        }
        Ok(())
    }

    /// Nothing is committed until the move, its notation and the result are
    /// all computed.
    fn apply(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> anyhow::Result<String> {
        let mover = self.side_to_move;
        let mut position = self.position.clone();
        if let Some(kind) = promotion {
            position.set_promotion(from, kind)?;
        }
        let _ = position.make_move(from, to)?;
        let text = notation::encode(&position, from, to)
            .with_context(|| format!("failed to write down {from}{to}"))?;
        let result = Self::evaluate(&position, mover)?;

        self.position = position;
        self.moves.push(text.clone());
        self.result = result;
        self.side_to_move = !mover;
        Ok(text)
    }

    /// Checkmate first, then stalemate, then draws.
    fn evaluate(position: &Position, mover: Player) -> anyhow::Result<Option<GameResult>> {
        if position.is_checkmate(!mover)? {
            return Ok(Some(GameResult::Checkmate { winner: mover }));
        }
        if position.is_stalemate(mover)? {
            return Ok(Some(GameResult::Stalemate));
        }
        if position.is_draw() {
            return Ok(Some(GameResult::Draw));
        }
        Ok(None)
    }

    /// Numbered move list, e.g. `1. e4 e7 2. Nc3`. A game starting with Black
    /// to move begins with `1...`.
    #[must_use]
    pub fn transcript(&self) -> String {
        let mut moves: Vec<Option<&str>> = self.moves.iter().map(|text| Some(text.as_str())).collect();
        if self.first_to_move == Player::Black {
            moves.insert(0, None);
        }
        moves
            .chunks(2)
            .enumerate()
            .map(|(index, pair)| {
                let number = index + 1;
                match pair {
                    [None, Some(black)] => format!("{number}... {black}"),
                    [Some(white), Some(black)] => format!("{number}. {white} {black}"),
                    [Some(white)] => format!("{number}. {white}"),
                    _ => String::new(),
                }
            })
            .join(" ")
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn square(text: &str) -> Square {
        Square::try_from(text).unwrap()
    }

    #[test]
    fn turns() {
        let mut game = Game::new();
        assert_eq!(game.side_to_move(), Player::White);
        assert!(game.play(square("e9"), square("e8")).is_err());
        assert_eq!(game.play(square("e2"), square("e4")).unwrap(), "e4");
        assert_eq!(game.side_to_move(), Player::Black);
        assert!(game.play(square("d2"), square("d4")).is_err());
        assert_eq!(game.play(square("e9"), square("e7")).unwrap(), "e7");
        assert_eq!(game.play(square("b1"), square("c3")).unwrap(), "Nc3");
        assert_eq!(game.transcript(), "1. e4 e7 2. Nc3");
        assert_eq!(game.moves().len(), 3);
        assert_eq!(game.result(), None);
    }

    #[test]
    fn black_starts() {
        let position = Position::try_from("k9/10/10/10/10/10/10/10/10/9K").unwrap();
        let mut game = Game::from_position(position, Player::Black).unwrap();
        // Bare kings are drawn right away: the result is known after the first
        // move.
        assert_eq!(game.play(square("a10"), square("a9")).unwrap(), "Ka9");
        assert_eq!(game.result(), Some(GameResult::Draw));
        assert_eq!(game.transcript(), "1... Ka9");
        assert!(game.play(square("j1"), square("j2")).is_err());
    }

    #[test]
    fn checkmate_ends_the_game() {
        let position = Position::try_from("k9/10/10/10/10/10/10/10/1R8/2R6K").unwrap();
        let mut game = Game::from_position(position, Player::White).unwrap();
        assert_eq!(game.play(square("c1"), square("a1")).unwrap(), "Ra1#");
        assert_eq!(
            game.result(),
            Some(GameResult::Checkmate {
                winner: Player::White
            })
        );
        assert_eq!(
            game.result().map(|result| result.to_string()),
            Some("White wins by checkmate".to_string())
        );
    }

    #[test]
    fn stalemate_ends_the_game() {
        let position = Position::try_from("k9/10/2Q7/10/10/10/10/10/10/9K").unwrap();
        let mut game = Game::from_position(position, Player::White).unwrap();
        assert_eq!(game.play(square("c8"), square("b8")).unwrap(), "Qb8");
        assert_eq!(game.result(), Some(GameResult::Stalemate));
    }

    #[test]
    fn underpromotion() {
        let position = Position::try_from("5k4/1P8/10/10/10/10/10/10/10/5K4").unwrap();
        let mut game = Game::from_position(position, Player::White).unwrap();
        assert!(game
            .play_promoting(square("b9"), square("b10"), PieceKind::King)
            .is_err());
        assert_eq!(
            game.play_promoting(square("b9"), square("b10"), PieceKind::Archbishop)
                .unwrap(),
            "b10=A"
        );
    }

    #[test]
    fn promotion_needs_the_farthest_rank() {
        let position = Position::try_from("5k4/1P8/10/10/10/10/10/10/4P5/5K4").unwrap();
        let mut game = Game::from_position(position, Player::White).unwrap();
        assert!(game
            .play_promoting(square("e2"), square("e3"), PieceKind::Rook)
            .is_err());
        assert_eq!(game.side_to_move(), Player::White);
        assert!(game.position().at(square("e2")).unwrap().promotion().is_none());
        assert_eq!(game.play(square("b9"), square("b10")).unwrap(), "b10=Q+");
    }

    #[test]
    fn rejected_promotion_changes_nothing() {
        let position = Position::try_from("5k4/1P8/10/10/10/10/10/10/10/5K4").unwrap();
        let mut game = Game::from_position(position.clone(), Player::White).unwrap();
        assert!(game
            .play_promoting(square("b9"), square("b10"), PieceKind::Pawn)
            .is_err());
        assert_eq!(game.position(), &position);
        assert!(game.moves().is_empty());
        assert_eq!(game.side_to_move(), Player::White);
    }

    #[test]
    fn positions_without_kings_are_rejected() {
        for placement in [
            "10/10/10/10/10/10/10/10/4P5/5K4",
            "5k4/10/10/10/10/10/10/10/4P5/10",
            "10/10/10/10/10/10/10/10/10/10",
        ] {
            let position = Position::try_from(placement).unwrap();
            assert!(
                Game::from_position(position, Player::White).is_err(),
                "{placement}"
            );
        }
    }

    #[test]
    fn two_promotions_on_one_square() {
        let position = Position::try_from("10/1P8/1P8/10/10/10/9k/10/10/5K4").unwrap();
        let mut game = Game::from_position(position, Player::White).unwrap();
        for (from, to, expected) in [
            ("b9", "b10", "b10=Q"),
            ("j4", "j5", "Kj5"),
            ("b10", "a10", "Qa10"),
            ("j5", "j4", "Kj4"),
            ("b8", "b9", "b9"),
            ("j4", "j5", "Kj5"),
            ("b9", "b10", "b10=Q"),
            ("j5", "j4", "Kj4"),
            ("b10", "c10", "Qc10"),
        ] {
            assert_eq!(game.play(square(from), square(to)).unwrap(), expected);
        }
        assert_eq!(game.position().to_string(), "Q1Q7/10/10/10/10/10/9k/10/10/5K4");
        assert_eq!(game.moves().len(), 9);
        assert_eq!(game.side_to_move(), Player::Black);
    }
}
