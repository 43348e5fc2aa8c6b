use decachess::chess::core::{PieceKind, Square};
use decachess::chess::notation::encode;
use decachess::chess::position::Position;
use pretty_assertions::assert_eq;

fn setup(input: &str) -> Position {
    Position::try_from(input).expect("parsing legal position: {input}")
}

fn play(position: &mut Position, from: &str, to: &str) -> String {
    let from = Square::try_from(from).unwrap();
    let to = Square::try_from(to).unwrap();
    let _ = position.make_move(from, to).expect("legal move");
    encode(position, from, to).unwrap()
}

/// Plays the move on a copy of `position`, leaving the original intact.
fn notation(position: &Position, from: &str, to: &str) -> String {
    play(&mut position.clone(), from, to)
}

#[test]
fn disambiguation_by_file() {
    let position = setup("5k4/10/10/10/10/10/10/R8R/10/5K4");
    assert_eq!(notation(&position, "a3", "e3"), "Rae3");
    assert_eq!(notation(&position, "j3", "e3"), "Rje3");
    // Only one rook can reach a5.
    assert_eq!(notation(&position, "a3", "a5"), "Ra5");
}

#[test]
fn disambiguation_by_rank() {
    let position = setup("5k4/10/10/10/10/R9/10/10/10/R4K4");
    assert_eq!(notation(&position, "a1", "a3"), "R1a3");
    assert_eq!(notation(&position, "a5", "a3"), "R5a3");
}

#[test]
fn disambiguation_by_square() {
    let position = setup("5k4/10/10/10/10/1N8/10/10/10/1N1N5K");
    assert_eq!(notation(&position, "b1", "c3"), "Nb1c3");
    assert_eq!(notation(&position, "d1", "c3"), "Ndc3");
    assert_eq!(notation(&position, "b5", "c3"), "N5c3");
    assert_eq!(notation(&position, "d1", "e3"), "Ne3");
}

#[test]
fn captures() {
    let mut position = setup("5k4/10/10/10/10/4r5/10/10/10/4R4K");
    assert_eq!(play(&mut position, "e1", "e5"), "Rxe5");

    let mut position = setup("1r3k4/P9/10/10/10/10/10/10/10/9K");
    assert_eq!(play(&mut position, "a9", "b10"), "axb10=Q+");
}

#[test]
fn en_passant() {
    let mut position = setup("5k4/10/10/10/10/10/3p6/10/4P5/5K4");
    assert_eq!(play(&mut position, "e2", "e4"), "e4");
    assert_eq!(play(&mut position, "d4", "e3"), "dxe3");
}

#[test]
fn promotion() {
    let mut position = setup("5k4/1P8/10/10/10/10/10/10/10/5K4");
    assert_eq!(notation(&position, "b9", "b10"), "b10=Q+");
    position
        .set_promotion(Square::try_from("b9").unwrap(), PieceKind::Knight)
        .unwrap();
    assert_eq!(play(&mut position, "b9", "b10"), "b10=N");
}

#[test]
fn castling() {
    let mut position = setup("r4k3r/10/10/10/10/10/10/10/10/R4K3R");
    assert_eq!(notation(&position, "f1", "d1"), "O-O-O");
    assert_eq!(play(&mut position, "f1", "h1"), "O-O");
    assert_eq!(play(&mut position, "f10", "d10"), "O-O-O");
    // A regular king step is not castling.
    assert_eq!(play(&mut position, "h1", "h2"), "Kh2");
}

#[test]
fn check_and_mate() {
    let mut position = setup("k9/10/10/10/10/10/10/10/1R8/2R6K");
    assert_eq!(notation(&position, "c1", "c10"), "Rc10+");
    assert_eq!(play(&mut position, "c1", "a1"), "Ra1#");
}

#[test]
fn second_promotion_on_the_same_square() {
    let mut position = setup("10/1P8/1P8/10/10/10/9k/10/10/5K4");
    assert_eq!(play(&mut position, "b9", "b10"), "b10=Q");
    assert_eq!(play(&mut position, "j4", "j5"), "Kj5");
    assert_eq!(play(&mut position, "b10", "a10"), "Qa10");
    assert_eq!(play(&mut position, "j5", "j4"), "Kj4");
    assert_eq!(play(&mut position, "b8", "b9"), "b9");
    assert_eq!(play(&mut position, "j4", "j5"), "Kj5");
    assert_eq!(play(&mut position, "b9", "b10"), "b10=Q");
    // Both queens were created on b10 and share an identity.
    assert_eq!(
        position.at(Square::try_from("a10").unwrap()).map(|piece| piece.id()),
        position.at(Square::try_from("b10").unwrap()).map(|piece| piece.id())
    );
    assert_eq!(play(&mut position, "j5", "j4"), "Kj4");
    assert_eq!(play(&mut position, "b10", "c10"), "Qc10");
    assert_eq!(play(&mut position, "j4", "j5"), "Kj5");
    // The queen on c10 can reach b10 as well.
    assert_eq!(play(&mut position, "a10", "b10"), "Qab10");
}
