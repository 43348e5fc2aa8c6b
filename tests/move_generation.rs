use decachess::chess::core::{Player, Square};
use decachess::chess::position::Position;
use itertools::Itertools;
use pretty_assertions::assert_eq;

fn setup(input: &str) -> Position {
    Position::try_from(input).expect("parsing legal position: {input}")
}

fn get_moves(position: &Position, player: Player) -> Vec<String> {
    position
        .colour_pieces(player)
        .flat_map(|piece| {
            piece
                .potential_moves()
                .iter()
                .map(move |to| format!("{}{to}", piece.square()))
        })
        .sorted()
        .collect::<Vec<_>>()
}

fn sorted_moves(moves: &[&str]) -> Vec<String> {
    moves
        .iter()
        .map(|m| (*m).to_string())
        .sorted()
        .collect::<Vec<_>>()
}

fn play(position: &mut Position, from: &str, to: &str) {
    let _ = position
        .make_move(
            Square::try_from(from).unwrap(),
            Square::try_from(to).unwrap(),
        )
        .expect("legal move");
}

#[test]
fn starting_moves() {
    let position = Position::starting();
    assert_eq!(
        get_moves(&position, Player::White),
        sorted_moves(&[
            "a2a3", "a2a4", "b2b3", "b2b4", "c2c3", "c2c4", "d2d3", "d2d4", "e2e3", "e2e4", "f2f3",
            "f2f4", "g2g3", "g2g4", "h2h3", "h2h4", "i2i3", "i2i4", "j2j3", "j2j4", "b1a3", "b1c3",
            "i1h3", "i1j3", "g1f3", "g1h3", "d1c3", "d1e3",
        ])
    );
    assert_eq!(
        get_moves(&position, Player::Black),
        sorted_moves(&[
            "a9a8", "a9a7", "b9b8", "b9b7", "c9c8", "c9c7", "d9d8", "d9d7", "e9e8", "e9e7", "f9f8",
            "f9f7", "g9g8", "g9g7", "h9h8", "h9h7", "i9i8", "i9i7", "j9j8", "j9j7", "b10a8",
            "b10c8", "i10h8", "i10j8", "g10f8", "g10h8", "d10c8", "d10e8",
        ])
    );
}

#[test]
fn compound_pieces_on_empty_board() {
    // Kings are tucked away in the corners so that they do not interfere.
    for (placement, from, count) in [
        ("k9/10/10/10/10/4A5/10/10/10/9K", "e5", 8 + 17),
        ("k9/10/10/10/10/4C5/10/10/10/9K", "e5", 8 + 18),
        ("k9/10/10/10/10/4M5/10/10/10/9K", "e5", 8 + 35),
    ] {
        let position = setup(placement);
        let piece = position.at(Square::try_from(from).unwrap()).unwrap();
        assert_eq!(piece.potential_moves().count(), count, "{placement}");
    }
}

#[test]
fn check_evasions() {
    assert_eq!(
        get_moves(&setup("5k4/10/10/10/10/5r4/10/10/10/R4K4"), Player::White),
        sorted_moves(&["f1e1", "f1e2", "f1g1", "f1g2"])
    );
    // The rook can block.
    assert_eq!(
        get_moves(&setup("5k4/10/10/10/10/5r4/10/R9/10/5K4"), Player::White),
        sorted_moves(&["a3f3", "f1e1", "f1e2", "f1g1", "f1g2"])
    );
    // Or capture the checking piece.
    assert_eq!(
        get_moves(&setup("5k4/10/10/10/10/5r4/10/10/10/C4K4"), Player::White),
        sorted_moves(&["f1e1", "f1e2", "f1g1", "f1g2"])
    );
    assert_eq!(
        get_moves(&setup("5k4/10/10/10/10/5r4/10/4C5/10/5K4"), Player::White),
        sorted_moves(&["e3f5", "e3f3", "f1e1", "f1e2", "f1g1", "f1g2"])
    );
}

#[test]
fn pins() {
    // Chancellor pinned along the file can still slide along it.
    assert_eq!(
        get_moves(&setup("5r4/10/10/10/10/10/10/10/5C4/5K4"), Player::White),
        sorted_moves(&[
            "f2f3", "f2f4", "f2f5", "f2f6", "f2f7", "f2f8", "f2f9", "f2f10", "f1e1", "f1e2",
            "f1g1", "f1g2",
        ])
    );
    // Archbishop pinned along the file can not move at all.
    assert_eq!(
        get_moves(&setup("5r4/10/10/10/10/10/10/10/5A4/5K4"), Player::White),
        sorted_moves(&["f1e1", "f1e2", "f1g1", "f1g2"])
    );
}

#[test]
fn castling_is_offered() {
    let position = setup("r4k3r/10/10/10/10/10/10/10/10/R4K3R");
    let moves = get_moves(&position, Player::White);
    assert!(moves.contains(&"f1h1".to_string()));
    assert!(moves.contains(&"f1d1".to_string()));
    let moves = get_moves(&position, Player::Black);
    assert!(moves.contains(&"f10h10".to_string()));
    assert!(moves.contains(&"f10d10".to_string()));
}

#[test]
fn castling_is_not_offered_after_king_moved() {
    let mut position = setup("r4k3r/10/10/10/10/10/10/10/10/R4K3R");
    play(&mut position, "f1", "f2");
    play(&mut position, "a10", "a9");
    play(&mut position, "f2", "f1");
    let moves = get_moves(&position, Player::White);
    assert!(!moves.contains(&"f1h1".to_string()));
    assert!(!moves.contains(&"f1d1".to_string()));
    // Black's queenside rook moved, kingside castling is still fine.
    let moves = get_moves(&position, Player::Black);
    assert!(moves.contains(&"f10h10".to_string()));
    assert!(!moves.contains(&"f10d10".to_string()));
}

#[test]
fn en_passant_is_offered_for_one_move() {
    let mut position = setup("5k4/10/10/10/10/10/3p6/10/4P4P/5K4");
    play(&mut position, "e2", "e4");
    assert!(get_moves(&position, Player::Black).contains(&"d4e3".to_string()));
    play(&mut position, "f10", "f9");
    play(&mut position, "j2", "j3");
    assert!(!get_moves(&position, Player::Black).contains(&"d4e3".to_string()));
}

#[test]
fn legal_moves_never_expose_the_king() {
    let mut position = Position::starting();
    for (from, to) in [
        ("e2", "e4"),
        ("f9", "f7"),
        ("e1", "e3"),
        ("g10", "h8"),
        ("d1", "c3"),
        ("e10", "f9"),
    ] {
        play(&mut position, from, to);
        for player in [Player::White, Player::Black] {
            for piece in position.colour_pieces(player) {
                for to in piece.potential_moves().iter() {
                    if piece.castling_to(to).is_some() {
                        continue;
                    }
                    let scratch = position.board().simulate(piece.square(), to);
                    let king = scratch.king(player).unwrap();
                    assert!(
                        !scratch.is_attacked(king, !player),
                        "{} {}{to} exposes the king",
                        piece,
                        piece.square()
                    );
                }
            }
        }
    }
}

#[test]
fn checkmate_implies_no_moves() {
    let position = setup("k9/10/10/10/10/10/10/10/1R8/R8K");
    assert!(position.is_checkmate(Player::Black).unwrap());
    assert!(get_moves(&position, Player::Black).is_empty());
    assert!(!position.is_stalemate(Player::White).unwrap());
}
